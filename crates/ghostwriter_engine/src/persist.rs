use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ghostwriter_core::{HistorySlot, SlotError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// File name of the persisted history log inside the data directory.
pub const HISTORY_FILENAME: &str = "ghostwriter_history_v1.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the data directory exists; create if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // `persist` renames over an existing target.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// History slot backed by a single JSON file, rewritten atomically.
#[derive(Debug, Clone)]
pub struct FileSlot {
    writer: AtomicFileWriter,
    filename: String,
}

impl FileSlot {
    pub fn new(data_dir: PathBuf) -> Self {
        Self::with_filename(data_dir, HISTORY_FILENAME)
    }

    pub fn with_filename(data_dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            writer: AtomicFileWriter::new(data_dir),
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(&self.filename)
    }
}

impl HistorySlot for FileSlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(self.path()) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SlotError::Io(err)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), SlotError> {
        match self.writer.write(&self.filename, contents) {
            Ok(_) => Ok(()),
            Err(PersistError::Io(err)) => Err(SlotError::Io(err)),
            Err(PersistError::DataDir(reason)) => Err(SlotError::Unavailable(reason)),
        }
    }
}
