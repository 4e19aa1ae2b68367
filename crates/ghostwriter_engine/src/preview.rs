use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ghost_logging::{ghost_debug, ghost_warn};
use ghostwriter_core::PreviewHandle;
use tempfile::TempDir;

use crate::PersistError;

const MAX_NAME_CHARS: usize = 64;

/// Materializes preview handles as files in a private temp directory.
///
/// Each handle maps to one file until revoked. The directory and any
/// leftovers are removed when the cache is dropped.
#[derive(Debug)]
pub struct PreviewCache {
    dir: TempDir,
    live: HashMap<PreviewHandle, PathBuf>,
}

impl PreviewCache {
    pub fn new() -> Result<Self, PersistError> {
        let dir = tempfile::Builder::new()
            .prefix("ghostwriter-previews-")
            .tempdir()?;
        Ok(Self {
            dir,
            live: HashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn create(
        &mut self,
        handle: PreviewHandle,
        name: &str,
        data: &[u8],
    ) -> Result<PathBuf, PersistError> {
        if let Some(existing) = self.live.get(&handle) {
            ghost_warn!("Preview {} already exists at {:?}", handle.raw(), existing);
            return Ok(existing.clone());
        }
        let path = self
            .dir
            .path()
            .join(format!("{}-{}", handle.raw(), sanitize_name(name)));
        fs::write(&path, data)?;
        ghost_debug!("Created preview {} at {:?}", handle.raw(), path);
        self.live.insert(handle, path.clone());
        Ok(path)
    }

    /// Releases a preview. Returns `false` for unknown or already revoked handles.
    pub fn revoke(&mut self, handle: PreviewHandle) -> bool {
        let Some(path) = self.live.remove(&handle) else {
            ghost_warn!("Revoke of unknown preview {}", handle.raw());
            return false;
        };
        if let Err(err) = fs::remove_file(&path) {
            ghost_warn!("Failed to remove preview file {:?}: {}", path, err);
        }
        true
    }

    pub fn path(&self, handle: PreviewHandle) -> Option<&Path> {
        self.live.get(&handle).map(PathBuf::as_path)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "preview".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_name;

    #[test]
    fn names_are_reduced_to_safe_characters() {
        assert_eq!(sanitize_name("screen shot (1).png"), "screen_shot__1_.png");
        assert_eq!(sanitize_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_name("..."), "preview");
        assert_eq!(sanitize_name(""), "preview");
    }
}
