use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use ghost_logging::{ghost_debug, ghost_error, ghost_info, ghost_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type HistoryId = Uuid;

/// Label used when the generated text has nothing left after markup is stripped.
pub const UNTITLED: &str = "Untitled";
const SUMMARY_FALLBACK_CHARS: usize = 40;
const SUMMARY_ELLIPSIS: &str = "...";

/// One past generation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub summary: String,
    pub content: String,
    #[serde(rename = "model", default)]
    pub model_label: Option<String>,
}

impl HistoryEntry {
    pub fn new(content: impl Into<String>, model_label: Option<String>) -> Self {
        let content = content.into();
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            summary: summarize(&content),
            content,
            model_label,
        }
    }
}

/// Derives a short label from generated Markdown.
///
/// Heading, emphasis and code markers are dropped, line breaks collapse to a
/// single space, and the first sentence (up to and including `.`, `!` or `?`)
/// is returned. Without a sentence end the first 40 characters plus `...` are
/// used instead.
pub fn summarize(content: &str) -> String {
    let mut plain = String::with_capacity(content.len());
    let mut in_break = false;
    for ch in content.chars() {
        match ch {
            '#' | '*' | '`' => {}
            '\n' | '\r' => {
                if !in_break {
                    plain.push(' ');
                    in_break = true;
                }
            }
            other => {
                plain.push(other);
                in_break = false;
            }
        }
    }
    let plain = plain.trim();
    if plain.is_empty() {
        return UNTITLED.to_string();
    }

    let is_sentence_end = |ch: char| matches!(ch, '.' | '!' | '?');
    if let Some(start) = plain.find(|ch: char| !is_sentence_end(ch)) {
        let rest = &plain[start..];
        if let Some(end) = rest.find(is_sentence_end) {
            // Sentence marks are single-byte, so `end + 1` is a char boundary.
            return rest[..=end].to_string();
        }
    }

    let head: String = plain.chars().take(SUMMARY_FALLBACK_CHARS).collect();
    format!("{head}{SUMMARY_ELLIPSIS}")
}

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("history slot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history slot unavailable: {0}")]
    Unavailable(String),
}

/// A single named slot holding the serialized history log as text.
pub trait HistorySlot {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, SlotError>;
    fn write(&mut self, contents: &str) -> Result<(), SlotError>;
}

/// In-memory slot. Clones share the same backing text, which lets tests
/// simulate a restart by building a second store over a clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Rc::new(RefCell::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl HistorySlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), SlotError> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}

/// Newest-first history log mirrored to a [`HistorySlot`].
///
/// Every mutation rewrites the whole slot before returning.
#[derive(Debug)]
pub struct HistoryStore<S: HistorySlot> {
    slot: S,
    entries: Vec<HistoryEntry>,
}

impl<S: HistorySlot> HistoryStore<S> {
    /// Creates an empty store; call [`HistoryStore::load_all`] to read the slot.
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            entries: Vec::new(),
        }
    }

    /// Reads the persisted log, replacing the in-memory one.
    ///
    /// Missing or malformed data yields an empty log; the error is logged and
    /// never returned.
    pub fn load_all(&mut self) -> Vec<HistoryEntry> {
        self.entries = match self.slot.read() {
            Ok(Some(text)) => match serde_json::from_str::<Vec<HistoryEntry>>(&text) {
                Ok(entries) => {
                    ghost_info!("Loaded {} history entries", entries.len());
                    entries
                }
                Err(err) => {
                    ghost_warn!("Discarding malformed history log: {}", err);
                    Vec::new()
                }
            },
            Ok(None) => {
                ghost_debug!("No persisted history log");
                Vec::new()
            }
            Err(err) => {
                ghost_warn!("Failed to read history log: {}", err);
                Vec::new()
            }
        };
        self.entries.clone()
    }

    /// Records a new generation at the head of the log and persists it.
    pub fn add(&mut self, content: impl Into<String>, model_label: Option<String>) -> HistoryEntry {
        let entry = HistoryEntry::new(content, model_label);
        self.entries.insert(0, entry.clone());
        self.persist();
        entry
    }

    /// Removes the entry with `id`. Returns `false` (and writes nothing) if absent.
    pub fn remove(&mut self, id: HistoryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: HistoryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn persist(&mut self) {
        let text = match serde_json::to_string(&self.entries) {
            Ok(text) => text,
            Err(err) => {
                ghost_error!("Failed to serialize history log: {}", err);
                return;
            }
        };
        if let Err(err) = self.slot.write(&text) {
            ghost_error!("Failed to persist history log: {}", err);
        }
    }
}
