use crate::catalog::{default_model, resolve_label, short_label};
use crate::view_model::{AppViewModel, HistoryRowView, QueueRowView};
use crate::{
    FileId, FileQueue, GenerationSession, HistoryEntry, HistoryId, PreviewHandle, SubmissionState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    queue: FileQueue,
    enlarged: Option<FileId>,
    session: GenerationSession,
    selected_model: String,
    /// Result text waiting for the platform to confirm it reached history.
    awaiting_record: bool,
    result: Option<String>,
    copied: bool,
    copied_epoch: u64,
    history: Vec<HistoryEntry>,
    history_open: bool,
    last_failure: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            queue: FileQueue::new(),
            enlarged: None,
            session: GenerationSession::new(),
            selected_model: default_model().id.to_string(),
            awaiting_record: false,
            result: None,
            copied: false,
            copied_epoch: 0,
            history: Vec::new(),
            history_open: false,
            last_failure: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &FileQueue {
        &self.queue
    }

    pub fn submission(&self) -> &SubmissionState {
        self.session.state()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn enlarged(&self) -> Option<FileId> {
        self.enlarged
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn can_generate(&self) -> bool {
        !self.queue.is_empty() && !self.session.is_pending() && !self.awaiting_record
    }

    pub fn view(&self) -> AppViewModel {
        let model_label =
            resolve_label(&self.selected_model).unwrap_or(self.selected_model.as_str());
        AppViewModel {
            queue: self
                .queue
                .iter()
                .map(|file| QueueRowView {
                    file_id: file.id,
                    name: file.name.clone(),
                    bytes: file.data.len() as u64,
                })
                .collect(),
            enlarged: self.enlarged,
            selected_model: self.selected_model.clone(),
            selected_model_label: model_label.to_string(),
            generating_label: self
                .session
                .is_pending()
                .then(|| format!("Writing with {}...", short_label(model_label))),
            can_generate: self.can_generate(),
            submission: self.session.state().clone(),
            result: self.result.clone(),
            copied: self.copied,
            history: self
                .history
                .iter()
                .map(|entry| HistoryRowView {
                    id: entry.id,
                    summary: entry.summary.clone(),
                    model_badge: entry
                        .model_label
                        .as_deref()
                        .map(short_label)
                        .filter(|label| !label.is_empty())
                        .unwrap_or("AI")
                        .to_string(),
                    date: entry.timestamp.format("%Y-%m-%d").to_string(),
                })
                .collect(),
            history_open: self.history_open,
            last_failure: self.last_failure.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn queue_mut(&mut self) -> &mut FileQueue {
        &mut self.queue
    }

    pub(crate) fn session_mut(&mut self) -> (&mut GenerationSession, &FileQueue) {
        (&mut self.session, &self.queue)
    }

    pub(crate) fn set_enlarged(&mut self, file_id: Option<FileId>) {
        self.enlarged = file_id;
    }

    /// Removes one file. The enlarged selection is dropped before the handle
    /// is handed out for revocation.
    pub(crate) fn remove_file(&mut self, file_id: FileId) -> Option<PreviewHandle> {
        if self.enlarged == Some(file_id) {
            self.enlarged = None;
        }
        self.queue.remove(file_id)
    }

    /// Empties the queue after a recorded success. Selection first, then handles.
    pub(crate) fn clear_queue(&mut self) -> Vec<PreviewHandle> {
        self.enlarged = None;
        self.queue.clear()
    }

    pub(crate) fn set_selected_model(&mut self, model_id: String) {
        self.selected_model = model_id;
    }

    pub(crate) fn set_awaiting_record(&mut self, awaiting: bool) {
        self.awaiting_record = awaiting;
    }

    pub(crate) fn awaiting_record(&self) -> bool {
        self.awaiting_record
    }

    pub(crate) fn set_result(&mut self, result: Option<String>) {
        self.result = result;
    }

    pub(crate) fn set_copied(&mut self, copied: bool) {
        self.copied = copied;
    }

    pub(crate) fn copied(&self) -> bool {
        self.copied
    }

    pub(crate) fn bump_copied_epoch(&mut self) -> u64 {
        self.copied_epoch += 1;
        self.copied_epoch
    }

    pub(crate) fn copied_epoch(&self) -> u64 {
        self.copied_epoch
    }

    pub(crate) fn set_last_failure(&mut self, failure: Option<String>) {
        self.last_failure = failure;
    }

    pub(crate) fn restore_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history = entries;
    }

    pub(crate) fn prepend_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
    }

    pub(crate) fn remove_history(&mut self, id: HistoryId) -> bool {
        let before = self.history.len();
        self.history.retain(|entry| entry.id != id);
        self.history.len() != before
    }

    pub(crate) fn history_entry(&self, id: HistoryId) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.id == id)
    }

    pub(crate) fn set_history_open(&mut self, open: bool) {
        self.history_open = open;
    }
}
