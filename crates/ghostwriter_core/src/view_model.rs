use crate::{FileId, HistoryId, SubmissionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub queue: Vec<QueueRowView>,
    pub enlarged: Option<FileId>,
    pub selected_model: String,
    pub selected_model_label: String,
    /// Present while a submission is pending.
    pub generating_label: Option<String>,
    pub can_generate: bool,
    pub submission: SubmissionState,
    pub result: Option<String>,
    pub copied: bool,
    pub history: Vec<HistoryRowView>,
    pub history_open: bool,
    pub last_failure: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRowView {
    pub file_id: FileId,
    pub name: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub id: HistoryId,
    pub summary: String,
    pub model_badge: String,
    pub date: String,
}
