use crate::{FileId, HistoryEntry, HistoryId, IncomingFile, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User uploaded or pasted files.
    FilesAdded(Vec<IncomingFile>),
    /// User removed a single queued file.
    FileRemoved(FileId),
    /// User opened the enlarged preview of a queued file.
    PreviewOpened(FileId),
    /// User dismissed the enlarged preview.
    PreviewClosed,
    /// User picked a model from the catalog.
    ModelSelected(String),
    /// User clicked Generate.
    GenerateClicked,
    /// The generation service answered.
    GenerationCompleted {
        submission: SubmissionId,
        result: Result<String, String>,
    },
    /// Persisted history read at startup.
    HistoryRestored(Vec<HistoryEntry>),
    /// The platform durably recorded a generation.
    HistoryRecorded(HistoryEntry),
    HistoryPanelOpened,
    HistoryPanelClosed,
    /// User loaded a past generation into the result view.
    HistoryEntryOpened(HistoryId),
    /// User deleted a past generation.
    HistoryEntryDeleted(HistoryId),
    /// User clicked Copy on the result.
    CopyClicked,
    /// Clipboard write succeeded.
    CopyConfirmed,
    /// Clipboard write failed.
    CopyFailed(String),
    /// The "copied" confirmation timer fired.
    CopiedExpired { epoch: u64 },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
