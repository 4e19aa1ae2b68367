use std::time::Duration;

use bytes::Bytes;

use crate::{FileId, GenerationRequest, HistoryId, PreviewHandle};

/// How long the "copied" confirmation stays visible.
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Materialize a local preview for a freshly queued file.
    CreatePreview {
        handle: PreviewHandle,
        file_id: FileId,
        name: String,
        data: Bytes,
    },
    /// Release a preview. Emitted exactly once per created preview.
    RevokePreview { handle: PreviewHandle },
    /// Send one request to the generation service.
    Generate(GenerationRequest),
    /// Append a generation to the persisted history, then report `Msg::HistoryRecorded`.
    RecordHistory {
        content: String,
        model_label: Option<String>,
    },
    DeleteHistory { id: HistoryId },
    CopyToClipboard { text: String },
    ResetCopiedAfter { delay: Duration, epoch: u64 },
    /// Blocking, user-visible failure notice.
    NotifyFailure { message: String },
    /// Bring the result view into focus.
    RevealResult,
}
