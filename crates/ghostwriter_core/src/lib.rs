//! Ghostwriter core: pure state machine, file queue, history log and view-model helpers.
mod catalog;
mod effect;
mod history;
mod msg;
mod queue;
mod session;
mod state;
mod update;
mod view_model;

pub use catalog::{
    default_model, find_model, resolve_label, short_label, ModelSpec, MODEL_CATALOG,
};
pub use effect::{Effect, COPIED_FEEDBACK};
pub use history::{
    summarize, HistoryEntry, HistoryId, HistorySlot, HistoryStore, MemorySlot, SlotError,
    UNTITLED,
};
pub use msg::Msg;
pub use queue::{FileId, FileQueue, IncomingFile, PreviewHandle, QueuedFile, UploadPart};
pub use session::{
    GenerationRequest, GenerationSession, Outcome, SubmissionId, SubmissionState, SubmitRejected,
};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView, QueueRowView};
