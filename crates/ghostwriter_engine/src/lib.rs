//! Ghostwriter engine: generation service client, background execution and local storage.
mod engine;
mod persist;
mod preview;
mod service;
mod types;

pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use persist::{ensure_data_dir, AtomicFileWriter, FileSlot, PersistError, HISTORY_FILENAME};
pub use preview::PreviewCache;
pub use service::{GenerationService, ReqwestGenerationService, ServiceInfo, ServiceSettings};
pub use types::{EngineEvent, FailureKind, GenerationError};
