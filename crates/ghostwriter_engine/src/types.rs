use std::fmt;

use ghostwriter_core::SubmissionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    GenerationCompleted {
        submission: SubmissionId,
        result: Result<String, GenerationError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for GenerationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidResponse,
    EngineStopped,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid service url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
