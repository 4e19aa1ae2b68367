use thiserror::Error;

use crate::queue::{FileQueue, UploadPart};

pub type SubmissionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Settled(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure,
}

/// Everything the generation service needs for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub submission: SubmissionId,
    pub model_id: String,
    pub files: Vec<UploadPart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("no files queued")]
    EmptySubmission,
    #[error("a submission is already pending")]
    AlreadyPending,
}

/// Tri-state submit cycle. At most one submission is pending at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationSession {
    state: SubmissionState,
    current: SubmissionId,
    model_id: Option<String>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Model of the most recent accepted submission.
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }

    /// Moves to `Pending` and packages the queue, or rejects without any change.
    pub fn begin(
        &mut self,
        queue: &FileQueue,
        model_id: &str,
    ) -> Result<GenerationRequest, SubmitRejected> {
        if self.is_pending() {
            return Err(SubmitRejected::AlreadyPending);
        }
        if queue.is_empty() {
            return Err(SubmitRejected::EmptySubmission);
        }
        self.current += 1;
        self.state = SubmissionState::Pending;
        self.model_id = Some(model_id.to_string());
        Ok(GenerationRequest {
            submission: self.current,
            model_id: model_id.to_string(),
            files: queue.upload_parts(),
        })
    }

    /// Settles the pending submission. Returns `false` for a stale or
    /// unexpected completion, which leaves the state untouched.
    pub fn settle(&mut self, submission: SubmissionId, result: &Result<String, String>) -> bool {
        if !self.is_pending() || submission != self.current {
            return false;
        }
        self.state = SubmissionState::Settled(match result {
            Ok(text) => Outcome::Success(text.clone()),
            Err(_) => Outcome::Failure,
        });
        true
    }
}
