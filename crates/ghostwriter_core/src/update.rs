use ghost_logging::{ghost_debug, ghost_info, ghost_warn};

use crate::catalog::{find_model, resolve_label};
use crate::{AppState, Effect, HistoryEntry, Msg, SubmissionId, COPIED_FEEDBACK};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded(files) => {
            if files.is_empty() {
                return (state, Vec::new());
            }
            let added = state.queue_mut().add(files);
            state.mark_dirty();
            added
                .into_iter()
                .map(|file| Effect::CreatePreview {
                    handle: file.preview,
                    file_id: file.id,
                    name: file.name,
                    data: file.data,
                })
                .collect()
        }
        Msg::FileRemoved(file_id) => match state.remove_file(file_id) {
            Some(handle) => {
                state.mark_dirty();
                vec![Effect::RevokePreview { handle }]
            }
            None => Vec::new(),
        },
        Msg::PreviewOpened(file_id) => {
            if state.queue().contains(file_id) && state.enlarged() != Some(file_id) {
                state.set_enlarged(Some(file_id));
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PreviewClosed => {
            if state.enlarged().is_some() {
                state.set_enlarged(None);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModelSelected(model_id) => {
            if find_model(&model_id).is_none() {
                ghost_warn!("Ignoring unknown model id {}", model_id);
            } else if state.selected_model() != model_id {
                state.set_selected_model(model_id);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GenerateClicked => start_generation(&mut state),
        Msg::GenerationCompleted { submission, result } => {
            finish_generation(&mut state, submission, result)
        }
        Msg::HistoryRecorded(entry) => record_history(&mut state, entry),
        Msg::HistoryRestored(entries) => {
            state.restore_history(entries);
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryPanelOpened => {
            state.set_history_open(true);
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryPanelClosed => {
            state.set_history_open(false);
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryEntryOpened(id) => {
            let Some(content) = state.history_entry(id).map(|entry| entry.content.clone()) else {
                return (state, Vec::new());
            };
            state.set_result(Some(content));
            state.set_copied(false);
            state.set_history_open(false);
            state.mark_dirty();
            vec![Effect::RevealResult]
        }
        Msg::HistoryEntryDeleted(id) => {
            if state.remove_history(id) {
                state.mark_dirty();
                vec![Effect::DeleteHistory { id }]
            } else {
                Vec::new()
            }
        }
        Msg::CopyClicked => match state.result() {
            Some(text) => vec![Effect::CopyToClipboard {
                text: text.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::CopyConfirmed => {
            state.set_copied(true);
            let epoch = state.bump_copied_epoch();
            state.mark_dirty();
            vec![Effect::ResetCopiedAfter {
                delay: COPIED_FEEDBACK,
                epoch,
            }]
        }
        Msg::CopyFailed(reason) => {
            ghost_warn!("Failed to copy result: {}", reason);
            Vec::new()
        }
        Msg::CopiedExpired { epoch } => {
            if state.copied() && epoch == state.copied_epoch() {
                state.set_copied(false);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_generation(state: &mut AppState) -> Vec<Effect> {
    if state.awaiting_record() {
        ghost_debug!("Generate ignored: previous result not yet recorded");
        return Vec::new();
    }
    let model_id = state.selected_model().to_string();
    let (session, queue) = state.session_mut();
    match session.begin(queue, &model_id) {
        Ok(request) => {
            ghost_info!(
                "Submitting {} file(s) to model {} (submission {})",
                request.files.len(),
                request.model_id,
                request.submission
            );
            state.set_result(None);
            state.set_copied(false);
            state.set_last_failure(None);
            state.mark_dirty();
            vec![Effect::Generate(request)]
        }
        Err(reason) => {
            ghost_debug!("Generate ignored: {}", reason);
            Vec::new()
        }
    }
}

fn finish_generation(
    state: &mut AppState,
    submission: SubmissionId,
    result: Result<String, String>,
) -> Vec<Effect> {
    let (session, _) = state.session_mut();
    if !session.settle(submission, &result) {
        ghost_warn!("Dropping stale completion for submission {}", submission);
        return Vec::new();
    }
    let model_label = session
        .model_id()
        .and_then(resolve_label)
        .map(ToString::to_string);
    state.mark_dirty();

    match result {
        Ok(content) => {
            // The queue is cleared once the platform reports the entry as
            // recorded, so the text is on disk before previews go away.
            state.set_result(Some(content.clone()));
            state.set_awaiting_record(true);
            vec![Effect::RecordHistory {
                content,
                model_label,
            }]
        }
        Err(message) => {
            ghost_warn!("Submission {} failed: {}", submission, message);
            state.set_last_failure(Some(message.clone()));
            vec![Effect::NotifyFailure {
                message: format!("Failed to generate the post: {message}"),
            }]
        }
    }
}

fn record_history(state: &mut AppState, entry: HistoryEntry) -> Vec<Effect> {
    let was_awaiting = state.awaiting_record();
    state.prepend_history(entry);
    state.mark_dirty();
    if !was_awaiting {
        return Vec::new();
    }
    state.set_awaiting_record(false);
    state
        .clear_queue()
        .into_iter()
        .map(|handle| Effect::RevokePreview { handle })
        .collect()
}
