use std::path::Path;
use std::sync::mpsc;
use std::thread;

use ghost_logging::{ghost_error, ghost_info, ghost_warn};
use ghostwriter_core::{Effect, HistorySlot, HistoryStore, Msg, PreviewHandle};
use ghostwriter_engine::{EngineEvent, EngineHandle, EventSink, PreviewCache};

use super::app::AppEvent;
use super::clipboard::ClipboardPort;

/// Forwards engine completions into the app loop as messages.
pub struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::GenerationCompleted { submission, result } => Msg::GenerationCompleted {
                submission,
                result: result.map_err(|err| err.to_string()),
            },
        };
        let _ = self.tx.send(AppEvent::Msg(msg));
    }
}

/// What the UI needs to know after a batch of effects ran.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EffectOutput {
    /// Messages to dispatch right away, in order.
    pub follow_ups: Vec<Msg>,
    /// Blocking failure notices for the user.
    pub notices: Vec<String>,
    pub reveal_result: bool,
}

pub struct EffectRunner<S: HistorySlot, C: ClipboardPort> {
    engine: EngineHandle,
    history: HistoryStore<S>,
    previews: PreviewCache,
    clipboard: C,
    events: mpsc::Sender<AppEvent>,
}

impl<S: HistorySlot, C: ClipboardPort> EffectRunner<S, C> {
    pub fn new(
        engine: EngineHandle,
        history: HistoryStore<S>,
        previews: PreviewCache,
        clipboard: C,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            engine,
            history,
            previews,
            clipboard,
            events,
        }
    }

    /// Reads the persisted history once at startup.
    pub fn restore_history(&mut self) -> Msg {
        Msg::HistoryRestored(self.history.load_all())
    }

    pub fn preview_path(&self, handle: PreviewHandle) -> Option<&Path> {
        self.previews.path(handle)
    }

    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    pub fn run(&mut self, effects: Vec<Effect>) -> EffectOutput {
        let mut output = EffectOutput::default();
        for effect in effects {
            match effect {
                Effect::CreatePreview {
                    handle,
                    file_id,
                    name,
                    data,
                } => {
                    if let Err(err) = self.previews.create(handle, &name, &data) {
                        ghost_warn!("No preview for file {} ({}): {}", file_id, name, err);
                    }
                }
                Effect::RevokePreview { handle } => {
                    self.previews.revoke(handle);
                }
                Effect::Generate(request) => {
                    ghost_info!(
                        "Generate submission={} model={} files={}",
                        request.submission,
                        request.model_id,
                        request.files.len()
                    );
                    self.engine.generate(request);
                }
                Effect::RecordHistory {
                    content,
                    model_label,
                } => {
                    let entry = self.history.add(content, model_label);
                    output.follow_ups.push(Msg::HistoryRecorded(entry));
                }
                Effect::DeleteHistory { id } => {
                    if !self.history.remove(id) {
                        ghost_warn!("History entry {} was already gone", id);
                    }
                }
                Effect::CopyToClipboard { text } => {
                    output.follow_ups.push(match self.clipboard.write_text(&text) {
                        Ok(()) => Msg::CopyConfirmed,
                        Err(reason) => Msg::CopyFailed(reason),
                    });
                }
                Effect::ResetCopiedAfter { delay, epoch } => {
                    let events = self.events.clone();
                    let spawned = thread::Builder::new()
                        .name("copied-reset".to_string())
                        .spawn(move || {
                            thread::sleep(delay);
                            let _ = events.send(AppEvent::Msg(Msg::CopiedExpired { epoch }));
                        });
                    if let Err(err) = spawned {
                        ghost_error!("Failed to schedule copied reset: {}", err);
                        output.follow_ups.push(Msg::CopiedExpired { epoch });
                    }
                }
                Effect::NotifyFailure { message } => output.notices.push(message),
                Effect::RevealResult => output.reveal_result = true,
            }
        }
        output
    }
}
