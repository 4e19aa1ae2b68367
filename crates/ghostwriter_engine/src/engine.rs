use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use ghost_logging::{ghost_debug, ghost_warn};
use ghostwriter_core::GenerationRequest;

use crate::service::{GenerationService, ReqwestGenerationService, ServiceSettings};
use crate::{EngineEvent, FailureKind, GenerationError};

enum EngineCommand {
    Generate(GenerationRequest),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs generation requests on a background tokio runtime and reports
/// completions through an [`EventSink`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    sink: Arc<dyn EventSink>,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        Self::with_service(Arc::new(ReqwestGenerationService::new(settings)), sink)
    }

    pub fn with_service(
        service: Arc<dyn GenerationService>,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let worker_sink = sink.clone();
        thread::Builder::new()
            .name("ghostwriter-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let service = service.clone();
                    let sink = worker_sink.clone();
                    runtime.spawn(async move {
                        handle_command(service.as_ref(), command, sink.as_ref()).await;
                    });
                }
                ghost_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, sink })
    }

    pub fn generate(&self, request: GenerationRequest) {
        let submission = request.submission;
        if self.cmd_tx.send(EngineCommand::Generate(request)).is_err() {
            ghost_warn!("Engine worker is gone; failing submission {}", submission);
            self.sink.emit(EngineEvent::GenerationCompleted {
                submission,
                result: Err(GenerationError::new(
                    FailureKind::EngineStopped,
                    "engine worker is not running",
                )),
            });
        }
    }
}

async fn handle_command(
    service: &dyn GenerationService,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Generate(request) => {
            let result = service.generate(&request).await;
            sink.emit(EngineEvent::GenerationCompleted {
                submission: request.submission,
                result,
            });
        }
    }
}
