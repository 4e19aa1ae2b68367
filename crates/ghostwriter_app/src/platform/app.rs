use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use ghost_logging::{ghost_debug, ghost_info, ghost_warn};
use ghostwriter_core::{update, AppState, AppViewModel, HistorySlot, Msg};
use ghostwriter_engine::{EngineHandle, PreviewCache};

use super::clipboard::{ClipboardPort, SystemClipboard};
use super::config::AppConfig;
use super::effects::{EffectRunner, MsgSink};
use super::persistence;
use super::ui::input::{self, Command, HELP};
use super::ui::render;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    Msg(Msg),
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    ghost_logging::initialize(config.log, config.log_level, &config.log_path());
    ghost_info!(
        "Starting ghostwriter server={} data_dir={:?}",
        config.server_url,
        config.data_dir
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let engine = EngineHandle::new(
        config.service_settings(),
        Arc::new(MsgSink::new(event_tx.clone())),
    )
    .context("failed to start the generation engine")?;
    let previews = PreviewCache::new().context("failed to create the preview directory")?;
    let history = persistence::open_history(&config.data_dir);
    let runner = EffectRunner::new(
        engine,
        history,
        previews,
        SystemClipboard::new(),
        event_tx.clone(),
    );

    let mut session = Session::new(runner);
    let restored = session.runner.restore_history();
    session.dispatch(restored);
    if let Some(model) = &config.model {
        session.dispatch(Msg::ModelSelected(model.clone()));
    }
    if !config.files.is_empty() {
        session.add_files(&config.files);
    }
    session.print_screen();
    println!("Type 'help' for commands.");

    spawn_input_reader(event_tx);

    let mut input_closed = false;
    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Input(line) => {
                if !session.handle_line(&line) {
                    break;
                }
            }
            AppEvent::InputClosed => {
                input_closed = true;
            }
            AppEvent::Msg(msg) => session.dispatch(msg),
        }
        // Scripted input: stay until the last submission settles.
        if input_closed && !session.busy() {
            break;
        }
        prompt();
    }

    ghost_info!(
        "Exiting ghostwriter with {} live preview(s)",
        session.runner.live_previews()
    );
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(AppEvent::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        ghost_warn!("Failed to read input: {}", err);
                        break;
                    }
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        });
    if let Err(err) = spawned {
        ghost_warn!("Failed to spawn input reader: {}", err);
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Owns the state and feeds messages through `update` and the effect runner.
struct Session<S: HistorySlot, C: ClipboardPort> {
    state: AppState,
    runner: EffectRunner<S, C>,
}

impl<S: HistorySlot, C: ClipboardPort> Session<S, C> {
    fn new(runner: EffectRunner<S, C>) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn busy(&self) -> bool {
        self.view().generating_label.is_some()
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        let result_before = self.state.result().map(str::to_owned);
        let mut inbox = VecDeque::from([msg]);
        let mut reveal = false;
        while let Some(msg) = inbox.pop_front() {
            ghost_debug!("Dispatch {:?}", std::mem::discriminant(&msg));
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;

            let output = self.runner.run(effects);
            inbox.extend(output.follow_ups);
            for notice in output.notices {
                eprintln!("! {}", notice);
            }
            reveal |= output.reveal_result;
        }

        if self.state.consume_dirty() {
            self.print_screen();
        }
        let result_changed = self.state.result().is_some()
            && self.state.result() != result_before.as_deref();
        if reveal || result_changed {
            print!("{}", render::render_result(&self.view()));
        }
    }

    fn print_screen(&self) {
        let view = self.view();
        print!("{}", render::render(&view, self.enlarged_preview()));
    }

    fn enlarged_preview(&self) -> Option<&Path> {
        let file_id = self.state.enlarged()?;
        let file = self.state.queue().get(file_id)?;
        self.runner.preview_path(file.preview)
    }

    fn add_files(&mut self, paths: &[std::path::PathBuf]) {
        let (files, skipped) = input::load_files(paths);
        for note in skipped {
            eprintln!("skipped {}", note);
        }
        if !files.is_empty() {
            self.dispatch(Msg::FilesAdded(files));
        }
    }

    /// Handles one input line. Returns `false` when the user quits.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match input::parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{}", err);
                return true;
            }
        };
        let view = self.view();
        match command {
            Command::Empty => {}
            Command::Quit => return false,
            Command::Help => println!("{}", HELP),
            Command::Add(paths) => self.add_files(&paths),
            Command::Remove(n) => match view.queue.get(n - 1) {
                Some(row) => self.dispatch(Msg::FileRemoved(row.file_id)),
                None => eprintln!("no queued file {}", n),
            },
            Command::View(n) => match view.queue.get(n - 1) {
                Some(row) => self.dispatch(Msg::PreviewOpened(row.file_id)),
                None => eprintln!("no queued file {}", n),
            },
            Command::Close => self.dispatch(Msg::PreviewClosed),
            Command::Models => print!("{}", render::render_models(&view.selected_model)),
            Command::Model(id) => self.dispatch(Msg::ModelSelected(id)),
            Command::Generate => {
                if view.queue.is_empty() {
                    eprintln!("queue is empty; add screenshots first");
                } else if !view.can_generate {
                    eprintln!("a generation is already running");
                } else {
                    self.dispatch(Msg::GenerateClicked);
                }
            }
            Command::Show => print!("{}", render::render_result(&view)),
            Command::Copy => {
                if view.result.is_none() {
                    eprintln!("nothing to copy yet");
                } else {
                    self.dispatch(Msg::CopyClicked);
                }
            }
            Command::History => self.dispatch(Msg::HistoryPanelOpened),
            Command::Hide => self.dispatch(Msg::HistoryPanelClosed),
            Command::Open(n) => match view.history.get(n - 1) {
                Some(row) => self.dispatch(Msg::HistoryEntryOpened(row.id)),
                None => eprintln!("no history entry {}", n),
            },
            Command::Delete(n) => match view.history.get(n - 1) {
                Some(row) => self.dispatch(Msg::HistoryEntryDeleted(row.id)),
                None => eprintln!("no history entry {}", n),
            },
        }
        true
    }
}
