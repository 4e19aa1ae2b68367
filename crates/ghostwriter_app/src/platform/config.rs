use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ghost_logging::LogDestination;
use ghostwriter_engine::ServiceSettings;
use log::LevelFilter;

/// Turn screenshots into a Markdown blog draft.
#[derive(Debug, Clone, Parser)]
#[command(name = "ghostwriter", version, about)]
pub struct AppConfig {
    /// Base URL of the generation service.
    #[arg(long, env = "GHOSTWRITER_SERVER_URL", default_value = "http://localhost:8000")]
    pub server_url: String,

    /// Directory holding the persisted history.
    #[arg(long, env = "GHOSTWRITER_DATA_DIR", default_value = ".ghostwriter")]
    pub data_dir: PathBuf,

    /// Initially selected model id.
    #[arg(long)]
    pub model: Option<String>,

    /// Where log output goes: file, terminal or both.
    #[arg(long, default_value = "file")]
    pub log: LogDestination,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "GHOSTWRITER_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Upper bound for one generation request, in seconds.
    #[arg(long, default_value_t = 300)]
    pub request_timeout_secs: u64,

    /// Files to queue on startup.
    pub files: Vec<PathBuf>,
}

impl AppConfig {
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.server_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ServiceSettings::default()
        }
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from("./ghostwriter.log")
    }
}
