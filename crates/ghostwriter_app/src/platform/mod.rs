pub mod app;
pub mod clipboard;
pub mod config;
pub mod effects;
mod persistence;
mod ui;

pub use app::run_app;
pub use config::AppConfig;
