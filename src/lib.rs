//! Live install-log viewer for the panel backend, rendered with Yew.
//!
//! [`components::InstallManager`] starts installs and mounts one
//! [`components::LogViewer`] per task; each viewer follows the task's log
//! stream over a WebSocket and falls back to polling while it is down.

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod download;
pub mod error;
pub mod link;
pub mod model;
pub mod session;
pub mod state;

pub use app::App;
pub use config::ViewerConfig;
pub use error::{ApiError, InstallError};
pub use model::{InstallParams, LogLevel, LogMessage, TaskId};

/// Installs the console logger and panic hook, then mounts [`App`] on `<body>`.
pub fn run_app() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    log::info!("install log viewer starting");
    yew::Renderer::<App>::new().render();
}
