pub mod install_manager;
pub mod log_widget;
mod styles;

pub use install_manager::{start_install, stop_install, ActiveInstalls, InstallManager};
pub use log_widget::LogViewer;
