//! glsketch Application
//!
//! The application shell: UI actions, keyboard shortcuts, configuration and
//! the scripted native runner that drive the drawing session and renderer.

mod app;
mod script;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, AppError};
pub use script::{ScriptReport, ScriptStep, SessionScript};
pub use shortcuts::{Shortcut, ShortcutCommand, ShortcutRegistry};
pub use ui::{UiAction, UiState};

#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(not(target_arch = "wasm32"))]
pub use native::run_script_file;
