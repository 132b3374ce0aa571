//! Replayable session scripts.
//!
//! ```json
//! { "steps": [
//!     { "step": "action", "action": { "SetMode": "Square" } },
//!     { "step": "pointer", "event": { "type": "Down", "position": { "x": 10, "y": 10 } } },
//!     { "step": "key", "key": "S", "ctrl": true }
//! ] }
//! ```

use crate::app::{App, AppError};
use crate::ui::UiAction;
use glsketch_core::PointerEvent;
use glsketch_core::storage::Storage;
use serde::{Deserialize, Serialize};

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Action {
        action: UiAction,
    },
    Pointer {
        event: PointerEvent,
    },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
}

/// A recorded sequence of UI actions, pointer events and key presses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    pub steps: Vec<ScriptStep>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub steps: usize,
    /// Steps that posted a notice instead of completing.
    pub failures: usize,
    pub frames: usize,
}

impl SessionScript {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::Script(e.to_string()))
    }

    /// Replay every step against `app`.
    ///
    /// A failing step behaves like an alert in the UI: it is logged and the
    /// replay continues.
    pub async fn replay<S: Storage>(&self, app: &mut App<S>) -> ScriptReport {
        let mut report = ScriptReport::default();
        for (index, step) in self.steps.iter().enumerate() {
            report.steps += 1;
            let result = match step {
                ScriptStep::Action { action } => app.apply(action.clone()).await,
                ScriptStep::Pointer { event } => app.handle_pointer(*event).map(|_| ()),
                ScriptStep::Key { key, ctrl, shift } => {
                    app.handle_key(key, *ctrl, *shift).await.map(|_| ())
                }
            };
            if let Err(e) = result {
                log::warn!("Step {index} failed: {e}");
                report.failures += 1;
            }
            log::debug!(
                "Step {index}: {} shapes, frame {}",
                app.session().scene().len(),
                app.renderer().frame_count()
            );
        }
        report.frames = app.renderer().frame_count();
        report
    }
}
