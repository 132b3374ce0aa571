//! UI state and the actions the toolbar emits.

use glsketch_core::{DrawMode, Rgba};
use serde::{Deserialize, Serialize};

/// Actions triggered by UI controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiAction {
    /// Change the drawing mode.
    SetMode(DrawMode),
    /// Change the color used for new shapes.
    SetColorHex(String),
    /// Change the export file name.
    SetFileName(String),
    /// Remove every shape.
    Clear,
    /// Export the scene under the current file name.
    Export,
    /// Import the selected document. `None` means nothing was picked.
    Import(Option<String>),
    /// The drawing surface changed size.
    Resize { width: u32, height: u32 },
}

/// State mirrored by the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Currently selected mode (mirrored from the session).
    pub mode: DrawMode,
    /// Color picker value.
    pub color_hex: String,
    /// Export file name input. Blank exports as `data.json`.
    pub file_name: String,
    /// Last alert shown to the user.
    pub notice: Option<String>,
}

impl UiState {
    pub fn new(mode: DrawMode, color: Rgba) -> Self {
        Self {
            mode,
            color_hex: color.to_hex(),
            file_name: String::new(),
            notice: None,
        }
    }

    /// File name as a picker selection: `None` when blank.
    pub fn selected_file(&self) -> Option<String> {
        let name = self.file_name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Take the pending notice, clearing it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(DrawMode::default(), Rgba::black())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_file() {
        let mut ui = UiState::default();
        assert_eq!(ui.selected_file(), None);
        ui.file_name = "  sketch ".to_string();
        assert_eq!(ui.selected_file(), Some("sketch".to_string()));
    }

    #[test]
    fn test_action_json() {
        let action: UiAction = serde_json::from_str(r#"{ "SetMode": "Polygon" }"#).unwrap();
        assert_eq!(action, UiAction::SetMode(DrawMode::Polygon));
        let action: UiAction = serde_json::from_str(r#""Export""#).unwrap();
        assert_eq!(action, UiAction::Export);
        let action: UiAction = serde_json::from_str(r#"{ "Import": null }"#).unwrap();
        assert_eq!(action, UiAction::Import(None));
    }
}
