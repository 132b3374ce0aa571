//! Application state: session, renderer, storage and UI wiring.

use crate::shortcuts::{ShortcutCommand, ShortcutRegistry};
use crate::ui::{UiAction, UiState};
use glsketch_core::document::export_stem;
#[cfg(not(target_arch = "wasm32"))]
use glsketch_core::storage::FileStorage;
use glsketch_core::storage::{Storage, StorageError};
use glsketch_core::{
    ColorError, DEFAULT_HIT_THRESHOLD, DocumentError, DrawingSession, PointerEvent, Rgba,
    SessionConfig, export_file_name,
};
use glsketch_render::{FrameRecorder, RenderContext, Renderer, RendererError, Viewport};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Application errors. Their messages double as user-facing notices.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid script: {0}")]
    Script(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    /// Directory exports are written to and imports read from.
    pub export_dir: PathBuf,
    /// Vertex pick radius in pixels.
    pub threshold: f64,
    pub default_color: Rgba,
    pub background_color: Rgba,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            export_dir: default_export_dir(),
            threshold: DEFAULT_HIT_THRESHOLD,
            default_color: Rgba::black(),
            background_color: Rgba::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// The user's data directory when known, else the working directory.
#[cfg(not(target_arch = "wasm32"))]
fn default_export_dir() -> PathBuf {
    FileStorage::default_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(target_arch = "wasm32")]
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl AppConfig {
    /// Defaults overridden by `GLSKETCH_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Some(width) = parse_var(&lookup, "GLSKETCH_WIDTH")? {
            config.width = width;
        }
        if let Some(height) = parse_var(&lookup, "GLSKETCH_HEIGHT")? {
            config.height = height;
        }
        if let Some(dir) = lookup("GLSKETCH_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(threshold) = parse_var::<f64>(&lookup, "GLSKETCH_THRESHOLD")? {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(AppError::Config(format!(
                    "GLSKETCH_THRESHOLD must be a non-negative number, got {threshold}"
                )));
            }
            config.threshold = threshold;
        }
        if let Some(hex) = lookup("GLSKETCH_COLOR") {
            config.default_color = Rgba::from_hex(&hex)?;
        }
        if let Some(hex) = lookup("GLSKETCH_BACKGROUND") {
            config.background_color = Rgba::from_hex(&hex)?;
        }
        Ok(config)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            threshold: self.threshold,
            color: self.default_color,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, AppError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{key}: cannot parse {raw:?}")))
        })
        .transpose()
}

/// The drawing application.
///
/// Every scene mutation is followed by a full redraw.
pub struct App<S: Storage> {
    config: AppConfig,
    session: DrawingSession,
    renderer: FrameRecorder,
    viewport: Viewport,
    storage: S,
    ui: UiState,
}

impl<S: Storage> App<S> {
    /// Create the app and draw the first (empty) frame.
    pub fn new(config: AppConfig, storage: S) -> Result<Self, AppError> {
        let session = DrawingSession::with_config(config.session_config());
        let ui = UiState::new(session.mode(), session.current_color());
        let mut app = Self {
            viewport: Viewport::new(config.width, config.height),
            config,
            session,
            renderer: FrameRecorder::new(),
            storage,
            ui,
        };
        app.redraw()?;
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn renderer(&self) -> &FrameRecorder {
        &self.renderer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    /// Forward a pointer event. Returns true if the scene changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool, AppError> {
        if !self.session.handle_pointer_event(event) {
            return Ok(false);
        }
        self.redraw()?;
        Ok(true)
    }

    /// Run the shortcut bound to a key. Returns false if the key is unbound.
    pub async fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool) -> Result<bool, AppError> {
        let Some(shortcut) = ShortcutRegistry::find(key, ctrl, shift) else {
            return Ok(false);
        };
        log::debug!("Shortcut {}: {}", shortcut.format(), shortcut.description);
        let action = match shortcut.command {
            ShortcutCommand::SetMode(mode) => UiAction::SetMode(mode),
            ShortcutCommand::Export => UiAction::Export,
            ShortcutCommand::Import => UiAction::Import(self.ui.selected_file()),
            ShortcutCommand::Clear => UiAction::Clear,
        };
        self.apply(action).await?;
        Ok(true)
    }

    /// Apply a UI action. Failures are also posted as the UI notice.
    pub async fn apply(&mut self, action: UiAction) -> Result<(), AppError> {
        let result = self.apply_action(action).await;
        if let Err(e) = &result {
            log::warn!("{e}");
            self.ui.notice = Some(e.to_string());
        }
        result
    }

    async fn apply_action(&mut self, action: UiAction) -> Result<(), AppError> {
        match action {
            UiAction::SetMode(mode) => {
                self.session.set_mode(mode);
                self.ui.mode = mode;
                self.redraw()
            }
            UiAction::SetColorHex(hex) => {
                let color = Rgba::from_hex(&hex)?;
                self.session.set_color(color);
                self.ui.color_hex = color.to_hex();
                Ok(())
            }
            UiAction::SetFileName(name) => {
                self.ui.file_name = name;
                Ok(())
            }
            UiAction::Clear => {
                self.session.clear();
                self.redraw()
            }
            UiAction::Export => self.export().await.map(|_| ()),
            UiAction::Import(selection) => self.import(selection).await,
            UiAction::Resize { width, height } => {
                if width == 0 || height == 0 {
                    return Err(RendererError::InvalidViewport { width, height }.into());
                }
                if self.viewport.resize(width, height) {
                    log::debug!("Viewport resized to {width}x{height}");
                    self.redraw()?;
                }
                Ok(())
            }
        }
    }

    /// Export the scene under the current file name. Returns the file name
    /// written.
    pub async fn export(&mut self) -> Result<String, AppError> {
        let stem = export_stem(&self.ui.file_name).to_string();
        let document = self.session.export_document();
        let file_name = export_file_name(&stem);
        if self.storage.exists(&stem).await? {
            log::info!("Overwriting {file_name}");
        }
        self.storage.save(&stem, &document).await?;
        log::info!("Exported {} shapes to {file_name}", document.shapes.len());
        Ok(file_name)
    }

    /// Names of the stored documents, sorted.
    pub async fn documents(&self) -> Result<Vec<String>, AppError> {
        Ok(self.storage.list().await?)
    }

    /// Import the selected document. The scene is unchanged on error.
    async fn import(&mut self, selection: Option<String>) -> Result<(), AppError> {
        let name = selection
            .filter(|name| !name.trim().is_empty())
            .ok_or(StorageError::EmptyFileSelection)?;
        let document = self.storage.load(export_stem(&name)).await?;
        self.session.load_document(document)?;
        self.redraw()
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        let ctx = RenderContext::new(self.session.scene(), self.viewport)
            .with_background(self.config.background_color.into());
        self.renderer.render(&ctx)?;
        Ok(())
    }
}
