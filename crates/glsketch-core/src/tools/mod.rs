//! Shape construction state machine.
//!
//! A [`DrawingSession`] interprets pointer events against the current
//! [`DrawMode`] and mutates its [`Scene`]. Previews are always re-derived from
//! the shape's anchor, so intermediate pointer positions never leave phantom
//! vertices behind.

use crate::color::Rgba;
use crate::document::{DocumentError, SceneDocument};
use crate::geometry::{distance, rectangle_from_drag, square_from_drag};
use crate::hit_test::{ChangeTarget, DEFAULT_HIT_THRESHOLD, find_nearest_vertex};
use crate::input::PointerEvent;
use crate::scene::{Scene, SceneError, Shape, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available drawing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DrawMode {
    #[default]
    Line,
    Square,
    Rectangle,
    Polygon,
    VertexEdit,
}

impl DrawMode {
    /// All modes in toolbar order.
    pub const ALL: [DrawMode; 5] = [
        DrawMode::Line,
        DrawMode::Square,
        DrawMode::Rectangle,
        DrawMode::Polygon,
        DrawMode::VertexEdit,
    ];

    /// Kind of shape this mode creates, if any.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            DrawMode::Line => Some(ShapeKind::Line),
            DrawMode::Square => Some(ShapeKind::Square),
            DrawMode::Rectangle => Some(ShapeKind::Rectangle),
            DrawMode::Polygon => Some(ShapeKind::Polygon),
            DrawMode::VertexEdit => None,
        }
    }

    /// Display name for this mode.
    pub fn name(self) -> &'static str {
        match self {
            DrawMode::Line => "Line",
            DrawMode::Square => "Square",
            DrawMode::Rectangle => "Rectangle",
            DrawMode::Polygon => "Polygon",
            DrawMode::VertexEdit => "Edit vertex",
        }
    }
}

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hit-test radius in pixels.
    pub threshold: f64,
    /// Initial drawing color.
    pub color: Rgba,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HIT_THRESHOLD,
            color: Rgba::black(),
        }
    }
}

/// Owns the scene and the interaction state that drives it.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    scene: Scene,
    mode: DrawMode,
    /// Set while a drag is in progress, or while an open polygon shows a
    /// preview vertex.
    held: bool,
    current_color: Rgba,
    change_target: Option<ChangeTarget>,
    threshold: f64,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::with_config(SessionConfig::default())
    }
}

impl DrawingSession {
    /// Create a session with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            scene: Scene::new(),
            mode: DrawMode::default(),
            held: false,
            current_color: config.color,
            change_target: None,
            threshold: config.threshold,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn current_color(&self) -> Rgba {
        self.current_color
    }

    pub fn change_target(&self) -> Option<ChangeTarget> {
        self.change_target
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Switch drawing mode.
    ///
    /// A shape left open by the previous mode is closed in place; an open
    /// polygon loses its preview vertex first.
    pub fn set_mode(&mut self, mode: DrawMode) {
        if mode == self.mode {
            return;
        }
        self.abandon_open_shape();
        self.change_target = None;
        log::info!("Draw mode: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
    }

    /// Color applied to shapes created from now on.
    pub fn set_color(&mut self, color: Rgba) {
        self.current_color = color;
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.scene.reset();
        self.held = false;
        self.change_target = None;
        log::info!("Scene cleared");
    }

    /// Snapshot the scene for export.
    ///
    /// An open polygon is exported with its committed vertices only; the
    /// preview vertex never reaches the document.
    pub fn export_document(&self) -> SceneDocument {
        let mut doc = self.scene.serialize();
        if self.has_polygon_preview() {
            if let Some(record) = doc.shapes.get_mut(self.scene.active_index()) {
                let coords = record.vertices.len().saturating_sub(2);
                record.vertices.truncate(coords);
                record.colors.truncate(coords * 2);
            }
        }
        doc
    }

    /// Whether the open shape is a polygon carrying a preview vertex.
    fn has_polygon_preview(&self) -> bool {
        self.held
            && matches!(
                self.scene.current_shape(),
                Ok(shape) if shape.kind == ShapeKind::Polygon
            )
    }

    /// Replace the scene with an imported document.
    ///
    /// On error the scene and interaction state are left unchanged.
    pub fn import_document(&mut self, doc: &serde_json::Value) -> Result<(), DocumentError> {
        self.load_document(SceneDocument::from_value(doc)?)
    }

    /// Replace the scene with an already parsed document.
    pub fn load_document(&mut self, doc: SceneDocument) -> Result<(), DocumentError> {
        self.scene = doc.into_scene()?;
        self.held = false;
        self.change_target = None;
        log::info!("Imported {} shapes", self.scene.len());
        Ok(())
    }

    /// Parse and import a JSON document.
    pub fn import_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))?;
        self.import_document(&value)
    }

    /// Dispatch a pointer event. Returns true if the scene changed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        if !event.is_primary() {
            return false;
        }
        match event {
            PointerEvent::Down { position, .. } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
        }
    }

    /// Handle a press. Returns true if the scene changed.
    pub fn pointer_down(&mut self, p: Point) -> bool {
        let result = match self.mode {
            DrawMode::Line => self.begin_shape(ShapeKind::Line, &[p, p]),
            DrawMode::Square => self.begin_shape(ShapeKind::Square, &[p; 4]),
            DrawMode::Rectangle => self.begin_shape(ShapeKind::Rectangle, &[p; 4]),
            DrawMode::Polygon => self.polygon_click(p),
            DrawMode::VertexEdit => {
                self.change_target = find_nearest_vertex(p, &self.scene, self.threshold);
                log::debug!("Vertex pick at {p:?}: {:?}", self.change_target);
                Ok(false)
            }
        };
        self.settle("down", result)
    }

    /// Handle a pointer move. Only acts while the pointer is held.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        if !self.held {
            return false;
        }
        let result = match self.mode {
            DrawMode::Line => self.update_preview(ShapeKind::Line, 2, |_| vec![p]),
            DrawMode::Square => self.update_corners(ShapeKind::Square, p),
            DrawMode::Rectangle => self.update_corners(ShapeKind::Rectangle, p),
            DrawMode::Polygon => self.update_preview(ShapeKind::Polygon, 2, |_| vec![p]),
            DrawMode::VertexEdit => Ok(false),
        };
        self.settle("move", result)
    }

    /// Handle a release. Returns true if the scene changed.
    pub fn pointer_up(&mut self, p: Point) -> bool {
        let result = match self.mode {
            DrawMode::Line | DrawMode::Square | DrawMode::Rectangle => {
                if !self.held {
                    return false;
                }
                self.held = false;
                if self.scene.has_open_shape() {
                    self.scene.advance_cursor();
                    Ok(true)
                } else {
                    Err(SceneError::NoActiveShape)
                }
            }
            // Polygons close on press, not release.
            DrawMode::Polygon => Ok(false),
            DrawMode::VertexEdit => match self.change_target.take() {
                Some(target) => self.relocate_vertex(target, p),
                None => Ok(false),
            },
        };
        self.settle("up", result)
    }

    /// Out-of-order events degrade to no-ops.
    fn settle(&self, event: &str, result: Result<bool, SceneError>) -> bool {
        match result {
            Ok(changed) => changed,
            Err(SceneError::NoActiveShape) => {
                log::debug!("Pointer {event} ignored: nothing to mutate");
                false
            }
            Err(e) => {
                log::warn!("Pointer {event} ignored: {e}");
                false
            }
        }
    }

    /// Start a new shape made of `points`.
    fn begin_shape(&mut self, kind: ShapeKind, points: &[Point]) -> Result<bool, SceneError> {
        self.abandon_open_shape();
        let index = self.scene.append_shape(kind, kind.default_mode());
        self.scene
            .replace_trailing_vertices(0, points, self.current_color)?;
        self.held = true;
        log::debug!("Started {} #{index}", kind.token());
        Ok(true)
    }

    /// The open shape, provided it is of `kind`.
    fn open_shape(&self, kind: ShapeKind) -> Result<&Shape, SceneError> {
        let shape = self.scene.current_shape()?;
        if shape.kind != kind {
            return Err(SceneError::NoActiveShape);
        }
        Ok(shape)
    }

    /// Replace `count` trailing coordinates of the open shape with points
    /// derived from it.
    fn update_preview(
        &mut self,
        kind: ShapeKind,
        count: usize,
        derive: impl FnOnce(&Shape) -> Vec<Point>,
    ) -> Result<bool, SceneError> {
        let shape = self.open_shape(kind)?;
        // Lines and boxes stay one color; polygon vertices take the color
        // current when they are placed.
        let color = match kind {
            ShapeKind::Polygon => self.current_color,
            _ => shape_color(shape, self.current_color),
        };
        let points = derive(shape);
        self.scene.replace_trailing_vertices(count, &points, color)?;
        Ok(true)
    }

    /// Recompute the three derived corners of an open square or rectangle.
    fn update_corners(&mut self, kind: ShapeKind, p: Point) -> Result<bool, SceneError> {
        let shape = self.open_shape(kind)?;
        if shape.vertex_count() != 4 {
            return Err(SceneError::InvariantViolation(format!(
                "{} has {} vertices",
                kind.token(),
                shape.vertex_count()
            )));
        }
        let anchor = shape.first_vertex().ok_or(SceneError::NoActiveShape)?;
        let corners = match kind {
            ShapeKind::Square => square_from_drag(anchor, p),
            _ => rectangle_from_drag(anchor, p),
        };
        self.update_preview(kind, 6, |_| corners[1..].to_vec())
    }

    /// A click while drawing a polygon.
    fn polygon_click(&mut self, p: Point) -> Result<bool, SceneError> {
        let continuing = matches!(
            self.scene.current_shape(),
            Ok(shape) if shape.kind == ShapeKind::Polygon
        );
        if !continuing {
            return self.begin_shape(ShapeKind::Polygon, &[p, p]);
        }

        // Only a held polygon carries a preview vertex.
        let preview = if self.held { 2 } else { 0 };
        let shape = self.scene.current_shape()?;
        let color = self.current_color;
        let committed = shape.vertex_count().saturating_sub(preview / 2);
        let near_first = shape
            .first_vertex()
            .is_some_and(|first| distance(first, p) <= self.threshold);

        if committed >= 3 && near_first {
            self.scene.replace_trailing_vertices(preview, &[], color)?;
            self.scene.advance_cursor();
            self.held = false;
            log::debug!("Closed polygon with {committed} vertices");
        } else {
            self.scene.replace_trailing_vertices(preview, &[p, p], color)?;
            self.held = true;
        }
        Ok(true)
    }

    /// Move the picked vertex to `p`.
    fn relocate_vertex(&mut self, target: ChangeTarget, p: Point) -> Result<bool, SceneError> {
        let shape = self
            .scene
            .shape_mut(target.shape_index)
            .ok_or(SceneError::NoActiveShape)?;
        match shape.kind {
            ShapeKind::Line => {
                shape.set_vertex(target.vertex_index, p)?;
                Ok(true)
            }
            ShapeKind::Square | ShapeKind::Rectangle => {
                if shape.vertex_count() != 4 {
                    return Err(SceneError::InvariantViolation(format!(
                        "{} has {} vertices",
                        shape.kind.token(),
                        shape.vertex_count()
                    )));
                }
                let anchor = opposite_corner(shape, target.vertex_index)?;
                let corners = match shape.kind {
                    ShapeKind::Square => square_from_drag(anchor, p),
                    _ => rectangle_from_drag(anchor, p),
                };
                shape.set_vertices(&corners)?;
                Ok(true)
            }
            ShapeKind::Polygon => {
                log::debug!("Vertex editing is not supported for polygons");
                Ok(false)
            }
        }
    }

    /// Close whatever shape is still open so the cursor never lags behind.
    fn abandon_open_shape(&mut self) {
        if !self.scene.has_open_shape() {
            self.held = false;
            return;
        }
        if self.has_polygon_preview() {
            if let Err(e) = self
                .scene
                .replace_trailing_vertices(2, &[], self.current_color)
            {
                log::warn!("Could not drop polygon preview: {e}");
            }
        }
        log::debug!("Abandoning open shape #{}", self.scene.active_index());
        self.scene.close_open_shapes();
        self.held = false;
    }
}

/// Color of the shape's anchor, falling back to `fallback` for empty shapes.
fn shape_color(shape: &Shape, fallback: Rgba) -> Rgba {
    shape.colors().first().copied().unwrap_or(fallback)
}

/// The corner sharing neither coordinate with the grabbed one.
///
/// Degenerate shapes have no such corner; the diagonal slot of the corner
/// ordering is used instead.
fn opposite_corner(shape: &Shape, grabbed_index: usize) -> Result<Point, SceneError> {
    let grabbed = shape.vertex(grabbed_index).ok_or_else(|| {
        SceneError::InvariantViolation(format!("vertex {grabbed_index} out of range"))
    })?;
    shape
        .points()
        .find(|q| q.x != grabbed.x && q.y != grabbed.y)
        .or_else(|| shape.vertex((grabbed_index + 2) % 4))
        .ok_or_else(|| SceneError::InvariantViolation("no opposite corner".to_string()))
}
