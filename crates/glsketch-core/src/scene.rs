//! Scene model: the ordered list of shapes that gets rendered and exported.

use crate::color::Rgba;
use crate::document::{DocumentError, SceneDocument};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scene mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("No active shape to mutate")]
    NoActiveShape,
    #[error("Scene invariant violated: {0}")]
    InvariantViolation(String),
}

/// Kind of shape, decided by the draw mode that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Square,
    Rectangle,
    Polygon,
}

impl ShapeKind {
    /// Token used in the document format.
    pub fn token(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "line" => Some(ShapeKind::Line),
            "square" => Some(ShapeKind::Square),
            "rectangle" => Some(ShapeKind::Rectangle),
            "polygon" => Some(ShapeKind::Polygon),
            _ => None,
        }
    }

    /// Primitive mode new shapes of this kind are drawn with.
    /// Exact vertex count a finished shape of this kind has. Polygons grow
    /// without bound.
    pub fn fixed_vertex_count(self) -> Option<usize> {
        match self {
            ShapeKind::Line => Some(2),
            ShapeKind::Square | ShapeKind::Rectangle => Some(4),
            ShapeKind::Polygon => None,
        }
    }

    pub fn default_mode(self) -> PrimitiveMode {
        match self {
            ShapeKind::Line => PrimitiveMode::LineList,
            ShapeKind::Square | ShapeKind::Rectangle => PrimitiveMode::LineLoop,
            ShapeKind::Polygon => PrimitiveMode::TriangleFan,
        }
    }
}

/// How a vertex sequence is assembled into visible geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PrimitiveMode {
    /// Disjoint segments (`LINES`).
    LineList,
    /// Closed outline (`LINE_LOOP`).
    LineLoop,
    /// Filled fan (`TRIANGLE_FAN`).
    TriangleFan,
}

impl PrimitiveMode {
    /// WebGL primitive constant.
    pub const fn gl_constant(self) -> u32 {
        match self {
            PrimitiveMode::LineList => 0x0001,
            PrimitiveMode::LineLoop => 0x0002,
            PrimitiveMode::TriangleFan => 0x0006,
        }
    }

    pub fn from_gl_constant(value: u32) -> Option<Self> {
        match value {
            0x0001 => Some(PrimitiveMode::LineList),
            0x0002 => Some(PrimitiveMode::LineLoop),
            0x0006 => Some(PrimitiveMode::TriangleFan),
            _ => None,
        }
    }
}

impl From<PrimitiveMode> for u32 {
    fn from(mode: PrimitiveMode) -> Self {
        mode.gl_constant()
    }
}

impl TryFrom<u32> for PrimitiveMode {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PrimitiveMode::from_gl_constant(value)
            .ok_or_else(|| format!("unknown primitive mode {value}"))
    }
}

/// One entry in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Flat `x, y` pairs in draw order.
    pub(crate) vertices: Vec<f64>,
    /// One color per vertex.
    pub(crate) colors: Vec<Rgba>,
    pub mode: PrimitiveMode,
}

impl Shape {
    /// Create an empty shape.
    pub fn new(kind: ShapeKind, mode: PrimitiveMode) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            colors: Vec::new(),
            mode,
        }
    }

    /// Rebuild a shape from raw buffers, checking color cardinality and the
    /// vertex count its kind requires.
    pub fn from_parts(
        kind: ShapeKind,
        mode: PrimitiveMode,
        vertices: Vec<f64>,
        colors: Vec<Rgba>,
    ) -> Result<Self, SceneError> {
        if vertices.len() % 2 != 0 {
            return Err(SceneError::InvariantViolation(format!(
                "odd coordinate count {}",
                vertices.len()
            )));
        }
        if colors.len() != vertices.len() / 2 {
            return Err(SceneError::InvariantViolation(format!(
                "{} colors for {} vertices",
                colors.len(),
                vertices.len() / 2
            )));
        }
        let shape = Self {
            kind,
            vertices,
            colors,
            mode,
        };
        shape.check_invariants()?;
        Ok(shape)
    }

    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex at `index`, if present.
    pub fn vertex(&self, index: usize) -> Option<Point> {
        let x = *self.vertices.get(index * 2)?;
        let y = *self.vertices.get(index * 2 + 1)?;
        Some(Point::new(x, y))
    }

    /// The anchor of the shape.
    pub fn first_vertex(&self) -> Option<Point> {
        self.vertex(0)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
    }

    /// Append a vertex with its color.
    pub fn push_vertex(&mut self, point: Point, color: Rgba) {
        self.vertices.push(point.x);
        self.vertices.push(point.y);
        self.colors.push(color);
    }

    /// Overwrite the vertex at `index` in place.
    pub fn set_vertex(&mut self, index: usize, point: Point) -> Result<(), SceneError> {
        if index >= self.vertex_count() {
            return Err(SceneError::InvariantViolation(format!(
                "vertex {index} out of range ({} vertices)",
                self.vertex_count()
            )));
        }
        self.vertices[index * 2] = point.x;
        self.vertices[index * 2 + 1] = point.y;
        Ok(())
    }

    /// Replace every vertex position, keeping colors. The count must match.
    pub fn set_vertices(&mut self, points: &[Point]) -> Result<(), SceneError> {
        if points.len() != self.vertex_count() {
            return Err(SceneError::InvariantViolation(format!(
                "cannot replace {} vertices with {}",
                self.vertex_count(),
                points.len()
            )));
        }
        self.vertices = points.iter().flat_map(|p| [p.x, p.y]).collect();
        Ok(())
    }

    /// Pop `count` trailing coordinates and append `points` colored `color`.
    ///
    /// Validation happens before any mutation, so a failed call leaves the
    /// shape untouched.
    pub fn replace_trailing_vertices(
        &mut self,
        count: usize,
        points: &[Point],
        color: Rgba,
    ) -> Result<(), SceneError> {
        if count % 2 != 0 {
            return Err(SceneError::InvariantViolation(format!(
                "trailing coordinate count {count} is odd"
            )));
        }
        if count > self.vertices.len() {
            return Err(SceneError::InvariantViolation(format!(
                "cannot pop {count} coordinates from {}",
                self.vertices.len()
            )));
        }
        self.vertices.truncate(self.vertices.len() - count);
        self.colors.truncate(self.colors.len() - count / 2);
        for &point in points {
            self.push_vertex(point, color);
        }
        Ok(())
    }

    /// Check that every vertex has exactly one color and that lines, squares
    /// and rectangles have their fixed vertex count.
    pub fn check_invariants(&self) -> Result<(), SceneError> {
        if self.vertices.len() % 2 != 0 || self.colors.len() != self.vertices.len() / 2 {
            return Err(SceneError::InvariantViolation(format!(
                "{} shape has {} coordinates and {} colors",
                self.kind.token(),
                self.vertices.len(),
                self.colors.len()
            )));
        }
        if let Some(expected) = self.kind.fixed_vertex_count() {
            if self.vertex_count() != expected {
                return Err(SceneError::InvariantViolation(format!(
                    "{} shape has {} vertices, expected {expected}",
                    self.kind.token(),
                    self.vertex_count()
                )));
            }
        }
        Ok(())
    }
}

/// Ordered shapes plus the cursor of the shape under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    shapes: Vec<Shape>,
    /// Shapes before this index are closed.
    active_index: usize,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a scene from parts.
    pub fn from_parts(shapes: Vec<Shape>, active_index: usize) -> Result<Self, SceneError> {
        let scene = Self {
            shapes,
            active_index,
        };
        scene.check_invariants()?;
        Ok(scene)
    }

    /// Push a new empty shape and return its index.
    pub fn append_shape(&mut self, kind: ShapeKind, mode: PrimitiveMode) -> usize {
        self.shapes.push(Shape::new(kind, mode));
        self.shapes.len() - 1
    }

    /// The open shape, if any.
    pub fn current_shape(&self) -> Result<&Shape, SceneError> {
        self.shapes
            .get(self.active_index)
            .ok_or(SceneError::NoActiveShape)
    }

    pub fn current_shape_mut(&mut self) -> Result<&mut Shape, SceneError> {
        self.shapes
            .get_mut(self.active_index)
            .ok_or(SceneError::NoActiveShape)
    }

    /// Recompute the tail of the open shape.
    pub fn replace_trailing_vertices(
        &mut self,
        count: usize,
        points: &[Point],
        color: Rgba,
    ) -> Result<(), SceneError> {
        self.current_shape_mut()?
            .replace_trailing_vertices(count, points, color)
    }

    /// Mark the open shape closed.
    pub fn advance_cursor(&mut self) {
        if self.active_index < self.shapes.len() {
            self.active_index += 1;
        }
    }

    /// Close every shape still open.
    pub fn close_open_shapes(&mut self) {
        self.active_index = self.shapes.len();
    }

    /// Remove every shape.
    pub fn reset(&mut self) {
        self.shapes.clear();
        self.active_index = 0;
    }

    pub fn has_open_shape(&self) -> bool {
        self.active_index < self.shapes.len()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Total vertex count across all shapes.
    pub fn vertex_count(&self) -> usize {
        self.shapes.iter().map(Shape::vertex_count).sum()
    }

    /// Verify color cardinality for every shape and the cursor bound.
    pub fn check_invariants(&self) -> Result<(), SceneError> {
        if self.active_index > self.shapes.len() {
            return Err(SceneError::InvariantViolation(format!(
                "cursor {} past {} shapes",
                self.active_index,
                self.shapes.len()
            )));
        }
        self.shapes.iter().try_for_each(Shape::check_invariants)
    }

    /// Snapshot the scene into the document format.
    pub fn serialize(&self) -> SceneDocument {
        SceneDocument::from_scene(self)
    }

    /// Replace the scene with the contents of `doc`.
    ///
    /// On error the scene is left unchanged.
    pub fn deserialize(&mut self, doc: &serde_json::Value) -> Result<(), DocumentError> {
        let scene = SceneDocument::from_value(doc)?.into_scene()?;
        *self = scene;
        Ok(())
    }

    /// Serialize the scene to a JSON string.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        self.serialize().to_json()
    }

    /// Replace the scene from a JSON string.
    pub fn load_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))?;
        self.deserialize(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Rgba {
        Rgba::new(1.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_append_and_current_shape() {
        let mut scene = Scene::new();
        assert_eq!(scene.current_shape(), Err(SceneError::NoActiveShape));

        let idx = scene.append_shape(ShapeKind::Line, PrimitiveMode::LineList);
        assert_eq!(idx, 0);
        assert_eq!(scene.current_shape().unwrap().kind, ShapeKind::Line);
        assert!(scene.has_open_shape());
    }

    #[test]
    fn test_current_shape_after_close() {
        let mut scene = Scene::new();
        scene.append_shape(ShapeKind::Line, PrimitiveMode::LineList);
        scene.advance_cursor();
        assert_eq!(scene.current_shape(), Err(SceneError::NoActiveShape));
        assert!(!scene.has_open_shape());
    }

    #[test]
    fn test_advance_cursor_never_passes_len() {
        let mut scene = Scene::new();
        scene.advance_cursor();
        scene.advance_cursor();
        assert_eq!(scene.active_index(), 0);
    }

    #[test]
    fn test_replace_trailing_vertices() {
        let mut scene = Scene::new();
        scene.append_shape(ShapeKind::Line, PrimitiveMode::LineList);
        scene
            .replace_trailing_vertices(0, &[Point::new(1.0, 2.0), Point::new(1.0, 2.0)], red())
            .unwrap();
        scene
            .replace_trailing_vertices(2, &[Point::new(5.0, 6.0)], red())
            .unwrap();

        let shape = scene.current_shape().unwrap();
        assert_eq!(shape.vertices(), &[1.0, 2.0, 5.0, 6.0]);
        assert_eq!(shape.colors().len(), 2);
    }

    #[test]
    fn test_replace_trailing_rejects_too_many() {
        let mut scene = Scene::new();
        scene.append_shape(ShapeKind::Line, PrimitiveMode::LineList);
        scene
            .replace_trailing_vertices(0, &[Point::new(1.0, 2.0)], red())
            .unwrap();

        let before = scene.clone();
        let err = scene.replace_trailing_vertices(4, &[Point::new(9.0, 9.0)], red());
        assert!(matches!(err, Err(SceneError::InvariantViolation(_))));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_replace_trailing_rejects_odd_count() {
        let mut scene = Scene::new();
        scene.append_shape(ShapeKind::Line, PrimitiveMode::LineList);
        scene
            .replace_trailing_vertices(0, &[Point::new(1.0, 2.0)], red())
            .unwrap();
        assert!(matches!(
            scene.replace_trailing_vertices(1, &[], red()),
            Err(SceneError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_replace_trailing_without_active_shape() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.replace_trailing_vertices(0, &[Point::ZERO], red()),
            Err(SceneError::NoActiveShape)
        );
    }

    #[test]
    fn test_reset() {
        let mut scene = Scene::new();
        scene.append_shape(ShapeKind::Square, PrimitiveMode::LineLoop);
        scene.advance_cursor();
        scene.reset();
        assert!(scene.is_empty());
        assert_eq!(scene.active_index(), 0);
    }

    #[test]
    fn test_shape_accessors() {
        let mut shape = Shape::new(ShapeKind::Polygon, PrimitiveMode::TriangleFan);
        shape.push_vertex(Point::new(1.0, 2.0), red());
        shape.push_vertex(Point::new(3.0, 4.0), red());

        assert_eq!(shape.vertex_count(), 2);
        assert_eq!(shape.first_vertex(), Some(Point::new(1.0, 2.0)));
        assert_eq!(shape.vertex(1), Some(Point::new(3.0, 4.0)));
        assert_eq!(shape.vertex(2), None);
        assert_eq!(shape.points().count(), 2);
    }

    #[test]
    fn test_set_vertex_and_vertices() {
        let mut shape = Shape::new(ShapeKind::Line, PrimitiveMode::LineList);
        shape.push_vertex(Point::new(0.0, 0.0), red());
        shape.push_vertex(Point::new(1.0, 1.0), red());

        shape.set_vertex(1, Point::new(7.0, 8.0)).unwrap();
        assert_eq!(shape.vertices(), &[0.0, 0.0, 7.0, 8.0]);
        assert!(shape.set_vertex(2, Point::ZERO).is_err());

        shape
            .set_vertices(&[Point::new(2.0, 2.0), Point::new(3.0, 3.0)])
            .unwrap();
        assert_eq!(shape.vertices(), &[2.0, 2.0, 3.0, 3.0]);
        assert!(shape.set_vertices(&[Point::ZERO]).is_err());
        assert_eq!(shape.colors().len(), 2);
    }

    #[test]
    fn test_from_parts_checks_cardinality() {
        assert!(
            Shape::from_parts(
                ShapeKind::Line,
                PrimitiveMode::LineList,
                vec![0.0, 0.0, 1.0, 1.0],
                vec![red()],
            )
            .is_err()
        );
        assert!(Scene::from_parts(Vec::new(), 1).is_err());
        assert!(Scene::from_parts(Vec::new(), 0).is_ok());
    }

    #[test]
    fn test_fixed_vertex_counts() {
        let square = |n: usize| {
            Shape::from_parts(
                ShapeKind::Square,
                PrimitiveMode::LineLoop,
                vec![0.0; n * 2],
                vec![red(); n],
            )
        };
        assert!(square(4).is_ok());
        assert!(matches!(square(2), Err(SceneError::InvariantViolation(_))));
        assert!(square(3).is_err());
        assert!(
            Shape::from_parts(
                ShapeKind::Line,
                PrimitiveMode::LineList,
                vec![0.0; 6],
                vec![red(); 3],
            )
            .is_err()
        );
        assert!(
            Shape::from_parts(
                ShapeKind::Polygon,
                PrimitiveMode::TriangleFan,
                vec![0.0; 10],
                vec![red(); 5],
            )
            .is_ok()
        );
    }

    #[test]
    fn test_kind_tokens_and_modes() {
        for kind in [
            ShapeKind::Line,
            ShapeKind::Square,
            ShapeKind::Rectangle,
            ShapeKind::Polygon,
        ] {
            assert_eq!(ShapeKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(ShapeKind::from_token("circle"), None);
        assert_eq!(ShapeKind::Polygon.default_mode(), PrimitiveMode::TriangleFan);
        assert_eq!(PrimitiveMode::from_gl_constant(2), Some(PrimitiveMode::LineLoop));
        assert_eq!(PrimitiveMode::from_gl_constant(4), None);
    }
}
