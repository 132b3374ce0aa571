//! glsketch Core Library
//!
//! Platform-agnostic scene model and shape construction logic for the
//! glsketch vector drawing tool.

pub mod color;
pub mod document;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod storage;
pub mod tools;

pub use color::{ColorError, Rgba};
pub use document::{DocumentError, SceneDocument, ShapeRecord, export_file_name};
pub use geometry::Quadrant;
pub use hit_test::{ChangeTarget, DEFAULT_HIT_THRESHOLD, find_nearest_vertex};
pub use input::{MouseButton, PointerEvent};
pub use scene::{PrimitiveMode, Scene, SceneError, Shape, ShapeKind};
pub use tools::{DrawMode, DrawingSession, SessionConfig};
