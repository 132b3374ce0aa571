//! JSON document format used for export and import.
//!
//! ```json
//! { "arrayOfObjects": [ { "vertices": [..], "colors": [..], "mode": 1, "shape": "line" } ], "idxNow": 1 }
//! ```
//!
//! `mode` carries the WebGL primitive constant and `colors` holds four
//! numbers per vertex.

use crate::color::Rgba;
use crate::scene::{PrimitiveMode, Scene, Shape, ShapeKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// File name used when the user leaves the export name blank.
pub const DEFAULT_EXPORT_NAME: &str = "data";

/// Document errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Parse(String),
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// One serialized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub vertices: Vec<f64>,
    pub colors: Vec<f32>,
    pub mode: PrimitiveMode,
    pub shape: ShapeKind,
}

impl ShapeRecord {
    fn from_shape(shape: &Shape) -> Self {
        Self {
            vertices: shape.vertices().to_vec(),
            colors: shape.colors().iter().flat_map(Rgba::components).collect(),
            mode: shape.mode,
            shape: shape.kind,
        }
    }

    fn into_shape(self, index: usize) -> Result<Shape, DocumentError> {
        if self.colors.len() % 4 != 0 {
            return Err(DocumentError::Malformed(format!(
                "shape {index}: {} color components is not a multiple of 4",
                self.colors.len()
            )));
        }
        let colors = self
            .colors
            .chunks_exact(4)
            .map(|c| Rgba::from_components([c[0], c[1], c[2], c[3]]))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                DocumentError::Malformed(format!("shape {index}: color component outside [0, 1]"))
            })?;
        Shape::from_parts(self.shape, self.mode, self.vertices, colors)
            .map_err(|e| DocumentError::Malformed(format!("shape {index}: {e}")))
    }
}

/// The exported scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(rename = "arrayOfObjects")]
    pub shapes: Vec<ShapeRecord>,
    #[serde(rename = "idxNow")]
    pub active_index: usize,
}

impl SceneDocument {
    /// Snapshot a scene.
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            shapes: scene.shapes().iter().map(ShapeRecord::from_shape).collect(),
            active_index: scene.active_index(),
        }
    }

    /// Validate an untyped JSON value.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let object = value
            .as_object()
            .ok_or_else(|| DocumentError::Malformed("document is not an object".to_string()))?;

        let shapes = object
            .get("arrayOfObjects")
            .ok_or_else(|| DocumentError::Malformed("missing 'arrayOfObjects'".to_string()))?
            .as_array()
            .ok_or_else(|| DocumentError::Malformed("'arrayOfObjects' is not an array".to_string()))?;

        // as_u64 rejects strings, negatives and non-integral numbers.
        let active_index = object
            .get("idxNow")
            .ok_or_else(|| DocumentError::Malformed("missing 'idxNow'".to_string()))?
            .as_u64()
            .ok_or_else(|| {
                DocumentError::Malformed("'idxNow' is not a non-negative integer".to_string())
            })?;
        let active_index = usize::try_from(active_index)
            .map_err(|_| DocumentError::Malformed("'idxNow' out of range".to_string()))?;

        let shapes = shapes
            .iter()
            .enumerate()
            .map(|(i, v)| {
                ShapeRecord::deserialize(v)
                    .map_err(|e| DocumentError::Malformed(format!("shape {i}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            shapes,
            active_index,
        })
    }

    /// Parse and validate a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Build the scene this document describes.
    pub fn into_scene(self) -> Result<Scene, DocumentError> {
        if self.active_index > self.shapes.len() {
            return Err(DocumentError::Malformed(format!(
                "'idxNow' {} exceeds {} shapes",
                self.active_index,
                self.shapes.len()
            )));
        }
        let shapes = self
            .shapes
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_shape(i))
            .collect::<Result<Vec<_>, _>>()?;
        Scene::from_parts(shapes, self.active_index)
            .map_err(|e| DocumentError::Malformed(e.to_string()))
    }
}

/// Export file name for a user-supplied name (`data.json` when blank).
pub fn export_file_name(name: &str) -> String {
    format!("{}.json", export_stem(name))
}

/// Export name without the extension.
pub fn export_stem(name: &str) -> &str {
    let name = name.trim();
    let name = name.strip_suffix(".json").unwrap_or(name);
    if name.is_empty() {
        DEFAULT_EXPORT_NAME
    } else {
        name
    }
}
