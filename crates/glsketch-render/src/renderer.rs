//! Renderer trait abstraction.

use glsketch_core::Scene;
use kurbo::Point;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Match the displayed size. Returns true if the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Convert canvas pixels (origin top-left, y down) to clip space.
    pub fn to_clip_space(&self, p: Point) -> [f32; 2] {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        [(2.0 * p.x / w - 1.0) as f32, (1.0 - 2.0 * p.y / h) as f32]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render, back to front.
    pub scene: &'a Scene,
    /// Surface size.
    pub viewport: Viewport,
    /// Clear color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, viewport: Viewport) -> Self {
        Self {
            scene,
            viewport,
            background_color: Color::from_rgba8(0, 0, 0, 0),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// Every call redraws the whole scene: clear the surface, then for each shape
/// bind its positions and per-vertex colors and draw `vertices.len() / 2`
/// vertices with the shape's primitive mode.
pub trait Renderer: Send + Sync {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_reports_change() {
        let mut viewport = Viewport::new(100, 100);
        assert!(!viewport.resize(100, 100));
        assert!(viewport.resize(200, 100));
        assert_eq!(viewport, Viewport::new(200, 100));
    }

    #[test]
    fn test_to_clip_space() {
        let viewport = Viewport::new(200, 100);
        assert_eq!(viewport.to_clip_space(Point::new(0.0, 0.0)), [-1.0, 1.0]);
        assert_eq!(viewport.to_clip_space(Point::new(200.0, 100.0)), [1.0, -1.0]);
        assert_eq!(viewport.to_clip_space(Point::new(100.0, 50.0)), [0.0, 0.0]);
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(!Viewport::default().is_empty());
    }
}
