//! glsketch Render Library
//!
//! Renderer abstraction for glsketch. The bundled [`FrameRecorder`] turns the
//! scene into GPU-ready draw batches that a WebGL or wgpu backend uploads
//! verbatim.

mod recorder;
mod renderer;

pub use recorder::{DrawBatch, DrawCommand, FrameRecorder};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, Viewport};
