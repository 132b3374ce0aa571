//! Backend that records draw batches instead of issuing GPU calls.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use glsketch_core::{PrimitiveMode, Shape};

/// Buffers and draw parameters for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Clip-space `x, y` pairs.
    pub positions: Vec<f32>,
    /// Four components per vertex.
    pub colors: Vec<f32>,
    pub mode: PrimitiveMode,
    pub count: usize,
}

/// One recorded GPU command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear([f32; 4]),
    Draw(DrawBatch),
}

/// Records the commands of the most recent frame.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Draw batches of the last frame.
    pub fn batches(&self) -> impl Iterator<Item = &DrawBatch> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Draw(batch) => Some(batch),
            DrawCommand::Clear(_) => None,
        })
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }
}

/// Mode actually used to draw `shape`.
///
/// A fan needs three vertices, so an open polygon's first edge is drawn as
/// an outline until then.
fn effective_mode(shape: &Shape) -> PrimitiveMode {
    match shape.mode {
        PrimitiveMode::TriangleFan if shape.vertex_count() < 3 => PrimitiveMode::LineLoop,
        mode => mode,
    }
}

impl Renderer for FrameRecorder {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        if ctx.viewport.is_empty() {
            return Err(RendererError::InvalidViewport {
                width: ctx.viewport.width,
                height: ctx.viewport.height,
            });
        }

        self.commands.clear();
        self.commands
            .push(DrawCommand::Clear(ctx.background_color.components));

        for shape in ctx.scene.shapes().iter().filter(|s| !s.is_empty()) {
            let positions = shape
                .points()
                .flat_map(|p| ctx.viewport.to_clip_space(p))
                .collect();
            let colors = shape.colors().iter().flat_map(|c| c.components()).collect();
            self.commands.push(DrawCommand::Draw(DrawBatch {
                positions,
                colors,
                mode: effective_mode(shape),
                count: shape.vertex_count(),
            }));
        }

        self.frames += 1;
        log::trace!(
            "Frame {}: {} draws, {} vertices",
            self.frames,
            self.commands.len() - 1,
            ctx.scene.vertex_count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Viewport;
    use glsketch_core::{DrawMode, DrawingSession, Scene};
    use kurbo::Point;

    fn render(scene: &Scene) -> FrameRecorder {
        let mut recorder = FrameRecorder::new();
        recorder
            .render(&RenderContext::new(scene, Viewport::new(100, 100)))
            .unwrap();
        recorder
    }

    #[test]
    fn test_empty_scene_only_clears() {
        let recorder = render(&Scene::new());
        assert_eq!(recorder.commands(), &[DrawCommand::Clear([0.0; 4])]);
        assert_eq!(recorder.frame_count(), 1);
    }

    #[test]
    fn test_line_batch() {
        let mut session = DrawingSession::new();
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(100.0, 100.0));
        session.pointer_up(Point::new(100.0, 100.0));

        let recorder = render(session.scene());
        let batches: Vec<_> = recorder.batches().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].mode, PrimitiveMode::LineList);
        assert_eq!(batches[0].count, 2);
        assert_eq!(batches[0].positions, vec![-1.0, 1.0, 1.0, -1.0]);
        assert_eq!(batches[0].colors, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_open_polygon_drawn_as_outline() {
        let mut session = DrawingSession::new();
        session.set_mode(DrawMode::Polygon);
        session.pointer_down(Point::new(10.0, 10.0));
        session.pointer_move(Point::new(50.0, 10.0));

        let recorder = render(session.scene());
        let batch = recorder.batches().next().unwrap();
        assert_eq!(batch.mode, PrimitiveMode::LineLoop);

        session.pointer_down(Point::new(50.0, 10.0));
        session.pointer_move(Point::new(50.0, 50.0));
        let recorder = render(session.scene());
        let batch = recorder.batches().next().unwrap();
        assert_eq!(batch.mode, PrimitiveMode::TriangleFan);
        assert_eq!(batch.count, 3);
    }

    #[test]
    fn test_rerender_replaces_previous_frame() {
        let mut session = DrawingSession::new();
        session.set_mode(DrawMode::Square);
        session.pointer_down(Point::new(10.0, 10.0));

        let mut recorder = FrameRecorder::new();
        let viewport = Viewport::new(100, 100);
        recorder
            .render(&RenderContext::new(session.scene(), viewport))
            .unwrap();
        session.pointer_move(Point::new(20.0, 20.0));
        recorder
            .render(&RenderContext::new(session.scene(), viewport))
            .unwrap();

        assert_eq!(recorder.frame_count(), 2);
        assert_eq!(recorder.commands().len(), 2);
        assert_eq!(recorder.batches().next().unwrap().count, 4);
    }

    #[test]
    fn test_invalid_viewport() {
        let scene = Scene::new();
        let mut recorder = FrameRecorder::new();
        let err = recorder.render(&RenderContext::new(&scene, Viewport::new(0, 0)));
        assert!(matches!(err, Err(RendererError::InvalidViewport { .. })));
    }
}
