//! Immediate-mode raster path.
//!
//! [`RasterSurface`] is the capability brushes draw through; [`RasterRenderer`]
//! walks a [`DrawList`] and drives a surface record by record.

use std::rc::Rc;

use crate::coords::{AffineMatrix, Circle};
use crate::paint::{
    BackendError, Bitmap, CssColor, DrawOutcome, GradientPaint, PaintError, PaintHandle,
    PatternPaint, Rgb24,
};
use crate::scene::{DrawList, Shape, ShapeStyleRecord};

/// Canvas-like drawing surface.
///
/// State (transform, alpha, line width, styles) is scoped by `save`/`restore`.
/// The outline is current-path state and survives `restore`.
pub trait RasterSurface {
    fn save(&mut self);

    /// Pops the last saved state. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Post-multiplies the current transform by `m`.
    fn transform(&mut self, m: &AffineMatrix);

    fn set_global_alpha(&mut self, alpha: f32);

    fn set_line_width(&mut self, width: f32);

    /// Establishes `shape` as the current outline, under the current transform.
    fn set_outline(&mut self, shape: &Shape);

    fn set_fill_style(&mut self, paint: &PaintHandle);

    fn set_stroke_style(&mut self, paint: &PaintHandle);

    fn create_pattern(
        &mut self,
        bitmap: &Rc<Bitmap>,
        repeat: bool,
    ) -> Result<PatternPaint, BackendError>;

    fn create_radial_gradient(
        &mut self,
        start: Circle,
        end: Circle,
    ) -> Result<GradientPaint, BackendError>;

    fn fill(&mut self) -> Result<(), BackendError>;

    fn stroke(&mut self) -> Result<(), BackendError>;
}

/// Per-frame counters returned by [`RasterRenderer::render`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderStats {
    pub filled: u32,
    pub stroked: u32,
    /// Draws skipped because a texture was still loading.
    pub deferred: u32,
}

/// Draws a [`DrawList`] onto a [`RasterSurface`].
#[derive(Debug, Default)]
pub struct RasterRenderer {
    frames: u64,
}

impl RasterRenderer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Paints every record in z-order.
    ///
    /// Deferred texture draws are skipped and counted; the next frame retries
    /// them. Paint and backend failures abort the frame.
    pub fn render(
        &mut self,
        surface: &mut dyn RasterSurface,
        draw_list: &mut DrawList,
        world_alpha: f32,
        tint: Rgb24,
    ) -> Result<RenderStats, PaintError> {
        let mut stats = RenderStats::default();

        draw_list
            .try_for_each_in_paint_order(|item| {
                draw_record(&mut *surface, &mut item.record, world_alpha, tint, &mut stats)
            })
            .inspect_err(|e| log::warn!("raster frame {} aborted: {e}", self.frames))?;

        self.frames += 1;
        log::trace!(
            "raster frame {}: {} filled, {} stroked, {} deferred",
            self.frames,
            stats.filled,
            stats.stroked,
            stats.deferred
        );
        Ok(stats)
    }
}

fn draw_record(
    surface: &mut dyn RasterSurface,
    record: &mut ShapeStyleRecord,
    world_alpha: f32,
    tint: Rgb24,
    stats: &mut RenderStats,
) -> Result<(), PaintError> {
    record.apply_tint(tint);
    surface.set_outline(record.shape());

    if record.fill_enabled {
        let outcome = match &record.fill_brush {
            Some(brush) => {
                let mut brush = brush.borrow_mut();
                brush.set_tint(tint);
                brush.fill(surface, world_alpha)?
            }
            None => {
                surface.set_global_alpha(record.fill_alpha * world_alpha);
                surface.set_fill_style(&PaintHandle::Solid(CssColor::Hex(record.fill_tint())));
                surface.fill()?;
                DrawOutcome::Drawn
            }
        };
        match outcome {
            DrawOutcome::Drawn => stats.filled += 1,
            DrawOutcome::Deferred => stats.deferred += 1,
        }
    }

    if record.has_stroke() {
        surface.set_line_width(record.stroke_width);
        let outcome = match &record.stroke_brush {
            Some(brush) => {
                let mut brush = brush.borrow_mut();
                brush.set_tint(tint);
                brush.stroke(surface, world_alpha)?
            }
            None => {
                surface.set_global_alpha(record.stroke_alpha * world_alpha);
                surface.set_stroke_style(&PaintHandle::Solid(CssColor::Hex(record.stroke_tint())));
                surface.stroke()?;
                DrawOutcome::Drawn
            }
        };
        match outcome {
            DrawOutcome::Drawn => stats.stroked += 1,
            DrawOutcome::Deferred => stats.deferred += 1,
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::scene::ShapeKind;

    /// One observed surface call.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum SurfaceCall {
        Save,
        Restore,
        Transform(AffineMatrix),
        GlobalAlpha(f32),
        LineWidth(f32),
        Outline(ShapeKind),
        /// CSS for solids, `radial-gradient` or `pattern` otherwise.
        FillStyle(String),
        StrokeStyle(String),
        Fill,
        Stroke,
    }

    /// Surface that records state-changing and drawing calls.
    ///
    /// Paint creation is counted rather than recorded.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub calls: Vec<SurfaceCall>,
        pub gradients_created: usize,
        pub patterns_created: usize,
        pub fail_gradients: bool,
        pub fail_patterns: bool,
        pub fail_draws: bool,
    }

    impl RecordingSurface {
        pub fn count(&self, call: &SurfaceCall) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }

        pub fn positions(&self, call: &SurfaceCall) -> Vec<usize> {
            self.calls
                .iter()
                .enumerate()
                .filter_map(|(i, c)| (c == call).then_some(i))
                .collect()
        }

        fn draw(&mut self, call: SurfaceCall) -> Result<(), BackendError> {
            self.calls.push(call);
            if self.fail_draws {
                return Err(BackendError::Draw("recording surface set to fail".into()));
            }
            Ok(())
        }
    }

    fn style_name(paint: &PaintHandle) -> String {
        match paint {
            PaintHandle::Solid(c) => c.to_string(),
            PaintHandle::RadialGradient(_) => "radial-gradient".into(),
            PaintHandle::Pattern(_) => "pattern".into(),
        }
    }

    impl RasterSurface for RecordingSurface {
        fn save(&mut self) {
            self.calls.push(SurfaceCall::Save);
        }

        fn restore(&mut self) {
            self.calls.push(SurfaceCall::Restore);
        }

        fn transform(&mut self, m: &AffineMatrix) {
            self.calls.push(SurfaceCall::Transform(*m));
        }

        fn set_global_alpha(&mut self, alpha: f32) {
            self.calls.push(SurfaceCall::GlobalAlpha(alpha));
        }

        fn set_line_width(&mut self, width: f32) {
            self.calls.push(SurfaceCall::LineWidth(width));
        }

        fn set_outline(&mut self, shape: &Shape) {
            self.calls.push(SurfaceCall::Outline(shape.kind()));
        }

        fn set_fill_style(&mut self, paint: &PaintHandle) {
            self.calls.push(SurfaceCall::FillStyle(style_name(paint)));
        }

        fn set_stroke_style(&mut self, paint: &PaintHandle) {
            self.calls.push(SurfaceCall::StrokeStyle(style_name(paint)));
        }

        fn create_pattern(
            &mut self,
            bitmap: &Rc<Bitmap>,
            repeat: bool,
        ) -> Result<PatternPaint, BackendError> {
            if self.fail_patterns {
                return Err(BackendError::PatternCreation("recording surface set to fail".into()));
            }
            self.patterns_created += 1;
            Ok(PatternPaint::from_bitmap(bitmap, repeat))
        }

        fn create_radial_gradient(
            &mut self,
            start: Circle,
            end: Circle,
        ) -> Result<GradientPaint, BackendError> {
            if self.fail_gradients {
                return Err(BackendError::GradientCreation("recording surface set to fail".into()));
            }
            self.gradients_created += 1;
            Ok(GradientPaint::new(start, end))
        }

        fn fill(&mut self) -> Result<(), BackendError> {
            self.draw(SurfaceCall::Fill)
        }

        fn stroke(&mut self) -> Result<(), BackendError> {
            self.draw(SurfaceCall::Stroke)
        }
    }
}
