use crate::paint::{CssColor, PaintError, PaintHandle, Rgb24};
use crate::render::raster::RasterSurface;

use super::PaintSource;
use super::cache::PaintCache;

/// Single-color brush. Resolves to `#rrggbb` of the tinted base color.
#[derive(Debug, Clone)]
pub struct SolidBrush {
    color: Rgb24,
    alpha: f32,
    cache: PaintCache,
}

impl SolidBrush {
    pub fn new(color: Rgb24, alpha: f32) -> Self {
        Self {
            color,
            alpha,
            cache: PaintCache::default(),
        }
    }

    pub fn set_color(&mut self, color: Rgb24) {
        if color != self.color {
            self.color = color;
            self.cache.invalidate();
        }
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }
}

impl PaintSource for SolidBrush {
    #[inline]
    fn base_color(&self) -> Rgb24 {
        self.color
    }

    #[inline]
    fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    fn tint(&self) -> Rgb24 {
        self.cache.tint()
    }

    #[inline]
    fn set_tint(&mut self, tint: Rgb24) {
        self.cache.set_tint(tint);
    }

    fn resolve_current(
        &mut self,
        _surface: &mut dyn RasterSurface,
    ) -> Result<Option<PaintHandle>, PaintError> {
        let color = self.color;
        self.cache
            .resolve_with(|tint| Ok(Some(PaintHandle::Solid(CssColor::Hex(color.tinted(tint))))))
    }

    #[inline]
    fn recompute_count(&self) -> u64 {
        self.cache.recomputations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Brush, DrawOutcome};
    use crate::render::raster::testing::{RecordingSurface, SurfaceCall};

    #[test]
    fn neutral_tint_paints_base_hex() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(SolidBrush::new(Rgb24::new(0x00FF80), 1.0));

        let paint = brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap().unwrap();
        assert_eq!(paint.css().as_deref(), Some("#00ff80"));
    }

    #[test]
    fn tinted_paint_uses_truncated_channels() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(SolidBrush::new(Rgb24::new(0xC8C8C8), 1.0));

        let paint = brush.resolve_paint(&mut surface, Rgb24::new(0x7F7F7F)).unwrap().unwrap();
        assert_eq!(paint.css().as_deref(), Some("#636363"));
    }

    #[test]
    fn repeated_resolution_reuses_cached_paint() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(SolidBrush::new(Rgb24::new(0x123456), 1.0));
        let tint = Rgb24::new(0x808080);

        let first = brush.resolve_paint(&mut surface, tint).unwrap().unwrap();
        let second = brush.resolve_paint(&mut surface, tint).unwrap().unwrap();
        assert!(first.same_handle(&second));
        assert_eq!(brush.recompute_count(), 1);

        brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap();
        assert_eq!(brush.recompute_count(), 2);
    }

    #[test]
    fn tint_write_is_lazy() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(SolidBrush::new(Rgb24::new(0xFF0000), 1.0));
        brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap();

        brush.set_tint(Rgb24::new(0x808080));
        brush.set_tint(Rgb24::new(0x404040));
        assert_eq!(brush.recompute_count(), 1);

        brush.fill(&mut surface, 1.0).unwrap();
        assert_eq!(brush.recompute_count(), 2);
    }

    #[test]
    fn fill_sets_combined_alpha_and_style() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(SolidBrush::new(Rgb24::new(0x0000FF), 0.5));

        assert_eq!(brush.fill(&mut surface, 0.5).unwrap(), DrawOutcome::Drawn);
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::GlobalAlpha(0.25),
                SurfaceCall::FillStyle("#0000ff".into()),
                SurfaceCall::Fill,
            ]
        );
    }

    #[test]
    fn stroke_mirrors_fill() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(SolidBrush::new(Rgb24::new(0x0000FF), 1.0));

        brush.stroke(&mut surface, 1.0).unwrap();
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::GlobalAlpha(1.0),
                SurfaceCall::StrokeStyle("#0000ff".into()),
                SurfaceCall::Stroke,
            ]
        );
    }

    #[test]
    fn set_color_invalidates() {
        let mut surface = RecordingSurface::default();
        let mut solid = SolidBrush::new(Rgb24::new(0x000001), 1.0);
        solid.resolve_current(&mut surface).unwrap();
        solid.set_color(Rgb24::new(0x000002));
        let paint = solid.resolve_current(&mut surface).unwrap().unwrap();
        assert_eq!(paint.css().as_deref(), Some("#000002"));
        assert_eq!(solid.recompute_count(), 2);
    }
}
