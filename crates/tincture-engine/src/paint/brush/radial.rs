use std::rc::Rc;

use crate::coords::Circle;
use crate::paint::{CssColor, PaintError, PaintHandle, Rgb24};
use crate::render::raster::RasterSurface;

use super::PaintSource;
use super::cache::PaintCache;

/// Radial gradient between two circles.
///
/// Stop arrays are parallel: `colors[i]` at `ratios[i]` with `alphas[i]`.
#[derive(Debug, Clone)]
pub struct RadialGradientBrush {
    colors: Vec<Rgb24>,
    alphas: Vec<f32>,
    ratios: Vec<f32>,
    start: Circle,
    end: Circle,
    alpha: f32,
    cache: PaintCache,
}

impl RadialGradientBrush {
    /// Fails with [`PaintError::InvalidGradientSpec`] when the stop arrays differ
    /// in length, and [`PaintError::UnorderedGradientRatios`] when a ratio is
    /// outside `[0, 1]` or decreasing.
    pub fn new(
        colors: Vec<Rgb24>,
        alphas: Vec<f32>,
        ratios: Vec<f32>,
        start: Circle,
        end: Circle,
    ) -> Result<Self, PaintError> {
        validate_stops(&colors, &alphas, &ratios)?;
        Ok(Self {
            colors,
            alphas,
            ratios,
            start,
            end,
            alpha: 1.0,
            cache: PaintCache::default(),
        })
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Replaces all stops; the brush is left unchanged on error.
    pub fn set_stops(
        &mut self,
        colors: Vec<Rgb24>,
        alphas: Vec<f32>,
        ratios: Vec<f32>,
    ) -> Result<(), PaintError> {
        validate_stops(&colors, &alphas, &ratios)?;
        self.colors = colors;
        self.alphas = alphas;
        self.ratios = ratios;
        self.cache.invalidate();
        Ok(())
    }

    pub fn set_circles(&mut self, start: Circle, end: Circle) {
        self.start = start;
        self.end = end;
        self.cache.invalidate();
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb24] {
        &self.colors
    }

    #[inline]
    pub fn start(&self) -> Circle {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Circle {
        self.end
    }
}

fn validate_stops(colors: &[Rgb24], alphas: &[f32], ratios: &[f32]) -> Result<(), PaintError> {
    if colors.len() != alphas.len() || colors.len() != ratios.len() {
        return Err(PaintError::InvalidGradientSpec {
            colors: colors.len(),
            alphas: alphas.len(),
            ratios: ratios.len(),
        });
    }

    let mut previous = 0.0f32;
    for (index, &ratio) in ratios.iter().enumerate() {
        if !(0.0..=1.0).contains(&ratio) || ratio < previous {
            return Err(PaintError::UnorderedGradientRatios { index });
        }
        previous = ratio;
    }
    Ok(())
}

impl PaintSource for RadialGradientBrush {
    /// Gradients have no single base color; neutral by convention.
    #[inline]
    fn base_color(&self) -> Rgb24 {
        Rgb24::NEUTRAL
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
        surface: &mut dyn RasterSurface,
    ) -> Result<Option<PaintHandle>, PaintError> {
        let Self {
            colors,
            alphas,
            ratios,
            start,
            end,
            cache,
            ..
        } = self;

        cache.resolve_with(|tint| {
            let mut gradient = surface.create_radial_gradient(*start, *end)?;
            for ((color, &alpha), &ratio) in colors.iter().zip(alphas.iter()).zip(ratios.iter()) {
                gradient.add_color_stop(ratio, CssColor::rgba(color.tinted(tint), alpha));
            }
            Ok(Some(PaintHandle::RadialGradient(Rc::new(gradient))))
        })
    }

    #[inline]
    fn recompute_count(&self) -> u64 {
        self.cache.recomputations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{BackendError, Brush, GradientPaint};
    use crate::render::raster::testing::RecordingSurface;

    fn circles() -> (Circle, Circle) {
        (Circle::new(50.0, 50.0, 0.0), Circle::new(50.0, 50.0, 40.0))
    }

    fn two_stop() -> RadialGradientBrush {
        let (start, end) = circles();
        RadialGradientBrush::new(
            vec![Rgb24::new(0xC8C8C8), Rgb24::new(0x0000FF)],
            vec![1.0, 0.25],
            vec![0.0, 1.0],
            start,
            end,
        )
        .unwrap()
    }

    fn gradient_of(paint: &PaintHandle) -> &GradientPaint {
        match paint {
            PaintHandle::RadialGradient(g) => g,
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_stop_lengths_are_rejected() {
        let (start, end) = circles();
        let err = RadialGradientBrush::new(
            vec![Rgb24::new(0xFF0000), Rgb24::new(0x0000FF)],
            vec![1.0],
            vec![0.0, 1.0],
            start,
            end,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PaintError::InvalidGradientSpec {
                colors: 2,
                alphas: 1,
                ratios: 2,
            }
        );
    }

    #[test]
    fn decreasing_ratios_are_rejected() {
        let (start, end) = circles();
        let err = RadialGradientBrush::new(
            vec![Rgb24::BLACK; 3],
            vec![1.0; 3],
            vec![0.0, 0.6, 0.5],
            start,
            end,
        )
        .unwrap_err();
        assert_eq!(err, PaintError::UnorderedGradientRatios { index: 2 });
    }

    #[test]
    fn neutral_tint_keeps_stop_colors_exact() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(two_stop());

        let paint = brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap().unwrap();
        let g = gradient_of(&paint);
        let stops: Vec<String> = g.stops().iter().map(|s| s.color.to_string()).collect();
        assert_eq!(stops, ["rgba(200, 200, 200, 1.000)", "rgba(0, 0, 255, 0.250)"]);
        assert_eq!(g.stops()[1].offset, 1.0);
        assert_eq!(g.end(), Circle::new(50.0, 50.0, 40.0));
    }

    #[test]
    fn tint_composites_every_stop() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(two_stop());

        let paint = brush.resolve_paint(&mut surface, Rgb24::new(0x7F7F7F)).unwrap().unwrap();
        let g = gradient_of(&paint);
        assert_eq!(g.stops()[0].color.rgb(), Rgb24::new(0x636363));
        assert_eq!(g.stops()[1].color.rgb(), Rgb24::new(0x00007F));
    }

    #[test]
    fn cached_gradient_is_shared_until_tint_changes() {
        let mut surface = RecordingSurface::default();
        let mut brush = Brush::from(two_stop());

        let a = brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap().unwrap();
        let b = brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap().unwrap();
        assert!(a.same_handle(&b));
        assert_eq!(surface.gradients_created, 1);

        let c = brush.resolve_paint(&mut surface, Rgb24::new(0x808080)).unwrap().unwrap();
        assert!(!a.same_handle(&c));
        assert_eq!(surface.gradients_created, 2);
        assert_eq!(brush.recompute_count(), 2);
    }

    #[test]
    fn backend_failure_propagates_and_retries() {
        let mut surface = RecordingSurface {
            fail_gradients: true,
            ..Default::default()
        };
        let mut brush = Brush::from(two_stop());

        let err = brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap_err();
        assert!(matches!(err, PaintError::Backend(BackendError::GradientCreation(_))));

        surface.fail_gradients = false;
        assert!(brush.resolve_paint(&mut surface, Rgb24::NEUTRAL).unwrap().is_some());
    }

    #[test]
    fn set_stops_validates_and_invalidates() {
        let mut surface = RecordingSurface::default();
        let mut gradient = two_stop();
        gradient.resolve_current(&mut surface).unwrap();

        assert!(gradient.set_stops(vec![Rgb24::BLACK], vec![], vec![0.0]).is_err());
        assert_eq!(gradient.colors().len(), 2);

        gradient.set_stops(vec![Rgb24::BLACK], vec![1.0], vec![0.5]).unwrap();
        gradient.resolve_current(&mut surface).unwrap();
        assert_eq!(gradient.recompute_count(), 2);
    }

    #[test]
    fn set_circles_rebuilds_once() {
        let mut surface = RecordingSurface::default();
        let mut gradient = two_stop();
        gradient.resolve_current(&mut surface).unwrap();

        let moved = Circle::new(10.0, 10.0, 20.0);
        gradient.set_circles(Circle::new(10.0, 10.0, 0.0), moved);
        let paint = gradient.resolve_current(&mut surface).unwrap().unwrap();
        gradient.resolve_current(&mut surface).unwrap();

        assert_eq!(gradient_of(&paint).end(), moved);
        assert_eq!(gradient.recompute_count(), 2);
        assert_eq!(surface.gradients_created, 2);
    }
}
