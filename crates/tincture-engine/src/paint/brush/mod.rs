//! Brushes: paint sources that resolve to backend paint handles.
//!
//! The set of brushes is closed ([`Brush`]); every variant implements
//! [`PaintSource`], and fill/stroke share one code path so the transform
//! save/restore discipline lives in a single place.

mod cache;
mod radial;
mod solid;
mod texture;

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::AffineMatrix;
use crate::render::raster::RasterSurface;

use super::{PaintError, PaintHandle, Rgb24};

pub use radial::RadialGradientBrush;
pub use solid::SolidBrush;
pub use texture::TextureBrush;

/// Brush shared between draw records. Single-threaded by construction.
pub type BrushRef = Rc<RefCell<Brush>>;

/// Result of a fill or stroke request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawOutcome {
    Drawn,
    /// The brush had nothing to paint yet (texture still loading); retry next frame.
    Deferred,
}

/// Common brush contract.
pub trait PaintSource {
    fn base_color(&self) -> Rgb24;

    fn alpha(&self) -> f32;

    fn tint(&self) -> Rgb24;

    /// Records the tint; the cached paint is rebuilt lazily.
    fn set_tint(&mut self, tint: Rgb24);

    /// Paint for the current tint, rebuilt only if the tint changed since the
    /// last successful resolution. `Ok(None)` means "skip this frame".
    fn resolve_current(&mut self, surface: &mut dyn RasterSurface)
    -> Result<Option<PaintHandle>, PaintError>;

    /// Transform the surface must apply around the draw call, if any.
    fn pattern_transform(&self) -> Option<AffineMatrix> {
        None
    }

    /// Number of paint rebuilds so far.
    fn recompute_count(&self) -> u64;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PaintOp {
    Fill,
    Stroke,
}

/// Closed set of brush kinds.
#[derive(Debug)]
pub enum Brush {
    Solid(SolidBrush),
    Texture(TextureBrush),
    RadialGradient(RadialGradientBrush),
}

impl Brush {
    #[inline]
    pub fn into_ref(self) -> BrushRef {
        Rc::new(RefCell::new(self))
    }

    fn source(&self) -> &dyn PaintSource {
        match self {
            Brush::Solid(b) => b,
            Brush::Texture(b) => b,
            Brush::RadialGradient(b) => b,
        }
    }

    fn source_mut(&mut self) -> &mut dyn PaintSource {
        match self {
            Brush::Solid(b) => b,
            Brush::Texture(b) => b,
            Brush::RadialGradient(b) => b,
        }
    }

    /// The texture brush, when this is one. The GPU tile path only draws these.
    #[inline]
    pub fn as_texture(&self) -> Option<&TextureBrush> {
        match self {
            Brush::Texture(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.source().alpha()
    }

    #[inline]
    pub fn base_color(&self) -> Rgb24 {
        self.source().base_color()
    }

    #[inline]
    pub fn tint(&self) -> Rgb24 {
        self.source().tint()
    }

    #[inline]
    pub fn set_tint(&mut self, tint: Rgb24) {
        self.source_mut().set_tint(tint);
    }

    #[inline]
    pub fn recompute_count(&self) -> u64 {
        self.source().recompute_count()
    }

    /// Resolves the paint for `tint`.
    ///
    /// Calling twice with the same tint returns the same cached handle.
    pub fn resolve_paint(
        &mut self,
        surface: &mut dyn RasterSurface,
        tint: Rgb24,
    ) -> Result<Option<PaintHandle>, PaintError> {
        let source = self.source_mut();
        source.set_tint(tint);
        source.resolve_current(surface)
    }

    /// Fills the outline already established on `surface`.
    pub fn fill(
        &mut self,
        surface: &mut dyn RasterSurface,
        world_alpha: f32,
    ) -> Result<DrawOutcome, PaintError> {
        paint_outline(self.source_mut(), surface, world_alpha, PaintOp::Fill)
    }

    /// Strokes the outline already established on `surface`.
    pub fn stroke(
        &mut self,
        surface: &mut dyn RasterSurface,
        world_alpha: f32,
    ) -> Result<DrawOutcome, PaintError> {
        paint_outline(self.source_mut(), surface, world_alpha, PaintOp::Stroke)
    }
}

impl From<SolidBrush> for Brush {
    fn from(b: SolidBrush) -> Self {
        Brush::Solid(b)
    }
}

impl From<TextureBrush> for Brush {
    fn from(b: TextureBrush) -> Self {
        Brush::Texture(b)
    }
}

impl From<RadialGradientBrush> for Brush {
    fn from(b: RadialGradientBrush) -> Self {
        Brush::RadialGradient(b)
    }
}

/// Resolve, then `save -> transform -> style -> draw -> restore`.
///
/// The transform stays applied across the draw call and save/restore pair
/// exactly once; nothing is saved when the paint is deferred.
fn paint_outline(
    source: &mut dyn PaintSource,
    surface: &mut dyn RasterSurface,
    world_alpha: f32,
    op: PaintOp,
) -> Result<DrawOutcome, PaintError> {
    let Some(paint) = source.resolve_current(surface)? else {
        return Ok(DrawOutcome::Deferred);
    };

    let transform = source.pattern_transform().filter(|m| !m.is_identity());
    if let Some(m) = &transform {
        surface.save();
        surface.transform(m);
    }

    surface.set_global_alpha(source.alpha() * world_alpha);
    let drawn = match op {
        PaintOp::Fill => {
            surface.set_fill_style(&paint);
            surface.fill()
        }
        PaintOp::Stroke => {
            surface.set_stroke_style(&paint);
            surface.stroke()
        }
    };

    if transform.is_some() {
        surface.restore();
    }

    drawn?;
    Ok(DrawOutcome::Drawn)
}
