use std::fmt;
use std::rc::Rc;

use crate::coords::AffineMatrix;
use crate::paint::{
    Loadable, MultiplyTinter, PaintError, PaintHandle, Rgb24, Texture, TextureTinter,
    tinted_bitmap,
};
use crate::render::raster::RasterSurface;

use super::PaintSource;
use super::cache::PaintCache;

/// Brush that paints a texture as a pattern.
///
/// The texture is shared with the resource layer and only observed here. Until
/// it reports loaded, resolution yields `None` and draws are deferred.
pub struct TextureBrush {
    texture: Rc<Texture>,
    transform: AffineMatrix,
    repeat: bool,
    alpha: f32,
    tinter: Rc<dyn TextureTinter>,
    cache: PaintCache,
    reported_pending: bool,
}

impl TextureBrush {
    /// Repeating pattern, identity transform, multiply tinting.
    pub fn new(texture: Rc<Texture>) -> Self {
        Self {
            texture,
            transform: AffineMatrix::IDENTITY,
            repeat: true,
            alpha: 1.0,
            tinter: Rc::new(MultiplyTinter),
            cache: PaintCache::default(),
            reported_pending: false,
        }
    }

    pub fn with_transform(mut self, transform: AffineMatrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.set_repeat(repeat);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_tinter(mut self, tinter: Rc<dyn TextureTinter>) -> Self {
        self.tinter = tinter;
        self.cache.invalidate();
        self
    }

    #[inline]
    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    #[inline]
    pub fn transform(&self) -> AffineMatrix {
        self.transform
    }

    #[inline]
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    #[inline]
    pub fn tinter(&self) -> &Rc<dyn TextureTinter> {
        &self.tinter
    }

    /// Pattern transform only affects draw calls; the cached pattern stays valid.
    pub fn set_transform(&mut self, transform: AffineMatrix) {
        self.transform = transform;
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        if repeat != self.repeat {
            self.repeat = repeat;
            self.cache.invalidate();
        }
    }

    pub fn set_texture(&mut self, texture: Rc<Texture>) {
        self.texture = texture;
        self.reported_pending = false;
        self.cache.invalidate();
    }
}

impl fmt::Debug for TextureBrush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureBrush")
            .field("texture", &self.texture.id())
            .field("loaded", &self.texture.is_loaded())
            .field("transform", &self.transform)
            .field("repeat", &self.repeat)
            .field("alpha", &self.alpha)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl PaintSource for TextureBrush {
    /// Texture brushes take their colors from the bitmap.
    #[inline]
    fn base_color(&self) -> Rgb24 {
        Rgb24::BLACK
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
            texture,
            repeat,
            tinter,
            cache,
            ..
        } = &mut *self;

        let resolved = cache.resolve_with(|tint| {
            let Some(bitmap) = tinted_bitmap(&**tinter, &**texture, tint) else {
                return Ok(None);
            };

            let pattern = surface.create_pattern(&bitmap, *repeat)?;
            Ok(Some(PaintHandle::Pattern(Rc::new(pattern))))
        })?;

        match (&resolved, self.reported_pending) {
            (None, false) => {
                log::debug!("texture {} not loaded; deferring draw", self.texture.id().get());
                self.reported_pending = true;
            }
            (Some(_), true) => self.reported_pending = false,
            _ => {}
        }
        Ok(resolved)
    }

    fn pattern_transform(&self) -> Option<AffineMatrix> {
        Some(self.transform)
    }

    #[inline]
    fn recompute_count(&self) -> u64 {
        self.cache.recomputations()
    }
}
