use crate::paint::{PaintError, PaintHandle, Rgb24};

/// Lazily recomputed paint keyed by the last resolved tint.
///
/// Invariant: `paint` is reusable iff it is `Some` and `tint == previous_tint`.
/// Writing the tint never recomputes; the next resolution does.
///
/// Not synchronized. A brush must be confined to one render thread.
#[derive(Debug, Clone)]
pub(crate) struct PaintCache {
    tint: Rgb24,
    previous_tint: Rgb24,
    paint: Option<PaintHandle>,
    recomputations: u64,
}

impl Default for PaintCache {
    fn default() -> Self {
        Self {
            tint: Rgb24::NEUTRAL,
            previous_tint: Rgb24::NEUTRAL,
            paint: None,
            recomputations: 0,
        }
    }
}

impl PaintCache {
    #[inline]
    pub(crate) fn tint(&self) -> Rgb24 {
        self.tint
    }

    #[inline]
    pub(crate) fn set_tint(&mut self, tint: Rgb24) {
        self.tint = tint;
    }

    #[inline]
    pub(crate) fn is_valid(&self) -> bool {
        self.paint.is_some() && self.tint == self.previous_tint
    }

    /// Drops the cached paint, e.g. after a brush property changed.
    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.paint = None;
    }

    #[inline]
    pub(crate) fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Returns the cached paint or rebuilds it for the current tint.
    ///
    /// `build` returning `Ok(None)` means "not ready": nothing is cached and
    /// the next call tries again. Errors leave the cache invalid.
    pub(crate) fn resolve_with<F>(&mut self, build: F) -> Result<Option<PaintHandle>, PaintError>
    where
        F: FnOnce(Rgb24) -> Result<Option<PaintHandle>, PaintError>,
    {
        if self.is_valid() {
            return Ok(self.paint.clone());
        }

        let tint = self.tint;
        match build(tint)? {
            Some(paint) => {
                self.previous_tint = tint;
                self.paint = Some(paint.clone());
                self.recomputations += 1;
                log::trace!(
                    "paint rebuilt for tint {} ({} rebuilds)",
                    tint.to_hex(),
                    self.recomputations
                );
                Ok(Some(paint))
            }
            None => {
                self.paint = None;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::CssColor;

    fn solid(v: u32) -> Option<PaintHandle> {
        Some(PaintHandle::Solid(CssColor::Hex(Rgb24::new(v))))
    }

    #[test]
    fn starts_invalid_with_neutral_tint() {
        let cache = PaintCache::default();
        assert!(!cache.is_valid());
        assert_eq!(cache.tint(), Rgb24::NEUTRAL);
    }

    #[test]
    fn reuses_until_tint_changes() {
        let mut cache = PaintCache::default();
        let mut builds = 0;

        for _ in 0..3 {
            cache
                .resolve_with(|_| {
                    builds += 1;
                    Ok(solid(1))
                })
                .unwrap();
        }
        assert_eq!(builds, 1);

        cache.set_tint(Rgb24::new(0x808080));
        assert!(!cache.is_valid());
        cache
            .resolve_with(|t| {
                builds += 1;
                assert_eq!(t, Rgb24::new(0x808080));
                Ok(solid(2))
            })
            .unwrap();
        assert_eq!(builds, 2);
        assert_eq!(cache.recomputations(), 2);
    }

    #[test]
    fn not_ready_is_not_cached() {
        let mut cache = PaintCache::default();
        assert_eq!(cache.resolve_with(|_| Ok(None)).unwrap(), None);
        assert!(!cache.is_valid());
        assert_eq!(cache.recomputations(), 0);
        assert!(cache.resolve_with(|_| Ok(solid(3))).unwrap().is_some());
        assert!(cache.is_valid());
    }

    #[test]
    fn error_leaves_cache_invalid() {
        let mut cache = PaintCache::default();
        let err = cache.resolve_with(|_| Err(PaintError::UnorderedGradientRatios { index: 1 }));
        assert!(err.is_err());
        assert!(!cache.is_valid());
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = PaintCache::default();
        cache.resolve_with(|_| Ok(solid(1))).unwrap();
        cache.invalidate();
        assert!(!cache.is_valid());
    }
}
