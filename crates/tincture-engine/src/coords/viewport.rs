use super::AffineMatrix;

/// Viewport size in logical pixels.
///
/// The GPU tile path uses this as the basis for converting logical px
/// positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Projection from logical pixels (top-left origin, +Y down) to NDC.
    ///
    /// Degenerate viewports are treated as 1x1 so the matrix stays invertible.
    pub fn projection(self) -> AffineMatrix {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        AffineMatrix::new(2.0 / w, 0.0, 0.0, -2.0 / h, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn projection_maps_corners_to_ndc() {
        let p = Viewport::new(256.0, 128.0).projection();
        assert_eq!(p.apply(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(p.apply(Vec2::new(256.0, 128.0)), Vec2::new(1.0, -1.0));
        assert_eq!(p.apply(Vec2::new(128.0, 64.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn zero_viewport_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
