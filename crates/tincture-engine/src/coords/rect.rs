use super::Vec2;

/// Axis-aligned rectangle, top-left origin. The size may be negative until
/// [`normalized`](Rect::normalized).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    /// Same area with a non-negative size.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    /// Corners clockwise from the top-left, after normalization.
    pub fn corners(self) -> [Vec2; 4] {
        let r = self.normalized();
        let max = r.max();
        [r.origin, Vec2::new(max.x, r.origin.y), max, Vec2::new(r.origin.x, max.y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_size_flips_origin() {
        assert_eq!(Rect::new(10.0, 10.0, -4.0, -3.0).normalized(), Rect::new(6.0, 7.0, 4.0, 3.0));
        assert_eq!(Rect::new(1.0, 2.0, 3.0, 4.0).normalized(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn corners_of_flipped_rect_match_normalized() {
        let flipped = Rect::new(4.0, 2.0, -4.0, -2.0).corners();
        assert_eq!(flipped, Rect::new(0.0, 0.0, 4.0, 2.0).corners());
        assert_eq!(flipped[2], Vec2::new(4.0, 2.0));
    }
}
