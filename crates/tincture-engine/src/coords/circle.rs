/// Circle used as the start or end boundary of a radial gradient.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl Circle {
    #[inline]
    pub const fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }

    /// Finite center and a finite, non-negative radius.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.r.is_finite() && self.r >= 0.0
    }
}
