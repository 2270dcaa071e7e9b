use super::Vec2;

/// 2D affine transform in canvas row order.
///
/// Maps a point as:
/// `x' = a * x + c * y + tx`, `y' = b * x + d * y + ty`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineMatrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for AffineMatrix {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Value comparison against [`AffineMatrix::IDENTITY`].
    ///
    /// Brushes use this to skip the save/transform/restore sequence.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
            .iter()
            .all(|v| v.is_finite())
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Returns `self` followed by `next` (`next * self` in matrix terms).
    pub fn then(&self, next: &AffineMatrix) -> AffineMatrix {
        AffineMatrix::new(
            next.a * self.a + next.c * self.b,
            next.b * self.a + next.d * self.b,
            next.a * self.c + next.c * self.d,
            next.b * self.c + next.d * self.d,
            next.a * self.tx + next.c * self.ty + next.tx,
            next.b * self.tx + next.d * self.ty + next.ty,
        )
    }

    /// Column-major 3x3 with each column padded to 16 bytes (WGSL `mat3x3<f32>`).
    pub fn to_mat3(&self) -> [[f32; 4]; 3] {
        [
            [self.a, self.b, 0.0, 0.0],
            [self.c, self.d, 0.0, 0.0],
            [self.tx, self.ty, 1.0, 0.0],
        ]
    }
}
