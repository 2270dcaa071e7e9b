//! Geometry values consumed by shapes, brushes and both paint backends.
//!
//! Everything on the CPU side is in logical pixels with a top-left origin and
//! +Y pointing down. [`AffineMatrix`] uses canvas row order `(a, b, c, d, tx, ty)`;
//! the tile program reaches NDC through [`Viewport::projection`].

mod affine;
mod circle;
mod rect;
mod vec2;
mod viewport;

pub use affine::AffineMatrix;
pub use circle::Circle;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
