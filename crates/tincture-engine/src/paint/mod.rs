//! Paint model: colors, textures and brushes.
//!
//! Scope:
//! - 24-bit colors and the truncating tint arithmetic
//! - texture resources and the tinting service
//! - brushes and the paint handles they resolve to
//!
//! Geometry types remain in `coords`.

pub mod brush;
pub mod color;
pub mod error;
pub mod handle;
pub mod texture;
pub mod tint;

pub use brush::{
    Brush, BrushRef, DrawOutcome, PaintSource, RadialGradientBrush, SolidBrush, TextureBrush,
};
pub use color::{CssColor, Rgb24};
pub use error::{BackendError, PaintError};
pub use handle::{GradientPaint, GradientStop, PaintHandle, PatternPaint};
pub use texture::{Bitmap, Loadable, Texture, TextureId};
pub use tint::{MultiplyTinter, TextureTinter, tinted_bitmap};
