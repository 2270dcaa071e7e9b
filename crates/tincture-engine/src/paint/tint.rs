//! Texture tinting service.

use std::rc::Rc;

use super::color::tint_channel;
use super::{Bitmap, Loadable, Rgb24, Texture};

/// Produces a tinted copy of a texture's source bitmap.
///
/// Implementations are pure with respect to their inputs and may cost
/// O(pixel count); callers cache the result per tint.
pub trait TextureTinter {
    /// Returns `None` when the texture has no source bitmap yet.
    fn tint_texture(&self, texture: &Texture, tint: Rgb24) -> Option<Rc<Bitmap>>;
}

/// Multiplies every pixel's color channels by the tint, alpha untouched.
///
/// Uses the same truncating channel arithmetic as [`Rgb24::tinted`] so a tinted
/// pattern matches a tinted solid fill of the same color.
#[derive(Debug, Default, Copy, Clone)]
pub struct MultiplyTinter;

impl TextureTinter for MultiplyTinter {
    fn tint_texture(&self, texture: &Texture, tint: Rgb24) -> Option<Rc<Bitmap>> {
        if !texture.is_loaded() {
            return None;
        }
        let source = texture.source()?;
        if tint.is_neutral() {
            return Some(source);
        }

        let (tr, tg, tb) = (tint.r(), tint.g(), tint.b());
        Some(Rc::new(source.map_pixels(|[r, g, b, a]| {
            [tint_channel(r, tr), tint_channel(g, tg), tint_channel(b, tb), a]
        })))
    }
}

/// `texture`'s source with `tint` applied through `tinter`.
///
/// The neutral tint returns the source itself. `None` while the texture is
/// pending.
pub fn tinted_bitmap(
    tinter: &dyn TextureTinter,
    texture: &Texture,
    tint: Rgb24,
) -> Option<Rc<Bitmap>> {
    if !texture.is_loaded() {
        return None;
    }
    if tint.is_neutral() {
        texture.source()
    } else {
        tinter.tint_texture(texture, tint)
    }
}
