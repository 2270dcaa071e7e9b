use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::BackendError;

/// Straight-alpha RGBA8 pixel buffer, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wraps raw RGBA8 data.
    ///
    /// Fails when either dimension is zero or `pixels.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BackendError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if width == 0 || height == 0 || expected != Some(pixels.len()) {
            return Err(BackendError::InvalidBitmap {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color bitmap.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, BackendError> {
        let count = (width as usize).saturating_mul(height as usize);
        let pixels = rgba.iter().copied().cycle().take(count.saturating_mul(4)).collect();
        Self::from_rgba8(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Returns a same-sized bitmap with `f` applied to every pixel.
    pub fn map_pixels(&self, mut f: impl FnMut([u8; 4]) -> [u8; 4]) -> Bitmap {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            pixels.extend_from_slice(&f([px[0], px[1], px[2], px[3]]));
        }
        Bitmap {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Premultiplied copy of the pixel data, rows top to bottom.
    pub fn premultiplied(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&premultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Premultiplied copy with rows bottom to top.
    pub fn premultiplied_flipped(&self) -> Vec<u8> {
        let row = self.width as usize * 4;
        let mut out = Vec::with_capacity(self.pixels.len());
        for src in self.pixels.chunks_exact(row).rev() {
            for px in src.chunks_exact(4) {
                out.extend_from_slice(&premultiply([px[0], px[1], px[2], px[3]]));
            }
        }
        out
    }
}

#[inline]
fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let mul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    [mul(r), mul(g), mul(b), a]
}

/// Resource that may not be ready on the first frames it is referenced.
pub trait Loadable {
    fn is_loaded(&self) -> bool;
}

/// Identity of a texture across frames; used to key GPU uploads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    /// Allocates a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TextureId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Texture resource shared with brushes.
///
/// Loading is driven by the resource layer; brushes only observe
/// [`Loadable::is_loaded`] and read the source bitmap once it is present.
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    source: RefCell<Option<Rc<Bitmap>>>,
}

impl Texture {
    /// Texture whose bitmap has not arrived yet.
    pub fn pending() -> Self {
        Self {
            id: TextureId::next(),
            source: RefCell::new(None),
        }
    }

    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            id: TextureId::next(),
            source: RefCell::new(Some(Rc::new(bitmap))),
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Installs the decoded bitmap. Replaces any previous source.
    pub fn finish_loading(&self, bitmap: Bitmap) {
        log::trace!("texture {} loaded ({}x{})", self.id.0, bitmap.width(), bitmap.height());
        *self.source.borrow_mut() = Some(Rc::new(bitmap));
    }

    /// Source bitmap, if loaded.
    pub fn source(&self) -> Option<Rc<Bitmap>> {
        self.source.borrow().clone()
    }
}

impl Loadable for Texture {
    #[inline]
    fn is_loaded(&self) -> bool {
        self.source.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_rejects_mismatched_length() {
        let err = Bitmap::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            BackendError::InvalidBitmap {
                width: 2,
                height: 2,
                len: 15,
            }
        );
        assert!(Bitmap::from_rgba8(0, 1, Vec::new()).is_err());
    }

    #[test]
    fn filled_bitmap_repeats_color() {
        let b = Bitmap::filled(3, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(b.pixels().len(), 24);
        assert_eq!(b.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(b.pixel(3, 0), None);
    }

    #[test]
    fn premultiplied_scales_color_by_alpha() {
        let b = Bitmap::filled(1, 1, [255, 128, 0, 128]).unwrap();
        assert_eq!(b.premultiplied(), vec![128, 64, 0, 128]);
    }

    #[test]
    fn flipped_reverses_rows() {
        let pixels = vec![
            255, 0, 0, 255, // row 0
            0, 0, 255, 255, // row 1
        ];
        let b = Bitmap::from_rgba8(1, 2, pixels).unwrap();
        assert_eq!(b.premultiplied_flipped(), vec![0, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn texture_reports_loaded_after_finish() {
        let t = Texture::pending();
        assert!(!t.is_loaded());
        assert!(t.source().is_none());

        t.finish_loading(Bitmap::filled(1, 1, [0, 0, 0, 255]).unwrap());
        assert!(t.is_loaded());
        assert_eq!(t.source().map(|b| b.width()), Some(1));
    }

    #[test]
    fn texture_ids_are_unique() {
        assert_ne!(Texture::pending().id(), Texture::pending().id());
    }
}
