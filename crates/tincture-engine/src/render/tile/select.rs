use std::rc::Rc;

use crate::paint::{BackendError, Bitmap, Rgb24, Texture, TextureTinter, tinted_bitmap};
use crate::scene::ShapeStyleRecord;

use super::mesh::TileMesh;

/// A record the tile program can draw.
pub struct TileCandidate {
    pub texture: Rc<Texture>,
    /// Untinted source, used to detect a reloaded texture.
    pub source: Rc<Bitmap>,
    pub tinter: Rc<dyn TextureTinter>,
    pub alpha: f32,
    pub mesh: TileMesh,
}

impl TileCandidate {
    /// Bitmap to upload for `tint`, tinted exactly as the raster pattern is.
    #[inline]
    pub fn pixels(&self, tint: Rgb24) -> Option<Rc<Bitmap>> {
        tinted_bitmap(&*self.tinter, &self.texture, tint)
    }
}

/// How the tile program treats one record.
pub enum TileSelection {
    Draw(TileCandidate),
    /// Repeating texture fill whose texture is still loading.
    Deferred,
    /// Left to the raster path.
    Skipped,
}

/// Classifies `record` for the tile program.
///
/// Only enabled fills with an untransformed, repeating texture brush and a
/// closed outline are drawn. The tile grid is anchored at the framebuffer
/// origin, so a brush transform cannot be expressed and such records are
/// skipped.
pub fn classify(record: &ShapeStyleRecord, circle_segments: u32) -> TileSelection {
    let Some(brush) = record.fill_brush.as_ref().filter(|_| record.fill_enabled) else {
        return TileSelection::Skipped;
    };
    let brush = brush.borrow();
    let Some(texture_brush) = brush.as_texture().filter(|b| b.repeat()) else {
        return TileSelection::Skipped;
    };
    if !texture_brush.transform().is_identity() {
        return TileSelection::Skipped;
    }
    let Some(source) = texture_brush.texture().source() else {
        return TileSelection::Deferred;
    };
    let Some(mesh) = TileMesh::from_shape(record.shape(), circle_segments) else {
        return TileSelection::Skipped;
    };

    TileSelection::Draw(TileCandidate {
        texture: Rc::clone(texture_brush.texture()),
        source,
        tinter: Rc::clone(texture_brush.tinter()),
        alpha: brush.alpha(),
        mesh,
    })
}

/// Rejects bitmaps the device cannot hold as a single 2D texture.
pub fn check_tile_size(width: u32, height: u32, max_dimension: u32) -> Result<(), BackendError> {
    if width == 0 || height == 0 || width > max_dimension || height > max_dimension {
        return Err(BackendError::PatternCreation(format!(
            "{width}x{height} bitmap exceeds the {max_dimension}px GPU texture limit"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{AffineMatrix, Rect, Vec2};
    use crate::paint::{Brush, BrushRef, PaintHandle, SolidBrush, TextureBrush};
    use crate::render::raster::testing::RecordingSurface;
    use crate::scene::Shape;

    fn square() -> Shape {
        Shape::Rectangle(Rect::new(0.0, 0.0, 16.0, 16.0))
    }

    fn loaded() -> Rc<Texture> {
        let pixels = (0..15u8).flat_map(|i| [i * 17, 255 - i * 17, 100, 255]).collect();
        Rc::new(Texture::from_bitmap(Bitmap::from_rgba8(5, 3, pixels).unwrap()))
    }

    fn textured(shape: Shape, brush: TextureBrush) -> ShapeStyleRecord {
        ShapeStyleRecord::filled(shape.into_ref(), Rgb24::BLACK, 1.0)
            .with_fill_brush(Brush::from(brush).into_ref())
    }

    #[test]
    fn repeating_texture_fill_is_drawn() {
        let texture = loaded();
        let record = textured(square(), TextureBrush::new(texture.clone()).with_alpha(0.5));

        let TileSelection::Draw(candidate) = classify(&record, 16) else {
            panic!("expected a tile draw");
        };
        assert_eq!(candidate.texture.id(), texture.id());
        assert!(Rc::ptr_eq(&candidate.source, &texture.source().unwrap()));
        assert_eq!(candidate.alpha, 0.5);
        assert_eq!(candidate.mesh.vertices.len(), 4);
    }

    #[test]
    fn plain_and_disabled_fills_are_skipped() {
        let plain = ShapeStyleRecord::filled(square().into_ref(), Rgb24::new(0xFF0000), 1.0);
        assert!(matches!(classify(&plain, 16), TileSelection::Skipped));

        let mut disabled = textured(square(), TextureBrush::new(loaded()));
        disabled.fill_enabled = false;
        assert!(matches!(classify(&disabled, 16), TileSelection::Skipped));
    }

    #[test]
    fn non_texture_brush_is_skipped() {
        let brush: BrushRef = Brush::from(SolidBrush::new(Rgb24::new(0x00FF00), 1.0)).into_ref();
        let record =
            ShapeStyleRecord::filled(square().into_ref(), Rgb24::BLACK, 1.0).with_fill_brush(brush);
        assert!(matches!(classify(&record, 16), TileSelection::Skipped));
    }

    #[test]
    fn non_repeating_texture_is_skipped() {
        let record = textured(square(), TextureBrush::new(loaded()).with_repeat(false));
        assert!(matches!(classify(&record, 16), TileSelection::Skipped));
    }

    #[test]
    fn transformed_texture_is_skipped() {
        let record = textured(
            square(),
            TextureBrush::new(loaded()).with_transform(AffineMatrix::translation(2.0, 1.0)),
        );
        assert!(matches!(classify(&record, 16), TileSelection::Skipped));

        // an explicit identity still draws
        let record =
            textured(square(), TextureBrush::new(loaded()).with_transform(AffineMatrix::IDENTITY));
        assert!(matches!(classify(&record, 16), TileSelection::Draw(_)));
    }

    #[test]
    fn pending_texture_is_deferred() {
        let record = textured(square(), TextureBrush::new(Rc::new(Texture::pending())));
        assert!(matches!(classify(&record, 16), TileSelection::Deferred));
    }

    #[test]
    fn open_outline_is_skipped() {
        let line = Shape::Polyline(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(8.0, 8.0),
        ]);
        let record = textured(line, TextureBrush::new(loaded()));
        assert!(matches!(classify(&record, 16), TileSelection::Skipped));
    }

    #[test]
    fn tinted_pixels_match_raster_pattern() {
        let texture = loaded();
        let mut brush = Brush::from(TextureBrush::new(texture.clone()));
        let tint = Rgb24::new(0x7F7F7F);

        let mut surface = RecordingSurface::default();
        let Some(PaintHandle::Pattern(pattern)) = brush.resolve_paint(&mut surface, tint).unwrap()
        else {
            panic!("expected pattern");
        };

        let record = textured(square(), TextureBrush::new(texture));
        let TileSelection::Draw(candidate) = classify(&record, 16) else {
            panic!("expected a tile draw");
        };
        let pixels = candidate.pixels(tint).unwrap();
        assert_eq!(pixels.premultiplied(), pattern.data());
        // 17 * 127 / 255 truncates to 8
        assert_eq!(pixels.pixel(1, 0), Some([8, 118, 49, 255]));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_tile_size(8192, 1, 8192).is_ok());
        assert!(matches!(
            check_tile_size(8193, 1, 8192),
            Err(BackendError::PatternCreation(_))
        ));
        assert!(check_tile_size(1, 8193, 8192).is_err());
        assert!(check_tile_size(0, 4, 8192).is_err());
    }
}
