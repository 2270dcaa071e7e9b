//! Demo scene touching every brush kind.

use std::f32::consts::FRAC_PI_3;
use std::rc::Rc;

use tincture_engine::coords::{AffineMatrix, Circle, Rect, Vec2};
use tincture_engine::paint::{
    Bitmap, Brush, PaintError, RadialGradientBrush, Rgb24, SolidBrush, Texture, TextureBrush,
};
use tincture_engine::scene::{DrawList, Shape, ShapeStyleRecord, ZIndex};

/// Lays out the demo in a `width` x `height` frame.
pub fn build(texture: &Rc<Texture>, width: f32, height: f32) -> Result<DrawList, PaintError> {
    let mut list = DrawList::new();
    let (w, h) = (width, height);

    list.push(
        ZIndex(-1),
        ShapeStyleRecord::filled(
            Shape::Rectangle(Rect::new(0.0, 0.0, w, h)).into_ref(),
            Rgb24::new(0x20232A),
            1.0,
        ),
    );

    // Repeating texture panel with a raw-color border.
    let tiles = Brush::from(TextureBrush::new(Rc::clone(texture))).into_ref();
    let mut panel = ShapeStyleRecord::new(
        Shape::Rectangle(Rect::new(w * 0.05, h * 0.08, w * 0.4, h * 0.5)).into_ref(),
        3.0,
        Rgb24::new(0xF0F0F0),
        1.0,
        Rgb24::BLACK,
        1.0,
        true,
    );
    panel.fill_brush = Some(tiles);
    list.push(ZIndex(0), panel);

    // Scaled, offset texture on a hexagon.
    let scaled = TextureBrush::new(Rc::clone(texture))
        .with_transform(AffineMatrix::scale(2.0, 2.0).then(&AffineMatrix::translation(5.0, 3.0)))
        .with_alpha(0.85);
    list.push(
        ZIndex(1),
        ShapeStyleRecord::filled(
            hexagon(Vec2::new(w * 0.25, h * 0.78), h * 0.16),
            Rgb24::BLACK,
            1.0,
        )
        .with_fill_brush(Brush::from(scaled).into_ref()),
    );

    // Radial gradient orb.
    let center = Vec2::new(w * 0.72, h * 0.35);
    let radius = h * 0.25;
    let orb = RadialGradientBrush::new(
        vec![Rgb24::new(0xFFF3B0), Rgb24::new(0xE09F3E), Rgb24::new(0x9E2A2B)],
        vec![1.0, 0.9, 0.0],
        vec![0.0, 0.6, 1.0],
        Circle::new(center.x - radius * 0.3, center.y - radius * 0.3, 0.0),
        Circle::new(center.x, center.y, radius),
    )?;
    list.push(
        ZIndex(1),
        ShapeStyleRecord::filled(
            Shape::Circle(Circle::new(center.x, center.y, radius)).into_ref(),
            Rgb24::BLACK,
            1.0,
        )
        .with_fill_brush(Brush::from(orb).into_ref()),
    );

    // Translucent ellipse with a brush-driven outline.
    let ellipse = Shape::Ellipse {
        center: Vec2::new(w * 0.72, h * 0.78),
        radii: Vec2::new(w * 0.18, h * 0.1),
    };
    list.push(
        ZIndex(2),
        ShapeStyleRecord::new(ellipse.into_ref(), 4.0, Rgb24::BLACK, 1.0, Rgb24::BLACK, 1.0, true)
            .with_fill_brush(Brush::from(SolidBrush::new(Rgb24::new(0x335C67), 0.6)).into_ref())
            .with_stroke_brush(Brush::from(SolidBrush::new(Rgb24::new(0xFFF3B0), 1.0)).into_ref()),
    );

    // Open polyline, stroke only.
    let zigzag: Vec<Vec2> = (0..8)
        .map(|i| Vec2::new(w * (0.05 + 0.05 * i as f32), h * if i % 2 == 0 { 0.93 } else { 0.97 }))
        .collect();
    list.push(
        ZIndex(3),
        ShapeStyleRecord::stroked(
            Shape::Polyline(zigzag).into_ref(),
            2.0,
            Rgb24::new(0x9E2A2B),
            1.0,
        ),
    );

    Ok(list)
}

/// 16x16 two-tone checkerboard, 4px cells.
pub fn checkerboard() -> Result<Bitmap, tincture_engine::paint::BackendError> {
    const SIZE: u32 = 16;
    let mut pixels = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let light = ((x / 4) + (y / 4)) % 2 == 0;
            let rgba: &[u8] = if light {
                &[230, 230, 220, 255]
            } else {
                &[60, 110, 160, 255]
            };
            pixels.extend_from_slice(rgba);
        }
    }
    Bitmap::from_rgba8(SIZE, SIZE, pixels)
}

fn hexagon(center: Vec2, radius: f32) -> Rc<Shape> {
    let points = (0..6)
        .map(|i| center + Vec2::new(radius, radius).ellipse_offset(FRAC_PI_3 * i as f32))
        .collect();
    Shape::Polygon(points).into_ref()
}
