//! tiny-skia implementation of [`RasterSurface`].
//!
//! Canvas semantics on top of an immediate rasterizer:
//! - the outline is captured in device space when it is established
//! - fills rasterize that device path; shader paints follow the transform
//!   current at draw time
//! - strokes map the outline back through the current transform so the line
//!   width scales with it

use std::rc::Rc;

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, Mask, Paint, Path, PathBuilder, Pattern, Pixmap,
    PixmapRef, Point, RadialGradient, Rect as SkRect, SpreadMode, Stroke, Transform,
};

use crate::coords::{AffineMatrix, Circle, Vec2};
use crate::paint::{
    BackendError, Bitmap, CssColor, GradientPaint, PaintHandle, PatternPaint, Rgb24,
};
use crate::scene::Shape;

use super::raster::RasterSurface;

/// Rasterization settings for [`SkiaSurface`].
#[derive(Debug, Copy, Clone)]
pub struct RasterConfig {
    pub anti_alias: bool,
    /// Pattern sampling. Nearest keeps tiled textures pixel-exact.
    pub filter_quality: FilterQuality,
    pub fill_rule: FillRule,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            anti_alias: true,
            filter_quality: FilterQuality::Nearest,
            fill_rule: FillRule::Winding,
        }
    }
}

#[derive(Debug, Clone)]
struct DrawState {
    transform: Transform,
    global_alpha: f32,
    line_width: f32,
    fill: PaintHandle,
    stroke: PaintHandle,
}

impl Default for DrawState {
    fn default() -> Self {
        let black = PaintHandle::Solid(CssColor::Hex(Rgb24::BLACK));
        Self {
            transform: Transform::identity(),
            global_alpha: 1.0,
            line_width: 1.0,
            fill: black.clone(),
            stroke: black,
        }
    }
}

/// Offscreen raster surface backed by a premultiplied RGBA pixmap.
#[derive(Debug)]
pub struct SkiaSurface {
    pixmap: Pixmap,
    config: RasterConfig,
    state: DrawState,
    saved: Vec<DrawState>,
    /// Current outline, device space.
    outline: Option<Path>,
    approximated_start_radius: bool,
}

impl SkiaSurface {
    pub fn new(width: u32, height: u32, config: RasterConfig) -> Result<Self, BackendError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(BackendError::SurfaceAllocation { width, height })?;
        log::debug!("raster surface {width}x{height} ({config:?})");

        Ok(Self {
            pixmap,
            config,
            state: DrawState::default(),
            saved: Vec::new(),
            outline: None,
            approximated_start_radius: false,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[inline]
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Clears pixels and drawing state for a new frame.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.state = DrawState::default();
        self.saved.clear();
        self.outline = None;
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Copies the pixels out as a straight-alpha bitmap.
    pub fn to_bitmap(&self) -> Result<Bitmap, BackendError> {
        let mut pixels = Vec::with_capacity(self.pixmap.data().len());
        for c in self.pixmap.pixels() {
            let c = c.demultiply();
            pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Bitmap::from_rgba8(self.width(), self.height(), pixels)
    }
}

impl RasterSurface for SkiaSurface {
    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn transform(&mut self, m: &AffineMatrix) {
        if m.is_finite() {
            self.state.transform = self.state.transform.pre_concat(skia_transform(m));
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_outline(&mut self, shape: &Shape) {
        self.outline = shape_path(shape).and_then(|p| p.transform(self.state.transform));
    }

    fn set_fill_style(&mut self, paint: &PaintHandle) {
        self.state.fill = paint.clone();
    }

    fn set_stroke_style(&mut self, paint: &PaintHandle) {
        self.state.stroke = paint.clone();
    }

    fn create_pattern(
        &mut self,
        bitmap: &Rc<Bitmap>,
        repeat: bool,
    ) -> Result<PatternPaint, BackendError> {
        let pattern = PatternPaint::from_bitmap(bitmap, repeat);
        if pattern_pixmap(&pattern).is_none() {
            return Err(BackendError::PatternCreation(format!(
                "{}x{} bitmap exceeds raster limits",
                pattern.width(),
                pattern.height()
            )));
        }
        Ok(pattern)
    }

    fn create_radial_gradient(
        &mut self,
        start: Circle,
        end: Circle,
    ) -> Result<GradientPaint, BackendError> {
        if !start.is_valid() || !end.is_valid() {
            return Err(BackendError::GradientCreation(format!(
                "invalid circles {start:?} -> {end:?}"
            )));
        }
        if start.r > 0.0 && !self.approximated_start_radius {
            log::debug!("radial gradient start radius {} approximated as a focal point", start.r);
            self.approximated_start_radius = true;
        }
        Ok(GradientPaint::new(start, end))
    }

    fn fill(&mut self) -> Result<(), BackendError> {
        let Self {
            pixmap,
            config,
            state,
            outline,
            ..
        } = self;
        let Some(path) = outline.as_ref() else {
            return Ok(());
        };

        match &state.fill {
            PaintHandle::Pattern(p) if !p.repeat() => {
                let mask = path_mask(pixmap, path, config.fill_rule, config.anti_alias)?;
                fill_footprint(pixmap, p, state.global_alpha, state.transform, &mask, config)
            }
            handle => {
                let Some(paint) = make_paint(handle, state.global_alpha, state.transform, config)?
                else {
                    return Ok(());
                };
                pixmap.fill_path(path, &paint, config.fill_rule, Transform::identity(), None);
                Ok(())
            }
        }
    }

    fn stroke(&mut self) -> Result<(), BackendError> {
        let Self {
            pixmap,
            config,
            state,
            outline,
            ..
        } = self;
        let Some(path) = outline.as_ref() else {
            return Ok(());
        };
        // A singular transform collapses the stroke to nothing.
        let ts = state.transform;
        let Some(local) = ts.invert().and_then(|inv| path.clone().transform(inv)) else {
            return Ok(());
        };
        let stroke = Stroke {
            width: state.line_width,
            ..Stroke::default()
        };

        match &state.stroke {
            PaintHandle::Pattern(p) if !p.repeat() => {
                let Some(device) = local.stroke(&stroke, 1.0).and_then(|s| s.transform(ts)) else {
                    return Ok(());
                };
                let mask = path_mask(pixmap, &device, FillRule::Winding, config.anti_alias)?;
                fill_footprint(pixmap, p, state.global_alpha, ts, &mask, config)
            }
            handle => {
                let Some(paint) =
                    make_paint(handle, state.global_alpha, Transform::identity(), config)?
                else {
                    return Ok(());
                };
                pixmap.stroke_path(&local, &paint, &stroke, ts, None);
                Ok(())
            }
        }
    }
}

#[inline]
fn skia_transform(m: &AffineMatrix) -> Transform {
    Transform::from_row(m.a, m.b, m.c, m.d, m.tx, m.ty)
}

fn shape_path(shape: &Shape) -> Option<Path> {
    match shape {
        Shape::Rectangle(r) => {
            let r = r.normalized();
            SkRect::from_xywh(r.origin.x, r.origin.y, r.size.x, r.size.y)
                .map(PathBuilder::from_rect)
        }
        Shape::Circle(c) => PathBuilder::from_circle(c.x, c.y, c.r),
        Shape::Ellipse { center, radii } => SkRect::from_xywh(
            center.x - radii.x,
            center.y - radii.y,
            radii.x * 2.0,
            radii.y * 2.0,
        )
        .and_then(PathBuilder::from_oval),
        Shape::Polyline(points) => polygon_path(points, false),
        Shape::Polygon(points) => polygon_path(points, true),
    }
}

fn polygon_path(points: &[Vec2], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn skia_color(color: CssColor, global_alpha: f32) -> Color {
    let rgb = color.rgb();
    let mut c = Color::from_rgba8(rgb.r(), rgb.g(), rgb.b(), 255);
    c.set_alpha((color.alpha() * global_alpha).clamp(0.0, 1.0));
    c
}

#[inline]
fn spread(repeat: bool) -> SpreadMode {
    if repeat {
        SpreadMode::Repeat
    } else {
        SpreadMode::Pad
    }
}

fn pattern_pixmap(pattern: &PatternPaint) -> Option<PixmapRef<'_>> {
    PixmapRef::from_bytes(pattern.data(), pattern.width(), pattern.height())
}

/// Paint for `handle`, with shaders placed by `shader_ts`.
///
/// `Ok(None)` when the paint has nothing to draw (a gradient without stops).
fn make_paint<'a>(
    handle: &'a PaintHandle,
    global_alpha: f32,
    shader_ts: Transform,
    config: &RasterConfig,
) -> Result<Option<Paint<'a>>, BackendError> {
    let mut paint = Paint {
        anti_alias: config.anti_alias,
        ..Paint::default()
    };

    match handle {
        PaintHandle::Solid(color) => paint.set_color(skia_color(*color, global_alpha)),
        PaintHandle::RadialGradient(g) => {
            let stops = g
                .stops()
                .iter()
                .map(|s| GradientStop::new(s.offset, skia_color(s.color, global_alpha)))
                .collect();
            let (start, end) = (g.start(), g.end());
            let Some(shader) = RadialGradient::new(
                Point::from_xy(start.x, start.y),
                Point::from_xy(end.x, end.y),
                end.r,
                stops,
                SpreadMode::Pad,
                shader_ts,
            ) else {
                return Ok(None);
            };
            paint.shader = shader;
        }
        PaintHandle::Pattern(p) => {
            let pixels = pattern_pixmap(p)
                .ok_or_else(|| BackendError::Draw("pattern pixels rejected".into()))?;
            paint.shader = Pattern::new(
                pixels,
                spread(p.repeat()),
                config.filter_quality,
                global_alpha,
                shader_ts,
            );
        }
    }

    Ok(Some(paint))
}

fn path_mask(
    pixmap: &Pixmap,
    path: &Path,
    rule: FillRule,
    anti_alias: bool,
) -> Result<Mask, BackendError> {
    let mut mask = Mask::new(pixmap.width(), pixmap.height())
        .ok_or_else(|| BackendError::Draw("mask allocation failed".into()))?;
    mask.fill_path(path, rule, anti_alias, Transform::identity());
    Ok(mask)
}

/// Non-repeating pattern: paints the bitmap's own rectangle, clipped by `mask`.
fn fill_footprint(
    pixmap: &mut Pixmap,
    pattern: &PatternPaint,
    global_alpha: f32,
    ts: Transform,
    mask: &Mask,
    config: &RasterConfig,
) -> Result<(), BackendError> {
    let Some(rect) = SkRect::from_xywh(0.0, 0.0, pattern.width() as f32, pattern.height() as f32)
    else {
        return Ok(());
    };
    let pixels = pattern_pixmap(pattern)
        .ok_or_else(|| BackendError::Draw("pattern pixels rejected".into()))?;
    let paint = Paint {
        shader: Pattern::new(
            pixels,
            SpreadMode::Pad,
            config.filter_quality,
            global_alpha,
            Transform::identity(),
        ),
        anti_alias: config.anti_alias,
        ..Paint::default()
    };
    pixmap.fill_rect(rect, &paint, ts, Some(mask));
    Ok(())
}
