use std::rc::Rc;

use crate::paint::{BrushRef, Rgb24};

use super::{Shape, ShapeKind, ShapeRef};

/// Binding of one shared shape to its stroke and fill style.
///
/// The shape and its kind tag are fixed at construction. Style scalars are
/// plain fields; the tint caches are refreshed by [`apply_tint`](Self::apply_tint).
/// A brush slot, when set, takes precedence over the raw color of that side.
#[derive(Debug, Clone)]
pub struct ShapeStyleRecord {
    pub stroke_width: f32,
    pub stroke_color: Rgb24,
    pub stroke_alpha: f32,
    pub fill_color: Rgb24,
    pub fill_alpha: f32,
    pub fill_enabled: bool,
    pub stroke_brush: Option<BrushRef>,
    pub fill_brush: Option<BrushRef>,

    stroke_tint: Rgb24,
    fill_tint: Rgb24,
    shape: ShapeRef,
    shape_kind: ShapeKind,
}

impl ShapeStyleRecord {
    pub fn new(
        shape: ShapeRef,
        stroke_width: f32,
        stroke_color: Rgb24,
        stroke_alpha: f32,
        fill_color: Rgb24,
        fill_alpha: f32,
        fill_enabled: bool,
    ) -> Self {
        let shape_kind = shape.kind();
        Self {
            stroke_width,
            stroke_color,
            stroke_alpha,
            fill_color,
            fill_alpha,
            fill_enabled,
            stroke_brush: None,
            fill_brush: None,
            stroke_tint: stroke_color,
            fill_tint: fill_color,
            shape,
            shape_kind,
        }
    }

    /// Fill-only record.
    pub fn filled(shape: ShapeRef, color: Rgb24, alpha: f32) -> Self {
        Self::new(shape, 0.0, Rgb24::BLACK, 1.0, color, alpha, true)
    }

    /// Stroke-only record.
    pub fn stroked(shape: ShapeRef, width: f32, color: Rgb24, alpha: f32) -> Self {
        Self::new(shape, width, color, alpha, Rgb24::BLACK, 1.0, false)
    }

    pub fn with_fill_brush(mut self, brush: BrushRef) -> Self {
        self.fill_brush = Some(brush);
        self.fill_enabled = true;
        self
    }

    pub fn with_stroke_brush(mut self, brush: BrushRef) -> Self {
        self.stroke_brush = Some(brush);
        self
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn shape_ref(&self) -> &ShapeRef {
        &self.shape
    }

    #[inline]
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }

    #[inline]
    pub fn stroke_tint(&self) -> Rgb24 {
        self.stroke_tint
    }

    #[inline]
    pub fn fill_tint(&self) -> Rgb24 {
        self.fill_tint
    }

    /// Whether anything would be stroked.
    #[inline]
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0
    }

    /// Recomputes the cached stroke/fill tints from the raw colors.
    pub fn apply_tint(&mut self, tint: Rgb24) {
        self.stroke_tint = self.stroke_color.tinted(tint);
        self.fill_tint = self.fill_color.tinted(tint);
    }
}

fn same_brush(a: &Option<BrushRef>, b: &Option<BrushRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Scalars compare by value; shape and brushes compare by identity.
impl PartialEq for ShapeStyleRecord {
    fn eq(&self, other: &Self) -> bool {
        self.stroke_width == other.stroke_width
            && self.stroke_color == other.stroke_color
            && self.stroke_alpha == other.stroke_alpha
            && self.stroke_tint == other.stroke_tint
            && self.fill_color == other.fill_color
            && self.fill_alpha == other.fill_alpha
            && self.fill_tint == other.fill_tint
            && self.fill_enabled == other.fill_enabled
            && self.shape_kind == other.shape_kind
            && Rc::ptr_eq(&self.shape, &other.shape)
            && same_brush(&self.stroke_brush, &other.stroke_brush)
            && same_brush(&self.fill_brush, &other.fill_brush)
    }
}
