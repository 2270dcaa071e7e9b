use std::rc::Rc;

use crate::coords::Circle;

use super::{Bitmap, CssColor};

/// Backend-ready paint produced by a brush.
///
/// Handles are cheap to clone; gradient and pattern payloads are shared, so a
/// cached handle handed out twice is the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintHandle {
    Solid(CssColor),
    RadialGradient(Rc<GradientPaint>),
    Pattern(Rc<PatternPaint>),
}

impl PaintHandle {
    /// Identity comparison: equal colors, or the same shared payload.
    pub fn same_handle(&self, other: &PaintHandle) -> bool {
        match (self, other) {
            (PaintHandle::Solid(a), PaintHandle::Solid(b)) => a == b,
            (PaintHandle::RadialGradient(a), PaintHandle::RadialGradient(b)) => Rc::ptr_eq(a, b),
            (PaintHandle::Pattern(a), PaintHandle::Pattern(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Canvas-style string for solid paints.
    pub fn css(&self) -> Option<String> {
        match self {
            PaintHandle::Solid(c) => Some(c.to_string()),
            _ => None,
        }
    }
}

/// One registered gradient stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: CssColor,
}

/// Radial gradient between two circles, built by a surface and filled with
/// stops by the brush.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPaint {
    start: Circle,
    end: Circle,
    stops: Vec<GradientStop>,
}

impl GradientPaint {
    pub fn new(start: Circle, end: Circle) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Appends a stop. Stops are kept in registration order.
    pub fn add_color_stop(&mut self, offset: f32, color: CssColor) {
        self.stops.push(GradientStop { offset, color });
    }

    #[inline]
    pub fn start(&self) -> Circle {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Circle {
        self.end
    }

    #[inline]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// Bitmap pattern with its premultiplied pixels ready for sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPaint {
    width: u32,
    height: u32,
    premultiplied: Vec<u8>,
    repeat: bool,
}

impl PatternPaint {
    pub fn from_bitmap(bitmap: &Bitmap, repeat: bool) -> Self {
        Self {
            width: bitmap.width(),
            height: bitmap.height(),
            premultiplied: bitmap.premultiplied(),
            repeat,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8, rows top to bottom.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.premultiplied
    }

    #[inline]
    pub fn repeat(&self) -> bool {
        self.repeat
    }
}
