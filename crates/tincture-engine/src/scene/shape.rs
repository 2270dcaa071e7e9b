use std::f32::consts::TAU;
use std::rc::Rc;

use crate::coords::{Circle, Rect, Vec2};

/// Geometry shared between records. Treated as immutable once attached.
pub type ShapeRef = Rc<Shape>;

/// Closed set of outlines a record can style.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rect),
    Circle(Circle),
    Ellipse { center: Vec2, radii: Vec2 },
    /// Open path. Can be stroked; filling closes it implicitly.
    Polyline(Vec<Vec2>),
    Polygon(Vec<Vec2>),
}

/// Type tag of a [`Shape`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Polyline,
    Polygon,
}

/// Flattened outline in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Shape {
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse { .. } => ShapeKind::Ellipse,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    #[inline]
    pub fn into_ref(self) -> ShapeRef {
        Rc::new(self)
    }

    /// Flattens the shape into points. Curves use `segments` (at least 3).
    pub fn outline(&self, segments: u32) -> Outline {
        match self {
            Shape::Rectangle(r) => Outline {
                points: r.corners().to_vec(),
                closed: true,
            },
            Shape::Circle(c) => Outline {
                points: ellipse_points(Vec2::new(c.x, c.y), Vec2::new(c.r, c.r), segments),
                closed: true,
            },
            Shape::Ellipse { center, radii } => Outline {
                points: ellipse_points(*center, *radii, segments),
                closed: true,
            },
            Shape::Polyline(points) => Outline {
                points: points.clone(),
                closed: false,
            },
            Shape::Polygon(points) => Outline {
                points: points.clone(),
                closed: true,
            },
        }
    }
}

fn ellipse_points(center: Vec2, radii: Vec2, segments: u32) -> Vec<Vec2> {
    let n = segments.max(3);
    (0..n)
        .map(|i| {
            let theta = TAU * i as f32 / n as f32;
            center + radii.ellipse_offset(theta)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        assert_eq!(Shape::Rectangle(Rect::new(0.0, 0.0, 1.0, 1.0)).kind(), ShapeKind::Rectangle);
        assert_eq!(Shape::Circle(Circle::new(0.0, 0.0, 1.0)).kind(), ShapeKind::Circle);
        assert_eq!(Shape::Polyline(vec![]).kind(), ShapeKind::Polyline);
    }

    #[test]
    fn rectangle_outline_is_closed_quad() {
        let outline = Shape::Rectangle(Rect::new(1.0, 2.0, 3.0, 4.0)).outline(16);
        assert!(outline.closed);
        assert_eq!(
            outline.points,
            vec![
                Vec2::new(1.0, 2.0),
                Vec2::new(4.0, 2.0),
                Vec2::new(4.0, 6.0),
                Vec2::new(1.0, 6.0),
            ]
        );
    }

    #[test]
    fn circle_outline_uses_segments() {
        let outline = Shape::Circle(Circle::new(10.0, 10.0, 5.0)).outline(8);
        assert_eq!(outline.points.len(), 8);
        assert_eq!(outline.points[0], Vec2::new(15.0, 10.0));
        for p in &outline.points {
            let d = ((p.x - 10.0).powi(2) + (p.y - 10.0).powi(2)).sqrt();
            assert!((d - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn degenerate_segment_count_is_clamped() {
        let outline = Shape::Ellipse {
            center: Vec2::ZERO,
            radii: Vec2::new(2.0, 1.0),
        }
        .outline(0);
        assert_eq!(outline.points.len(), 3);
    }

    #[test]
    fn polyline_stays_open() {
        let pts = vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0)];
        let outline = Shape::Polyline(pts.clone()).outline(8);
        assert!(!outline.closed);
        assert_eq!(outline.points, pts);
    }
}
