use bytemuck::{Pod, Zeroable};

use crate::scene::Shape;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TileVertex {
    pub pos: [f32; 2], // logical px
}

impl TileVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TileVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Triangle fan over a closed outline.
///
/// Fans are exact for convex outlines (rectangles, circles, ellipses, convex
/// polygons); concave polygons over-cover.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMesh {
    pub vertices: Vec<TileVertex>,
    pub indices: Vec<u32>,
}

impl TileMesh {
    /// `None` for open or degenerate outlines.
    pub fn from_shape(shape: &Shape, circle_segments: u32) -> Option<Self> {
        let outline = shape.outline(circle_segments);
        if !outline.closed || outline.points.len() < 3 {
            return None;
        }
        if outline.points.iter().any(|p| !p.is_finite()) {
            return None;
        }

        let vertices: Vec<TileVertex> =
            outline.points.iter().map(|p| TileVertex { pos: [p.x, p.y] }).collect();
        let n = vertices.len() as u32;
        let indices = (1..n - 1).flat_map(|i| [0, i, i + 1]).collect();

        Some(Self { vertices, indices })
    }
}
