use bytemuck::{Pod, Zeroable};

use crate::coords::{AffineMatrix, Vec2, Viewport};
use crate::paint::Rgb24;

/// Uniform block of the tile program (128 bytes, std140-compatible).
///
///  offset   0  translation  mat3x3 (3 x vec4 columns)
///  offset  48  projection   mat3x3
///  offset  96  tint         vec3
///  offset 108  alpha        f32
///  offset 112  tile_size    vec2
///  offset 120  _pad         vec2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TileUniforms {
    pub translation: [[f32; 4]; 3],
    pub projection: [[f32; 4]; 3],
    pub tint: [f32; 3],
    pub alpha: f32,
    pub tile_size: [f32; 2],
    pub _pad: [f32; 2],
}

pub(super) const TILE_UNIFORM_SIZE: u64 = std::mem::size_of::<TileUniforms>() as u64;

impl TileUniforms {
    pub fn new(
        translation: &AffineMatrix,
        viewport: Viewport,
        tint: Rgb24,
        alpha: f32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            translation: translation.to_mat3(),
            projection: viewport.projection().to_mat3(),
            tint: tint.to_normalized(),
            alpha: alpha.clamp(0.0, 1.0),
            tile_size: [tile_width.max(1) as f32, tile_height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Returns the `wgpu` minimum binding size for the tile uniform block.
pub(super) fn uniform_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(TILE_UNIFORM_SIZE)
        .expect("TileUniforms has non-zero size by construction")
}

/// Rounds `value` up to a multiple of `alignment` (a power of two).
#[inline]
pub(super) fn align_to(value: u64, alignment: u64) -> u64 {
    let a = alignment.max(1);
    value.div_ceil(a) * a
}

#[inline]
fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// CPU mirror of the fragment stage's texture coordinate.
pub fn tile_texcoord(frag: Vec2, tile_size: Vec2) -> Vec2 {
    Vec2::new(
        glsl_mod(frag.x, tile_size.x) / tile_size.x,
        1.0 - glsl_mod(frag.y, tile_size.y) / tile_size.y,
    )
}
