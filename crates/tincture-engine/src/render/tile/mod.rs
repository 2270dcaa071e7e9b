//! GPU tile program: repeating-texture fills rendered with wgpu.
//!
//! Mirrors the raster backend's repeating pattern. [`TileRenderer`] tints
//! bitmaps with the brush's own tinter before upload, so tinted texels match
//! the raster pattern byte for byte, and leaves the `tint` uniform neutral.

mod mesh;
mod renderer;
mod select;
mod uniforms;

pub use mesh::{TileMesh, TileVertex};
pub use renderer::{TileFrame, TileRenderer, TileStats};
pub use select::{TileCandidate, TileSelection, check_tile_size, classify};
pub use uniforms::{TileUniforms, tile_texcoord};

/// Texel filtering for tile sampling.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TileFilter {
    /// Pixel-exact; matches the raster backend's default.
    #[default]
    Nearest,
    Linear,
}

impl TileFilter {
    #[inline]
    pub(crate) fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            TileFilter::Nearest => wgpu::FilterMode::Nearest,
            TileFilter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Settings for [`TileRenderer`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileConfig {
    pub filter: TileFilter,
    /// Segments used to flatten circles and ellipses.
    pub circle_segments: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            filter: TileFilter::Nearest,
            circle_segments: 64,
        }
    }
}
