//! Paint backends.
//!
//! - `raster`: canvas-like surface contract and the draw-list renderer
//! - `skia`: tiny-skia implementation of that surface
//! - `tile`: wgpu program for repeating-texture fills
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The tile vertex shader converts to NDC using a viewport projection.

mod ctx;
pub mod raster;
pub mod skia;
pub mod tile;

pub use ctx::{RenderCtx, RenderTarget};
pub use raster::{RasterRenderer, RasterSurface, RenderStats};
pub use skia::{RasterConfig, SkiaSurface};
pub use tile::{TileConfig, TileFilter, TileFrame, TileRenderer, TileStats};
