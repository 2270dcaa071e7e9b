//! Tincture engine crate.
//!
//! This crate owns brush resolution and the two paint backends (tiny-skia raster
//! surface and wgpu tile shader) used by higher layers.

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
