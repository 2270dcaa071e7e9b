//! GPU device management for the tile path.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - creating offscreen color targets and reading them back

mod headless;

pub use headless::{GpuInit, HeadlessGpu, OffscreenTarget};
