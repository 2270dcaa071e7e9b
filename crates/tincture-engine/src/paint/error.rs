use thiserror::Error;

/// Failure raised by a paint backend while creating or drawing a paint.
///
/// Not retried here; retry policy belongs to the renderer driving the frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("bitmap {width}x{height} does not match {len} bytes of RGBA8 data")]
    InvalidBitmap { width: u32, height: u32, len: usize },

    #[error("pattern creation failed: {0}")]
    PatternCreation(String),

    #[error("gradient creation failed: {0}")]
    GradientCreation(String),

    #[error("draw call failed: {0}")]
    Draw(String),

    #[error("cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
}

/// Errors produced while resolving or applying a brush.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintError {
    /// Gradient stop arrays differ in length.
    #[error("invalid gradient spec: {colors} colors, {alphas} alphas, {ratios} ratios")]
    InvalidGradientSpec {
        colors: usize,
        alphas: usize,
        ratios: usize,
    },

    /// A ratio stop is outside `[0, 1]` or smaller than its predecessor.
    #[error("gradient ratio at index {index} is out of range or decreasing")]
    UnorderedGradientRatios { index: usize },

    #[error(transparent)]
    Backend(#[from] BackendError),
}
