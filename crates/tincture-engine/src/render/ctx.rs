use crate::coords::Viewport;
use crate::device::{HeadlessGpu, OffscreenTarget};

/// Device objects and output description for one GPU pass.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target_format: wgpu::TextureFormat,
    /// Logical size mapped onto the framebuffer.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            target_format,
            viewport,
        }
    }

    /// One logical pixel per texel of `target`.
    pub fn offscreen(gpu: &'a HeadlessGpu, target: &OffscreenTarget) -> Self {
        Self::new(
            gpu.device(),
            gpu.queue(),
            target.format(),
            Viewport::new(target.width() as f32, target.height() as f32),
        )
    }
}

/// Encoder and color attachment a pass records into. The pass loads the
/// existing contents.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            color_view,
        }
    }
}
