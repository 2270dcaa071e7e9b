//! tincture-studio: renders a demo scene through the brush pipeline.
//!
//! The raster pass always runs; `--gpu` additionally draws the repeating
//! texture fills through the wgpu tile program and writes a second PNG.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use tincture_engine::device::{GpuInit, HeadlessGpu};
use tincture_engine::logging::{LoggingConfig, init_logging};
use tincture_engine::paint::{Bitmap, Rgb24, Texture};
use tincture_engine::render::{
    RasterConfig, RasterRenderer, RenderCtx, RenderTarget, SkiaSurface, TileConfig, TileFrame,
    TileRenderer,
};
use tincture_engine::scene::DrawList;

mod scene;

#[derive(Parser, Debug)]
#[command(name = "tincture-studio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render the tincture demo scene to PNG", long_about = None)]
struct Args {
    /// Output PNG for the raster pass
    #[arg(short, long, default_value = "tincture.png")]
    out: PathBuf,

    #[arg(long, default_value_t = 512)]
    width: u32,

    #[arg(long, default_value_t = 384)]
    height: u32,

    /// World tint, hex (`7f7fff`, `#7f7fff` or `0x7f7fff`)
    #[arg(long, default_value = "ffffff", value_parser = parse_tint)]
    tint: Rgb24,

    /// World alpha in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    alpha: f32,

    /// PNG used as the tile texture; a checkerboard is generated otherwise
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Also render textured fills with the GPU tile program
    #[arg(long)]
    gpu: bool,

    /// Log filter, e.g. `debug` or `tincture_engine=trace`
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.clone().map(LoggingConfig::with_filter).unwrap_or_default());

    anyhow::ensure!((0.0..=1.0).contains(&args.alpha), "--alpha must be within [0, 1]");

    let texture = Rc::new(Texture::pending());
    let mut draw_list = scene::build(&texture, args.width as f32, args.height as f32)?;

    let mut surface = SkiaSurface::new(args.width, args.height, RasterConfig::default())?;
    let mut renderer = RasterRenderer::new();

    // First frame runs before the texture arrives; its fills are deferred.
    let first = renderer.render(&mut surface, &mut draw_list, args.alpha, args.tint)?;
    log::info!("frame 1: {first:?}");

    texture.finish_loading(load_texture(args.texture.as_deref())?);

    surface.clear();
    let second = renderer.render(&mut surface, &mut draw_list, args.alpha, args.tint)?;
    log::info!("frame 2: {second:?}");

    save_png(&args.out, &surface.to_bitmap()?)?;
    log::info!("wrote {}", args.out.display());

    if args.gpu {
        let gpu_out = args.out.with_extension("gpu.png");
        render_gpu(&args, &mut draw_list, &gpu_out)?;
        log::info!("wrote {}", gpu_out.display());
    }

    Ok(())
}

fn render_gpu(args: &Args, draw_list: &mut DrawList, out: &Path) -> Result<()> {
    let gpu = HeadlessGpu::new(GpuInit::default())?;
    let target = gpu.create_target(args.width, args.height)?;

    let mut encoder = gpu.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("tincture-studio tile encoder"),
    });
    target.clear(&mut encoder);

    let ctx = RenderCtx::offscreen(&gpu, &target);
    let frame = TileFrame {
        world_alpha: args.alpha,
        tint: args.tint,
        ..TileFrame::default()
    };

    let mut tiles = TileRenderer::new(TileConfig::default());
    let stats = {
        let mut rt = RenderTarget::new(&mut encoder, target.view());
        tiles
            .render(&ctx, &mut rt, draw_list, &frame)
            .context("tile pass failed")?
    };
    gpu.queue().submit(Some(encoder.finish()));
    log::info!("tile pass: {stats:?}");

    save_png(out, &gpu.read_bitmap(&target)?)
}

fn load_texture(path: Option<&Path>) -> Result<Bitmap> {
    let Some(path) = path else {
        return Ok(scene::checkerboard()?);
    };
    let image = image::open(path)
        .with_context(|| format!("failed to open texture {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(Bitmap::from_rgba8(width, height, image.into_raw())?)
}

fn save_png(path: &Path, bitmap: &Bitmap) -> Result<()> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let image = image::RgbaImage::from_raw(width, height, bitmap.pixels().to_vec())
        .context("bitmap size does not match its pixel data")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn parse_tint(s: &str) -> Result<Rgb24, String> {
    let hex = s.trim_start_matches('#').trim_start_matches("0x");
    if hex.is_empty() || hex.len() > 6 {
        return Err(format!("expected up to 6 hex digits, got `{s}`"));
    }
    u32::from_str_radix(hex, 16)
        .map(Rgb24::new)
        .map_err(|e| format!("invalid tint `{s}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_accepts_common_hex_forms() {
        assert_eq!(parse_tint("7f7fff"), Ok(Rgb24::new(0x7F7FFF)));
        assert_eq!(parse_tint("#7F7FFF"), Ok(Rgb24::new(0x7F7FFF)));
        assert_eq!(parse_tint("0xff"), Ok(Rgb24::new(0x0000FF)));
    }

    #[test]
    fn tint_rejects_garbage() {
        assert!(parse_tint("").is_err());
        assert!(parse_tint("1234567").is_err());
        assert!(parse_tint("zzzzzz").is_err());
    }

    #[test]
    fn demo_scene_renders_every_record() {
        let texture = Rc::new(Texture::pending());
        let mut list = scene::build(&texture, 128.0, 96.0).unwrap();
        let mut surface = SkiaSurface::new(128, 96, RasterConfig::default()).unwrap();
        let mut renderer = RasterRenderer::new();

        let first = renderer.render(&mut surface, &mut list, 1.0, Rgb24::NEUTRAL).unwrap();
        assert_eq!(first.deferred, 2);

        texture.finish_loading(scene::checkerboard().unwrap());
        let second = renderer.render(&mut surface, &mut list, 1.0, Rgb24::NEUTRAL).unwrap();
        assert_eq!(second.deferred, 0);
        assert_eq!(second.filled, 5);
        assert_eq!(second.stroked, 3);
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::try_parse_from(["tincture-studio", "--tint", "#808080"]).unwrap();
        assert_eq!(args.tint, Rgb24::new(0x808080));
        assert_eq!(args.width, 512);
        assert!(!args.gpu);
    }
}
