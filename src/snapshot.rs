use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;

use crate::canvas::{Canvas, PixelCanvas};
use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::host::{Animator, HeadlessHost};

/// Copy a framebuffer into an RGB image.
pub fn to_image(canvas: &PixelCanvas) -> RgbImage {
    let (width, height) = canvas.pixel_size();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let c = Rgba::unpack(canvas.buffer()[y as usize * width + x as usize]);
        Rgb([c.r, c.g, c.b])
    })
}

/// Run `frames` frames off-screen and return the final framebuffer. At least
/// one frame is always rendered, so `0` behaves like `1`.
pub fn render_headless(config: &FieldConfig, frames: u64) -> Result<PixelCanvas> {
    let host = HeadlessHost::new(&config.surface_id, config.width as f64, config.height as f64)
        .with_frame_budget(frames.max(1));
    let mut animator = Animator::init(host, config)?;
    animator.run();
    Ok(animator.into_context())
}

/// Render `frames` frames off-screen and save the last one as an image.
/// The format follows the file extension.
pub fn save_snapshot<P: AsRef<Path>>(config: &FieldConfig, frames: u64, path: P) -> Result<()> {
    let canvas = render_headless(config, frames)?;
    let image = to_image(&canvas);
    if image.width() == 0 || image.height() == 0 {
        return Err(FieldError::InvalidConfig("snapshot surface is empty".into()));
    }
    image.save(path.as_ref())?;
    info!(frames, path = %path.as_ref().display(), "snapshot written");
    Ok(())
}
