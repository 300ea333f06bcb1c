use minifb::{Key, Window, WindowOptions};
use tracing::warn;

use crate::canvas::{Canvas, PixelCanvas};
use crate::color::BACKGROUND;
use crate::error::Result;
use crate::host::Host;

/// A native window presenting the particle field at a fixed frame rate.
/// Closing the window or pressing Escape ends the frame loop.
pub struct MinifbHost {
    surface_id: String,
    window: Window,
}

impl MinifbHost {
    pub fn open(surface_id: &str, title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(60);
        Ok(MinifbHost { surface_id: surface_id.to_string(), window })
    }
}

impl Host for MinifbHost {
    type Context = PixelCanvas;

    fn has_surface(&self, id: &str) -> bool {
        self.surface_id == id && self.window.is_open()
    }

    fn context_2d(&mut self, id: &str) -> Option<PixelCanvas> {
        if !self.has_surface(id) {
            return None;
        }
        let (width, height) = self.window.get_size();
        Some(PixelCanvas::new(width, height, BACKGROUND))
    }

    fn logical_size(&self) -> (f64, f64) {
        let (width, height) = self.window.get_size();
        (width as f64, height as f64)
    }

    // minifb scales the buffer to the window itself.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }

    fn present(&mut self, context: &PixelCanvas) -> bool {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return false;
        }
        let (width, height) = context.pixel_size();
        if width == 0 || height == 0 {
            // Minimised; keep pumping events until the window comes back.
            self.window.update();
            return self.window.is_open();
        }
        if let Err(e) = self.window.update_with_buffer(context.buffer(), width, height) {
            warn!("failed to present frame: {}", e);
            return false;
        }
        self.window.is_open()
    }
}
