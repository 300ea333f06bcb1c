//! The environment a particle field runs in: a named drawing surface, its
//! size, and a frame scheduler.

use tracing::{debug, error, info};

use crate::canvas::{Canvas, PixelCanvas};
use crate::color::BACKGROUND;
use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::field::ParticleField;

pub trait Host {
    type Context: Canvas;

    fn has_surface(&self, id: &str) -> bool;
    /// Acquire the 2D drawing context of surface `id`.
    fn context_2d(&mut self, id: &str) -> Option<Self::Context>;
    /// Current surface size in logical pixels.
    fn logical_size(&self) -> (f64, f64);
    fn pixel_ratio(&self) -> f64;
    /// Show a finished frame and wait for the next slot. Returning false
    /// means the surface is gone and no further frame should be produced.
    fn present(&mut self, context: &Self::Context) -> bool;
}

/// Drives one [`ParticleField`] on one host surface.
pub struct Animator<H: Host> {
    host: H,
    context: H::Context,
    field: ParticleField,
    running: bool,
}

impl<H: Host> Animator<H> {
    pub fn init(mut host: H, config: &FieldConfig) -> Result<Self> {
        if !host.has_surface(&config.surface_id) {
            return Err(FieldError::SurfaceNotFound(config.surface_id.clone()));
        }
        let mut context = host.context_2d(&config.surface_id).ok_or(FieldError::ContextUnavailable)?;

        let (width, height) = host.logical_size();
        let field = ParticleField::from_config(config, width, height, host.pixel_ratio())?;
        field.configure_surface(&mut context);

        Ok(Animator { host, context, field, running: true })
    }

    /// Like [`Animator::init`], but failures are logged and yield `None`.
    pub fn launch(host: H, config: &FieldConfig) -> Option<Self> {
        match Self::init(host, config) {
            Ok(animator) => {
                info!(
                    particles = config.particle_count,
                    surface = %config.surface_id,
                    "Lorenz attractor initialized"
                );
                Some(animator)
            }
            Err(e) => {
                error!("Cannot start Lorenz attractor: {}", e);
                None
            }
        }
    }

    fn sync_size(&mut self) {
        let (width, height) = self.host.logical_size();
        let ratio = self.host.pixel_ratio();
        if self.field.resize(width, height, ratio) {
            debug!(width, height, ratio, "surface resized");
            self.field.configure_surface(&mut self.context);
        }
    }

    /// Produce one frame: pick up resizes, step, render, present.
    /// Returns whether another frame should follow.
    pub fn frame(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.sync_size();
        self.field.step();
        self.field.render(&mut self.context);
        self.running = self.host.present(&self.context);
        if !self.running {
            debug!(steps = self.field.steps_taken(), "frame loop stopped");
        }
        self.running
    }

    /// Run until the host stops accepting frames. Returns the frame count.
    pub fn run(&mut self) -> u64 {
        let mut frames = 0;
        while self.running {
            self.frame();
            frames += 1;
        }
        frames
    }

    /// Run at most `limit` frames.
    pub fn run_frames(&mut self, limit: u64) -> u64 {
        let mut frames = 0;
        while frames < limit && self.running {
            self.frame();
            frames += 1;
        }
        frames
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn context(&self) -> &H::Context {
        &self.context
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_context(self) -> H::Context {
        self.context
    }
}

/// In-memory host: one optional surface backed by a [`PixelCanvas`].
pub struct HeadlessHost {
    surface_id: Option<String>,
    context_available: bool,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    frame_budget: Option<u64>,
    presented: u64,
}

impl HeadlessHost {
    pub fn new(surface_id: &str, width: f64, height: f64) -> Self {
        HeadlessHost {
            surface_id: Some(surface_id.to_string()),
            context_available: true,
            width,
            height,
            pixel_ratio: 1.0,
            frame_budget: None,
            presented: 0,
        }
    }

    /// A host with no surface at all.
    pub fn empty(width: f64, height: f64) -> Self {
        HeadlessHost { surface_id: None, ..HeadlessHost::new("", width, height) }
    }

    pub fn without_context(mut self) -> Self {
        self.context_available = false;
        self
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Stop the loop after `frames` presented frames.
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Host for HeadlessHost {
    type Context = PixelCanvas;

    fn has_surface(&self, id: &str) -> bool {
        self.surface_id.as_deref() == Some(id)
    }

    fn context_2d(&mut self, id: &str) -> Option<PixelCanvas> {
        if !self.has_surface(id) || !self.context_available {
            return None;
        }
        Some(PixelCanvas::new(0, 0, BACKGROUND))
    }

    fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn present(&mut self, _context: &PixelCanvas) -> bool {
        self.presented += 1;
        self.frame_budget.is_none_or(|budget| self.presented < budget)
    }
}
