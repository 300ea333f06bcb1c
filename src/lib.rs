pub mod math;
pub mod lorenz;
pub mod integrator;
pub mod projection;
pub mod color;
pub mod particle;
pub mod canvas;
pub mod config;
pub mod error;
pub mod field;
pub mod host;
pub mod window;
pub mod snapshot;

pub use math::{Projected, State};
pub use lorenz::{LorenzParams, derivatives, fixed_points};
pub use integrator::Rk4;
pub use projection::Viewpoint;
pub use color::{BACKGROUND, Rgba, golden_hue};
pub use particle::{Particle, Trace, TrailMode};
pub use canvas::{Canvas, LineCap, LineJoin, PixelCanvas};
pub use config::{FieldConfig, RenderStyle};
pub use error::FieldError;
pub use field::ParticleField;
pub use host::{Animator, HeadlessHost, Host};
pub use window::MinifbHost;
pub use snapshot::{render_headless, save_snapshot, to_image};
