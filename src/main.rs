use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lorenz_field::{Animator, FieldConfig, MinifbHost, TrailMode, save_snapshot};

const OPEN_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "lorenz-field", version, about = "Lorenz attractor particle field")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Number of particles
    #[arg(short, long, global = true)]
    particles: Option<usize>,
    /// Trail length in frames; 0 draws dots without trails
    #[arg(short, long, global = true)]
    trail: Option<usize>,
    /// RNG seed for reproducible starting positions
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[arg(long, global = true)]
    width: Option<usize>,
    #[arg(long, global = true)]
    height: Option<usize>,
    /// Draw far particles first
    #[arg(long, global = true)]
    depth_sorted: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate in a window until it is closed or Escape is pressed
    Window,
    /// Render off-screen and save the final frame as an image
    Snapshot {
        /// Frames to simulate before saving
        #[arg(short, long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
        frames: u64,
        /// Output path; the extension picks the format
        #[arg(short, long, default_value = "lorenz.png")]
        out: PathBuf,
    },
}

impl Cli {
    fn field_config(&self) -> Result<FieldConfig, lorenz_field::FieldError> {
        let mut config = match &self.config {
            Some(path) => FieldConfig::load(path)?,
            None => FieldConfig::default(),
        };
        if let Some(n) = self.particles {
            config.particle_count = n;
        }
        if let Some(len) = self.trail {
            config.trail = match len {
                0 => TrailMode::None,
                max_len => TrailMode::Bounded { max_len },
            };
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        config.depth_sorted |= self.depth_sorted;
        config.validate()?;
        Ok(config)
    }
}

fn run_window(config: &FieldConfig) {
    for attempt in 1..=OPEN_ATTEMPTS {
        let host = match MinifbHost::open(&config.surface_id, "Lorenz attractor", config.width, config.height) {
            Ok(host) => host,
            Err(e) => {
                warn!(attempt, "could not open window: {}", e);
                thread::sleep(RETRY_DELAY);
                continue;
            }
        };
        let Some(mut animator) = Animator::launch(host, config) else {
            thread::sleep(RETRY_DELAY);
            continue;
        };
        let frames = animator.run();
        info!(frames, "window closed");
        return;
    }
    error!("giving up after {} attempts", OPEN_ATTEMPTS);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lorenz_field=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.field_config()?;

    match cli.command {
        Commands::Window => run_window(&config),
        Commands::Snapshot { frames, out } => save_snapshot(&config, frames, &out)?,
    }

    Ok(())
}
