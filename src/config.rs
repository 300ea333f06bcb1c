use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};
use crate::lorenz::LorenzParams;
use crate::particle::TrailMode;
use crate::projection::Viewpoint;

/// Everything that shapes one particle field. All fields have defaults, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Identifier of the drawing surface to attach to.
    pub surface_id: String,
    pub particle_count: usize,
    pub trail: TrailMode,
    pub params: LorenzParams,
    /// Integration step.
    pub dt: f64,
    pub perspective: f64,
    pub base_scale: f64,
    /// Radians added to the vertical-axis angle every frame.
    pub rotation_speed: f64,
    /// Fixed tilt about the horizontal axis.
    pub tilt: f64,
    pub style: RenderStyle,
    /// Draw far particles first. Off by default: frames are drawn in particle order.
    pub depth_sorted: bool,
    /// Fixed RNG seed for reproducible starting positions.
    pub seed: Option<u64>,
    pub width: usize,
    pub height: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let view = Viewpoint::default();
        Self {
            surface_id: "lorenz-canvas".to_string(),
            particle_count: 300,
            trail: TrailMode::default(),
            params: LorenzParams::default(),
            dt: 0.01,
            perspective: view.perspective,
            base_scale: view.base_scale,
            rotation_speed: view.rotation_speed,
            tilt: view.angle_x,
            style: RenderStyle::default(),
            depth_sorted: false,
            seed: None,
            width: 1280,
            height: 720,
        }
    }
}

/// Colors and sizes used by the renderer. Saturation and lightness are fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Background overlay opacity with trails on.
    pub trail_fade: f64,
    /// Background overlay opacity without trails; higher so old dots clear quickly.
    pub dot_fade: f64,
    pub line_width: f64,
    pub trail_saturation: f64,
    pub trail_lightness: f64,
    pub trail_alpha: f64,
    pub head_radius: f64,
    pub head_saturation: f64,
    pub head_lightness: f64,
    pub head_alpha: f64,
    pub dot_radius: f64,
    pub dot_alpha: f64,
    /// How far outside the surface a dot may sit and still be drawn.
    pub dot_margin: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            trail_fade: 0.05,
            dot_fade: 0.15,
            line_width: 1.5,
            trail_saturation: 0.7,
            trail_lightness: 0.6,
            trail_alpha: 0.25,
            head_radius: 2.5,
            head_saturation: 0.8,
            head_lightness: 0.7,
            head_alpha: 0.5,
            dot_radius: 1.5,
            dot_alpha: 0.8,
            dot_margin: 10.0,
        }
    }
}

impl FieldConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: FieldConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(FieldError::InvalidConfig("particle_count must be at least 1".into()));
        }
        if let TrailMode::Bounded { max_len: 0 } = self.trail {
            return Err(FieldError::InvalidConfig("trail max_len must be at least 1".into()));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FieldError::InvalidConfig(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.perspective.is_finite() && self.perspective > 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "perspective must be positive, got {}",
                self.perspective
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(FieldError::InvalidConfig("surface dimensions must be non-zero".into()));
        }
        Ok(())
    }

    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint {
            angle_x: self.tilt,
            rotation_speed: self.rotation_speed,
            perspective: self.perspective,
            base_scale: self.base_scale,
            ..Viewpoint::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: FieldConfig =
            serde_json::from_str(r#"{ "particle_count": 12, "trail": { "kind": "none" } }"#).unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.trail, TrailMode::None);
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.style, RenderStyle::default());
    }

    #[test]
    fn bounded_trail_parses() {
        let config: FieldConfig =
            serde_json::from_str(r#"{ "trail": { "kind": "bounded", "max_len": 40 } }"#).unwrap();
        assert_eq!(config.trail, TrailMode::Bounded { max_len: 40 });
    }

    #[test]
    fn rejects_degenerate_values() {
        let bad = [
            FieldConfig { particle_count: 0, ..FieldConfig::default() },
            FieldConfig { trail: TrailMode::Bounded { max_len: 0 }, ..FieldConfig::default() },
            FieldConfig { dt: 0.0, ..FieldConfig::default() },
            FieldConfig { perspective: -1.0, ..FieldConfig::default() },
            FieldConfig { width: 0, ..FieldConfig::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(FieldError::InvalidConfig(_))));
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FieldConfig::load("/nonexistent/lorenz.json").unwrap_err();
        assert!(matches!(err, FieldError::Io(_)));
    }
}
