use crate::math::{Projected, State};

/// Rotating perspective camera shared by every particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// Tilt about the horizontal axis. Tracked but not animated.
    pub angle_x: f64,
    /// Spin about the vertical axis, advanced once per frame.
    pub angle_y: f64,
    pub rotation_speed: f64,
    pub perspective: f64,
    pub base_scale: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            rotation_speed: 0.001,
            perspective: 800.0,
            base_scale: 10.0,
            center_x: 0.0,
            center_y: 0.0,
        }
    }
}

impl Viewpoint {
    pub fn advance(&mut self) {
        self.angle_y += self.rotation_speed;
    }

    /// Center on a `width` x `height` surface given in logical pixels.
    pub fn recenter(&mut self, width: f64, height: f64) {
        self.center_x = width / 2.0;
        self.center_y = height / 2.0;
    }

    pub fn perspective_scale(&self, depth: f64) -> f64 {
        self.perspective / (self.perspective + depth)
    }

    /// Rotate about Y, then about X, then divide by depth.
    pub fn project(&self, s: &State) -> Projected {
        let (sin_y, cos_y) = self.angle_y.sin_cos();
        let rot_x = s.x * cos_y - s.z * sin_y;
        let rot_z = s.x * sin_y + s.z * cos_y;

        let (sin_x, cos_x) = self.angle_x.sin_cos();
        let rot_y = s.y * cos_x - rot_z * sin_x;
        let depth = s.y * sin_x + rot_z * cos_x;

        let k = self.base_scale * self.perspective_scale(depth);
        Projected::new(self.center_x + rot_x * k, self.center_y + rot_y * k, depth)
    }
}
