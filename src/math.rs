use serde::{Deserialize, Serialize};

/// A point in Lorenz phase space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl State {
    pub const ORIGIN: State = State { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        State { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &State) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// `self + k * scale`, used for the intermediate RK stages.
    pub fn offset(&self, k: State, scale: f64) -> State {
        State::new(self.x + k.x * scale, self.y + k.y * scale, self.z + k.z * scale)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A state projected onto the screen. `z` is the rotated depth, kept for
/// depth-based effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Projected {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Projected { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Inclusive bounds check against a `width` x `height` surface grown by `margin` on every side.
    pub fn within(&self, width: f64, height: f64, margin: f64) -> bool {
        self.x >= -margin && self.x <= width + margin && self.y >= -margin && self.y <= height + margin
    }
}
