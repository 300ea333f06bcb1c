use crate::error::{FieldError, Result};
use crate::lorenz::{LorenzParams, derivatives};
use crate::math::State;

/// Classical fourth-order Runge-Kutta stepper for the Lorenz system.
///
/// k1 = f(x)
/// k2 = f(x + dt/2 * k1)
/// k3 = f(x + dt/2 * k2)
/// k4 = f(x + dt * k3)
/// x' = x + dt/6 * (k1 + 2k2 + 2k3 + k4)
///
/// Euler at the same step size visibly distorts the attractor, so this is the
/// lowest order used for rendering.
#[derive(Debug, Clone, Copy)]
pub struct Rk4 {
    params: LorenzParams,
    dt: f64,
}

impl Rk4 {
    pub fn new(params: LorenzParams, dt: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(FieldError::InvalidConfig(format!("time step must be positive, got {}", dt)));
        }
        Ok(Self { params, dt })
    }

    pub fn params(&self) -> &LorenzParams {
        &self.params
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn step(&self, state: &State) -> State {
        let dt = self.dt;
        let p = &self.params;

        let k1 = derivatives(state, p);
        let k2 = derivatives(&state.offset(k1, dt / 2.0), p);
        let k3 = derivatives(&state.offset(k2, dt / 2.0), p);
        let k4 = derivatives(&state.offset(k3, dt), p);

        State {
            x: state.x + (k1.x + 2.0 * k2.x + 2.0 * k3.x + k4.x) * dt / 6.0,
            y: state.y + (k1.y + 2.0 * k2.y + 2.0 * k3.y + k4.y) * dt / 6.0,
            z: state.z + (k1.z + 2.0 * k2.z + 2.0 * k3.z + k4.z) * dt / 6.0,
        }
    }

    /// Trajectory of `n_steps` steps, including the initial state.
    pub fn integrate(&self, initial: State, n_steps: usize) -> Vec<State> {
        let mut trajectory = Vec::with_capacity(n_steps + 1);
        let mut state = initial;
        trajectory.push(state);
        for _ in 0..n_steps {
            state = self.step(&state);
            trajectory.push(state);
        }
        trajectory
    }
}
