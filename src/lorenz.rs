use serde::{Deserialize, Serialize};

use crate::math::State;

/// Parameters of the Lorenz system.
///
/// The classical chaotic regime is sigma = 10, rho = 28, beta = 8/3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

/// dx/dt = sigma(y - x), dy/dt = x(rho - z) - y, dz/dt = xy - beta z
pub fn derivatives(state: &State, params: &LorenzParams) -> State {
    State {
        x: params.sigma * (state.y - state.x),
        y: state.x * (params.rho - state.z) - state.y,
        z: state.x * state.y - params.beta * state.z,
    }
}

/// Equilibria of the system. For rho <= 1 only the origin exists; above that
/// the two convection centers C+ and C- appear.
pub fn fixed_points(params: &LorenzParams) -> Vec<State> {
    if params.rho <= 1.0 {
        return vec![State::ORIGIN];
    }
    let c = (params.beta * (params.rho - 1.0)).sqrt();
    vec![
        State::ORIGIN,
        State::new(c, c, params.rho - 1.0),
        State::new(-c, -c, params.rho - 1.0),
    ]
}
