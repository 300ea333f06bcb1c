use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::golden_hue;
use crate::math::{Projected, State};

/// Upper bound on the trail storage reserved before any point is recorded.
const TRAIL_PREALLOC: usize = 256;

/// How much projected history each particle keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrailMode {
    /// Keep the last `max_len` projected points.
    Bounded { max_len: usize },
    /// Keep only the latest projected point.
    None,
}

impl Default for TrailMode {
    fn default() -> Self {
        TrailMode::Bounded { max_len: 150 }
    }
}

#[derive(Debug, Clone)]
pub enum Trace {
    /// Oldest point at the front.
    Trail { points: VecDeque<Projected>, max_len: usize },
    Current(Option<Projected>),
}

impl Trace {
    pub fn for_mode(mode: TrailMode) -> Self {
        match mode {
            TrailMode::Bounded { max_len } => Trace::Trail {
                points: VecDeque::with_capacity(max_len.min(TRAIL_PREALLOC)),
                max_len,
            },
            TrailMode::None => Trace::Current(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: State,
    pub hue: f64,
    trace: Trace,
}

impl Particle {
    pub fn new(position: State, hue: f64, mode: TrailMode) -> Self {
        Particle { position, hue, trace: Trace::for_mode(mode) }
    }

    /// Random start inside the attractor's basin, hue from the golden angle.
    /// x and y fall in 5 ± 15, z in 10 ± 15.
    pub fn spawn<R: Rng>(index: usize, rng: &mut R, mode: TrailMode) -> Self {
        let mut jitter = |center: f64| (rng.gen_range(0.0..1.0) - 0.5) * 30.0 + center;
        let position = State::new(jitter(5.0), jitter(5.0), jitter(10.0));
        Particle::new(position, golden_hue(index), mode)
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Append to the trail, evicting the oldest point past the cap, or
    /// replace the current point.
    pub fn record(&mut self, point: Projected) {
        match &mut self.trace {
            Trace::Trail { points, max_len } => {
                points.push_back(point);
                while points.len() > *max_len {
                    points.pop_front();
                }
            }
            Trace::Current(current) => *current = Some(point),
        }
    }

    /// Trail points oldest first; empty for history-free particles.
    pub fn trail(&self) -> impl Iterator<Item = &Projected> {
        let points = match &self.trace {
            Trace::Trail { points, .. } => Some(points.iter()),
            Trace::Current(_) => None,
        };
        points.into_iter().flatten()
    }

    pub fn trail_len(&self) -> usize {
        match &self.trace {
            Trace::Trail { points, .. } => points.len(),
            Trace::Current(_) => 0,
        }
    }

    /// Most recent projection, whichever variant holds it.
    pub fn latest(&self) -> Option<&Projected> {
        match &self.trace {
            Trace::Trail { points, .. } => points.back(),
            Trace::Current(current) => current.as_ref(),
        }
    }
}
