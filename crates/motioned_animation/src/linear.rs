//! Constant-velocity generator

use crate::generator::{Generator, GeneratorState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearParams {
    pub from: f64,
    pub to: f64,
    /// Milliseconds
    pub duration: f64,
}

/// Moves from `from` to `to` at constant speed over `duration`.
///
/// Given a duration of 1000ms, from 100 and to 200, the position is 100 at
/// 0ms, 150 at 500ms and 200 at 1000ms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGenerator {
    params: LinearParams,
    velocity: f64,
}

impl LinearGenerator {
    pub fn new(params: LinearParams) -> Self {
        let velocity = if params.duration > 0.0 {
            (params.to - params.from) / params.duration
        } else {
            0.0
        };
        Self { params, velocity }
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }
}

impl Generator for LinearGenerator {
    fn state_at(&self, t_ms: f64) -> GeneratorState {
        let LinearParams { from, to, duration } = self.params;
        let at_rest = t_ms >= duration;
        // Exact endpoint once finished; the product below can miss `to` by an ulp
        let position = if at_rest {
            to
        } else {
            from + self.velocity * t_ms
        };

        GeneratorState {
            position,
            velocity: self.velocity,
            at_rest,
        }
    }
}
