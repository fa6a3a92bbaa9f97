//! Discretizing generators into easing curves
//!
//! The style surface only understands keyframes with a timing function, so a
//! spring is flattened into evenly spaced progress stops that play as a
//! piecewise-linear easing over the sampled duration.

use crate::easing::Easing;
use crate::generator::{Generator, MAX_TIME_MS};
use tracing::warn;

/// Default samples per second
pub const DEFAULT_RESOLUTION: u32 = 60;

/// Upper bound on samples per second
pub const MAX_RESOLUTION: u32 = 1000;

/// A generator flattened to evenly spaced stops
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Raw generator positions; the last entry is always `to`
    pub positions: Vec<f64>,
    /// Positions normalized to 0..1 between `from` and `to`; the last entry
    /// is always 1
    pub easing_positions: Vec<f64>,
    /// Milliseconds until the generator came to rest (or was truncated)
    pub duration: f64,
}

impl Sample {
    /// The normalized stops as a piecewise-linear easing
    pub fn easing(&self) -> Easing {
        Easing::Piecewise(self.easing_positions.clone())
    }
}

/// Sample `generator` every `1000 / resolution` ms until it rests.
///
/// Stops at [`MAX_TIME_MS`] for generators that never rest, and always
/// finishes on `to` so the curve converges exactly. A resolution of 0 is
/// treated as 1, and one above [`MAX_RESOLUTION`] is capped.
pub fn sample_generator<G: Generator + ?Sized>(
    generator: &G,
    from: f64,
    to: f64,
    resolution: u32,
) -> Sample {
    if resolution > MAX_RESOLUTION {
        warn!(resolution, max = MAX_RESOLUTION, "Capping sample resolution");
    }
    let step = 1000.0 / resolution.clamp(1, MAX_RESOLUTION) as f64;

    let mut positions = Vec::new();
    let mut time = 0.0;
    while time < MAX_TIME_MS {
        let state = generator.state_at(time);
        positions.push(state.position);
        if state.at_rest {
            break;
        }
        time += step;
    }
    positions.push(to);

    let range = to - from;
    let mut easing_positions: Vec<f64> = positions
        .iter()
        .map(|p| if range == 0.0 { 1.0 } else { (p - from) / range })
        .collect();
    if let Some(last) = easing_positions.last_mut() {
        *last = 1.0;
    }

    Sample {
        positions,
        easing_positions,
        duration: time,
    }
}
