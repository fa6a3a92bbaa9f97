//! Time-domain generators
//!
//! A generator is a pure function of elapsed time. Callers own the clock
//! and may evaluate a generator at any time, in any order.

/// Upper bound on generator time (ms)
///
/// Sampling stops here even if the generator never comes to rest.
pub const MAX_TIME_MS: f64 = 10_000.0;

/// Generator output at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorState {
    pub position: f64,
    /// Units per millisecond
    pub velocity: f64,
    pub at_rest: bool,
}

/// A deterministic function from elapsed time (ms) to motion state
pub trait Generator {
    fn state_at(&self, t_ms: f64) -> GeneratorState;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn state_at(&self, t_ms: f64) -> GeneratorState {
        (**self).state_at(t_ms)
    }
}
