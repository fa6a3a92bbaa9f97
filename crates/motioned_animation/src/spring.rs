//! Damped harmonic oscillator generator
//!
//! Closed-form solutions of `m·x'' + c·x' + k·(x - to) = 0`, with time in
//! milliseconds. The damping regime is chosen once at construction so that
//! sampling never branches per step.

use crate::generator::{Generator, GeneratorState};
use serde::{Deserialize, Serialize};

/// Velocity look-back window (ms)
const VELOCITY_WINDOW_MS: f64 = 5.0;

/// Floor applied to stiffness and mass so neither is ever divided by zero
const MIN_POSITIVE_PARAM: f64 = 1e-6;

pub const DEFAULT_REST_DISTANCE: f64 = 0.005;
pub const DEFAULT_REST_VELOCITY: f64 = 0.005;

/// Physical spring constants
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub friction: f64,
    pub mass: f64,
}

impl SpringConfig {
    pub fn new(stiffness: f64, friction: f64, mass: f64) -> Self {
        Self {
            stiffness,
            friction,
            mass,
        }
    }

    /// Slow and smooth, no overshoot
    pub fn gentle() -> Self {
        Self::new(120.0, 26.0, 1.0)
    }

    /// Quick with a slight bounce
    pub fn snappy() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Fast and tight, critically damped
    pub fn stiff() -> Self {
        Self::new(400.0, 40.0, 1.0)
    }

    /// Visible oscillation
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Heavy and overdamped
    pub fn molasses() -> Self {
        Self::new(280.0, 120.0, 1.0)
    }

    /// Damping ratio ζ; below 1 the spring oscillates
    pub fn damping_ratio(&self) -> f64 {
        self.friction / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }
}

/// Everything needed to build a [`SpringGenerator`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub from: f64,
    pub to: f64,
    /// Initial velocity in units per millisecond
    pub velocity: f64,
    pub stiffness: f64,
    pub friction: f64,
    pub mass: f64,
    pub rest_distance: f64,
    pub rest_velocity: f64,
}

impl SpringParams {
    /// A spring from `from` to `to` with the default config and no initial velocity
    pub fn new(from: f64, to: f64) -> Self {
        let config = SpringConfig::default();
        Self {
            from,
            to,
            velocity: 0.0,
            stiffness: config.stiffness,
            friction: config.friction,
            mass: config.mass,
            rest_distance: DEFAULT_REST_DISTANCE,
            rest_velocity: DEFAULT_REST_VELOCITY,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_config(mut self, config: SpringConfig) -> Self {
        self.stiffness = config.stiffness;
        self.friction = config.friction;
        self.mass = config.mass;
        self
    }

    pub fn with_rest(mut self, rest_distance: f64, rest_velocity: f64) -> Self {
        self.rest_distance = rest_distance;
        self.rest_velocity = rest_velocity;
        self
    }

    /// Raise out-of-range constants to their floors
    fn sanitized(mut self) -> Self {
        if self.stiffness.is_nan() || self.stiffness <= 0.0 {
            tracing::warn!(stiffness = self.stiffness, "Spring stiffness must be positive");
            self.stiffness = MIN_POSITIVE_PARAM;
        }
        if self.mass.is_nan() || self.mass <= 0.0 {
            tracing::warn!(mass = self.mass, "Spring mass must be positive");
            self.mass = MIN_POSITIVE_PARAM;
        }
        if self.friction.is_nan() || self.friction < 0.0 {
            tracing::warn!(friction = self.friction, "Spring friction must not be negative");
            self.friction = 0.0;
        }
        self.rest_distance = self.rest_distance.max(0.0);
        self.rest_velocity = self.rest_velocity.max(0.0);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Regime {
    /// ζ < 1: decaying sinusoid
    Underdamped {
        decay: f64,
        angular_freq: f64,
        sin_coeff: f64,
    },
    /// ζ == 1
    Critical { omega0: f64, linear_coeff: f64 },
    /// ζ > 1, written as two decaying exponentials instead of
    /// `e^(-ζω0t)·(A·sinh(ω2t) + B·cosh(ω2t))` so large `t` cannot overflow
    Overdamped {
        slow_rate: f64,
        slow_coeff: f64,
        fast_rate: f64,
        fast_coeff: f64,
    },
}

/// Closed-form damped spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringGenerator {
    params: SpringParams,
    regime: Regime,
}

impl SpringGenerator {
    pub fn new(params: SpringParams) -> Self {
        let params = params.sanitized();
        let SpringParams {
            from,
            to,
            velocity,
            stiffness,
            friction,
            mass,
            ..
        } = params;

        let delta = to - from;
        let omega0 = (stiffness / mass).sqrt() / 1000.0;
        let zeta = friction / (2.0 * (stiffness * mass).sqrt());

        let regime = if zeta < 1.0 {
            let decay = zeta * omega0;
            let angular_freq = omega0 * (1.0 - zeta * zeta).sqrt();
            Regime::Underdamped {
                decay,
                angular_freq,
                sin_coeff: (-velocity + decay * delta) / angular_freq,
            }
        } else if zeta == 1.0 {
            Regime::Critical {
                omega0,
                linear_coeff: -velocity + omega0 * delta,
            }
        } else {
            let decay = zeta * omega0;
            let omega2 = omega0 * (zeta * zeta - 1.0).sqrt();
            let sinh_coeff = -velocity + decay * delta;
            let cosh_coeff = omega2 * delta;
            Regime::Overdamped {
                slow_rate: decay - omega2,
                slow_coeff: (cosh_coeff + sinh_coeff) / (2.0 * omega2),
                fast_rate: decay + omega2,
                fast_coeff: (cosh_coeff - sinh_coeff) / (2.0 * omega2),
            }
        };

        Self { params, regime }
    }

    /// Parameters after sanitizing
    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    pub fn damping_ratio(&self) -> f64 {
        SpringConfig::new(self.params.stiffness, self.params.friction, self.params.mass)
            .damping_ratio()
    }

    /// Position at `t` ms
    pub fn position(&self, t: f64) -> f64 {
        let to = self.params.to;
        let delta = to - self.params.from;
        match self.regime {
            Regime::Underdamped {
                decay,
                angular_freq,
                sin_coeff,
            } => {
                to - (-decay * t).exp()
                    * (sin_coeff * (angular_freq * t).sin() + delta * (angular_freq * t).cos())
            }
            Regime::Critical {
                omega0,
                linear_coeff,
            } => to - (-omega0 * t).exp() * (delta + linear_coeff * t),
            Regime::Overdamped {
                slow_rate,
                slow_coeff,
                fast_rate,
                fast_coeff,
            } => to - (slow_coeff * (-slow_rate * t).exp() + fast_coeff * (-fast_rate * t).exp()),
        }
    }
}

impl Generator for SpringGenerator {
    fn state_at(&self, t_ms: f64) -> GeneratorState {
        let position = self.position(t_ms);

        // Backward difference over the last 5ms rather than the analytic
        // derivative; interruption seeding depends on these exact values.
        let prev_t = (t_ms - VELOCITY_WINDOW_MS).max(0.0);
        let h = t_ms - prev_t;
        let velocity = if h > 0.0 {
            (position - self.position(prev_t)) / h
        } else {
            0.0
        };

        let at_rest = (self.params.to - position).abs() < self.params.rest_distance
            && velocity.abs() < self.params.rest_velocity;

        GeneratorState {
            position,
            velocity,
            at_rest,
        }
    }
}
