//! Easing functions for animations
//!
//! Easings are evaluated locally (for headless playback and sampling) and
//! rendered to CSS timing-function strings for the style surface.

use motioned_core::{MotionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sample points per second when flattening an easing function
pub const EASING_SAMPLE_RESOLUTION: f64 = 60.0;

/// Most stops a custom easing is flattened into
pub const MAX_EASING_POINTS: f64 = 600.0;

/// Arbitrary easing function mapping progress 0..1 to eased progress
pub type EasingFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Easing function type
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "EasingDef", into = "EasingDef")]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    CubicBezier(f64, f64, f64, f64),
    /// Evenly spaced stops of a piecewise-linear curve (CSS `linear(...)`)
    Piecewise(Vec<f64>),
    /// Caller-supplied function, flattened to `linear(...)` for the surface
    Custom(EasingFn),
}

impl Easing {
    /// Look up a CSS easing by name, or parse a `cubic-bezier(...)` /
    /// `linear(...)` function
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        match name {
            "linear" => return Ok(Easing::Linear),
            "ease" => return Ok(Easing::Ease),
            "ease-in" => return Ok(Easing::EaseIn),
            "ease-out" => return Ok(Easing::EaseOut),
            "ease-in-out" => return Ok(Easing::EaseInOut),
            _ => {}
        }

        if let Some(args) = function_args(name, "cubic-bezier") {
            return Easing::cubic_bezier(&parse_numbers(name, args)?);
        }
        if let Some(args) = function_args(name, "linear") {
            let stops = parse_numbers(name, args)?;
            if stops.is_empty() {
                return Err(MotionError::InvalidEasingDefinition(format!(
                    "\"{}\" has no stops",
                    name
                )));
            }
            return Ok(Easing::Piecewise(stops));
        }

        Err(MotionError::InvalidEasingDefinition(format!(
            "unknown easing \"{}\"",
            name
        )))
    }

    /// Build a cubic bezier easing from its control points
    ///
    /// Exactly four numbers are required: `[x1, y1, x2, y2]`.
    pub fn cubic_bezier(points: &[f64]) -> Result<Self> {
        match points {
            [x1, y1, x2, y2] => Ok(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
            _ => Err(MotionError::InvalidEasingDefinition(format!(
                "cubic-bezier requires exactly 4 numbers, got {}",
                points.len()
            ))),
        }
    }

    /// Wrap an arbitrary easing function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Easing::Custom(Arc::new(f))
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Ease => cubic_bezier_ease(t, 0.25, 0.1, 0.25, 1.0),
            Easing::EaseIn => cubic_bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => cubic_bezier_ease(t, 0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => cubic_bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Piecewise(stops) => piecewise_ease(stops, t),
            Easing::Custom(f) => f(t),
        }
    }

    /// Render as a CSS timing function
    ///
    /// `duration_ms` only matters for [`Easing::Custom`], which is sampled at
    /// [`EASING_SAMPLE_RESOLUTION`] points per second of animation.
    pub fn to_css(&self, duration_ms: f64) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::Ease => "ease".to_string(),
            Easing::EaseIn => "ease-in".to_string(),
            Easing::EaseOut => "ease-out".to_string(),
            Easing::EaseInOut => "ease-in-out".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                format!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            Easing::Piecewise(stops) => linear_function(stops),
            Easing::Custom(f) => linear_function(&sample_easing_fn(f.as_ref(), duration_ms)),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::Ease => f.write_str("Ease"),
            Easing::EaseIn => f.write_str("EaseIn"),
            Easing::EaseOut => f.write_str("EaseOut"),
            Easing::EaseInOut => f.write_str("EaseInOut"),
            Easing::CubicBezier(x1, y1, x2, y2) => f
                .debug_tuple("CubicBezier")
                .field(x1)
                .field(y1)
                .field(x2)
                .field(y2)
                .finish(),
            Easing::Piecewise(stops) => f.debug_tuple("Piecewise").field(&stops.len()).finish(),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Easing::Linear, Easing::Linear)
            | (Easing::Ease, Easing::Ease)
            | (Easing::EaseIn, Easing::EaseIn)
            | (Easing::EaseOut, Easing::EaseOut)
            | (Easing::EaseInOut, Easing::EaseInOut) => true,
            (Easing::CubicBezier(a1, b1, c1, d1), Easing::CubicBezier(a2, b2, c2, d2)) => {
                a1 == a2 && b1 == b2 && c1 == c2 && d1 == d2
            }
            (Easing::Piecewise(a), Easing::Piecewise(b)) => a == b,
            (Easing::Custom(a), Easing::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Easing as it appears in a transition: the spring tag, one easing, or one
/// easing per keyframe segment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EasingSpec", into = "EasingSpec")]
pub enum TransitionEasing {
    Spring,
    Single(Easing),
    List(Vec<Easing>),
}

impl From<Easing> for TransitionEasing {
    fn from(easing: Easing) -> Self {
        TransitionEasing::Single(easing)
    }
}

/// Serialized form of a single easing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum EasingDef {
    Name(String),
    Points(Vec<f64>),
}

impl TryFrom<EasingDef> for Easing {
    type Error = MotionError;

    fn try_from(def: EasingDef) -> Result<Self> {
        match def {
            EasingDef::Name(name) => Easing::from_name(&name),
            EasingDef::Points(points) => Easing::cubic_bezier(&points),
        }
    }
}

impl From<Easing> for EasingDef {
    fn from(easing: Easing) -> Self {
        match easing {
            Easing::CubicBezier(x1, y1, x2, y2) => EasingDef::Points(vec![x1, y1, x2, y2]),
            other => EasingDef::Name(other.to_css(1000.0)),
        }
    }
}

/// Serialized form of a transition easing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum EasingSpec {
    Name(String),
    Points(Vec<f64>),
    List(Vec<EasingDef>),
}

impl TryFrom<EasingSpec> for TransitionEasing {
    type Error = MotionError;

    fn try_from(spec: EasingSpec) -> Result<Self> {
        match spec {
            EasingSpec::Name(name) if name.trim() == "spring" => Ok(TransitionEasing::Spring),
            EasingSpec::Name(name) => Easing::from_name(&name).map(TransitionEasing::Single),
            EasingSpec::Points(points) => Easing::cubic_bezier(&points).map(TransitionEasing::Single),
            EasingSpec::List(defs) => defs
                .into_iter()
                .map(Easing::try_from)
                .collect::<Result<Vec<_>>>()
                .map(TransitionEasing::List),
        }
    }
}

impl From<TransitionEasing> for EasingSpec {
    fn from(easing: TransitionEasing) -> Self {
        match easing {
            TransitionEasing::Spring => EasingSpec::Name("spring".to_string()),
            TransitionEasing::Single(easing) => match EasingDef::from(easing) {
                EasingDef::Name(name) => EasingSpec::Name(name),
                EasingDef::Points(points) => EasingSpec::Points(points),
            },
            TransitionEasing::List(list) => {
                EasingSpec::List(list.into_iter().map(EasingDef::from).collect())
            }
        }
    }
}

/// Flatten an easing function into evenly spaced stops
///
/// Takes [`EASING_SAMPLE_RESOLUTION`] samples per second of `duration_ms`,
/// at most [`MAX_EASING_POINTS`], always ending with `f(1)`. Durations too
/// short for one sample yield the two endpoints.
pub fn sample_easing_fn(f: &dyn Fn(f64) -> f64, duration_ms: f64) -> Vec<f64> {
    let total_points = EASING_SAMPLE_RESOLUTION * (duration_ms / 1000.0);
    if !total_points.is_finite() || total_points < 1.0 {
        return vec![f(0.0), f(1.0)];
    }
    let total_points = total_points.min(MAX_EASING_POINTS);

    let mut points = Vec::with_capacity(total_points.ceil() as usize + 1);
    let mut i = 0.0;
    loop {
        let progress = i / total_points;
        if progress >= 1.0 {
            break;
        }
        points.push(f(progress));
        i += 1.0;
    }
    points.push(f(1.0));
    points
}

/// Render stops as a CSS `linear(...)` function
pub fn linear_function(stops: &[f64]) -> String {
    let joined: Vec<String> = stops.iter().map(|s| s.to_string()).collect();
    format!("linear({})", joined.join(","))
}

/// Arguments of a CSS function call such as `cubic-bezier(...)`
fn function_args<'a>(text: &'a str, function: &str) -> Option<&'a str> {
    text.strip_prefix(function)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_numbers(source: &str, args: &str) -> Result<Vec<f64>> {
    args.split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(|arg| {
            arg.parse::<f64>().map_err(|_| {
                MotionError::InvalidEasingDefinition(format!(
                    "\"{}\" is not a number in \"{}\"",
                    arg, source
                ))
            })
        })
        .collect()
}

/// Evaluate evenly spaced stops at progress `t`
fn piecewise_ease(stops: &[f64], t: f64) -> f64 {
    match stops.len() {
        0 => t,
        1 => stops[0],
        len => {
            let t = t.clamp(0.0, 1.0);
            let scaled = t * (len - 1) as f64;
            let index = (scaled.floor() as usize).min(len - 2);
            let local = scaled - index as f64;
            stops[index] + (stops[index + 1] - stops[index]) * local
        }
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t;

    // Solve for parameter `p` where bezier_x(p) == x using Newton-Raphson,
    // falling back to binary search if the slope is too flat.
    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    // Binary search fallback (always converges)
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
