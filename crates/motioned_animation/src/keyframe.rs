//! Keyframe planning
//!
//! Turns a property target plus a resolved [`Transition`] into the keyframe
//! list and timing handed to the style surface.

use crate::easing::Easing;
use crate::options::Target;
use crate::sampler::sample_generator;
use crate::spring::SpringGenerator;
use crate::transition::{SpringTransition, Transition, TweenTransition};
use motioned_core::{MotionError, PropertyName, Result, StyleValue};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::warn;

/// Keyframe values for one property
pub type KeyframeValues = SmallVec<[StyleValue; 4]>;

/// One keyframe as played by the style surface
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedKeyframe {
    /// CSS value
    pub value: String,
    /// Position within the animation, 0..1
    pub offset: Option<f64>,
    /// Easing from this keyframe to the next
    pub easing: Option<Easing>,
}

/// What the surface shows after playback ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    None,
    /// Hold the final keyframe
    #[default]
    Forwards,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackTiming {
    /// Milliseconds
    pub duration: f64,
    /// Milliseconds
    pub delay: f64,
    pub fill: FillMode,
}

/// Time span between two adjacent keyframes
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Milliseconds from the start of playback, excluding delay
    pub start: f64,
    /// Milliseconds
    pub duration: f64,
    pub easing: Easing,
}

/// Everything needed to play one property motion
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframePlan {
    pub keyframes: SmallVec<[PlannedKeyframe; 4]>,
    pub timing: PlaybackTiming,
    pub segments: Vec<Segment>,
}

impl KeyframePlan {
    /// CSS timing function of keyframe `index`, sized to its segment
    pub fn easing_css(&self, index: usize) -> Option<String> {
        let easing = self.keyframes.get(index)?.easing.as_ref()?;
        let duration = self
            .segments
            .get(index)
            .map_or(self.timing.duration, |segment| segment.duration);
        Some(easing.to_css(duration))
    }
}

/// Normalize a target into at least two keyframe values.
///
/// `current` reads the live value of the property and is called at most
/// once. A scalar becomes `[current, value]`, a leading `None` is replaced
/// by the live value, and a single-element list gains the live value in
/// front. `None` anywhere else is dropped. An empty list yields no values.
pub fn resolve_keyframes(target: &Target, current: impl FnOnce() -> StyleValue) -> KeyframeValues {
    match target {
        Target::Value(value) => smallvec![current(), value.clone()],
        Target::Keyframes(list) => {
            let leading_null = matches!(list.first(), Some(None));
            let mut values: KeyframeValues = SmallVec::with_capacity(list.len() + 1);
            for (index, keyframe) in list.iter().enumerate() {
                match keyframe {
                    Some(value) => values.push(value.clone()),
                    None if index == 0 => {}
                    None => warn!(index, "Dropping null keyframe; only the first keyframe may be null"),
                }
            }

            if leading_null || values.len() == 1 {
                values.insert(0, current());
            }
            if values.len() == 1 {
                let only = values[0].clone();
                values.push(only);
            }
            values
        }
    }
}

/// Keyframe offsets for `count` keyframes
///
/// Explicit `times` are used only when there is one per keyframe and they
/// ascend within 0..=1.
fn keyframe_offsets(count: usize, times: Option<&[f64]>) -> Vec<f64> {
    match times {
        Some(times) if times.len() != count => warn!(
            times = times.len(),
            keyframes = count,
            "Ignoring times that do not match the keyframe count"
        ),
        Some(times) if !valid_offsets(times) => warn!(
            ?times,
            "Ignoring times that are not ascending within 0..=1"
        ),
        Some(times) => return times.to_vec(),
        None => {}
    }

    let segments = count.saturating_sub(1).max(1) as f64;
    (0..count).map(|i| i as f64 / segments).collect()
}

fn valid_offsets(times: &[f64]) -> bool {
    times.iter().all(|t| (0.0..=1.0).contains(t)) && times.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Plan a fixed-duration tween through every keyframe
pub fn plan_tween(property: &PropertyName, values: &[StyleValue], tween: &TweenTransition) -> KeyframePlan {
    let offsets = keyframe_offsets(values.len(), tween.times.as_deref());
    let last = values.len().saturating_sub(1);

    let keyframes = values
        .iter()
        .zip(&offsets)
        .enumerate()
        .map(|(i, (value, offset))| PlannedKeyframe {
            value: value.to_css(property),
            offset: Some(*offset),
            easing: (i < last).then(|| tween.easing_for_segment(i).clone()),
        })
        .collect();

    let segments = offsets
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Segment {
            start: tween.duration * pair[0],
            duration: tween.duration * (pair[1] - pair[0]),
            easing: tween.easing_for_segment(i).clone(),
        })
        .collect();

    KeyframePlan {
        keyframes,
        timing: PlaybackTiming {
            duration: tween.duration,
            delay: tween.delay,
            fill: FillMode::Forwards,
        },
        segments,
    }
}

/// Plan a spring between the first and last keyframe.
///
/// The spring starts with `velocity` (units per ms) and is sampled at
/// `resolution` points per second into a piecewise-linear easing. Fails with
/// `ValueParse` when either endpoint has no leading number.
pub fn plan_spring(
    property: &PropertyName,
    values: &[StyleValue],
    spring: &SpringTransition,
    velocity: f64,
    resolution: u32,
) -> Result<(KeyframePlan, SpringGenerator)> {
    let (first, last) = match values {
        [first, .., last] => (first, last),
        [only] => (only, only),
        [] => {
            return Err(MotionError::ValueParse(format!(
                "no keyframes for {}",
                property
            )))
        }
    };
    let from = first.leading_number()?;
    let to = last.leading_number()?;

    let generator = SpringGenerator::new(spring.params(from, to, velocity));
    let sample = sample_generator(&generator, from, to, resolution);
    let easing = sample.easing();

    let plan = KeyframePlan {
        keyframes: smallvec![
            PlannedKeyframe {
                value: first.to_css(property),
                offset: Some(0.0),
                easing: Some(easing.clone()),
            },
            PlannedKeyframe {
                value: last.to_css(property),
                offset: Some(1.0),
                easing: None,
            },
        ],
        timing: PlaybackTiming {
            duration: sample.duration,
            delay: spring.delay,
            fill: FillMode::Forwards,
        },
        segments: vec![Segment {
            start: 0.0,
            duration: sample.duration,
            easing,
        }],
    };

    Ok((plan, generator))
}

/// Plan any transition; springs also return their generator
pub fn plan_transition(
    property: &PropertyName,
    values: &[StyleValue],
    transition: &Transition,
    velocity: f64,
    resolution: u32,
) -> Result<(KeyframePlan, Option<SpringGenerator>)> {
    match transition {
        Transition::Tween(tween) => Ok((plan_tween(property, values, tween), None)),
        Transition::Spring(spring) => plan_spring(property, values, spring, velocity, resolution)
            .map(|(plan, generator)| (plan, Some(generator))),
    }
}
