//! Transition resolution
//!
//! Transitions are layered: the element's transition, its override for the
//! property, the active state's transition, and that state's override for
//! the property. Layers merge field by field and the result is classified
//! exactly once into a tween or a spring.

use crate::easing::{Easing, TransitionEasing};
use crate::options::{TransitionSpec, TransitionTree};
use crate::spring::{SpringConfig, SpringParams, DEFAULT_REST_DISTANCE, DEFAULT_REST_VELOCITY};
use motioned_core::PropertyName;
use smallvec::{smallvec, SmallVec};

/// Tween duration when none is given (ms)
pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// A fixed-duration keyframe animation
#[derive(Clone, Debug, PartialEq)]
pub struct TweenTransition {
    /// One easing, or one per keyframe segment; never empty
    pub easings: SmallVec<[Easing; 2]>,
    /// Milliseconds
    pub duration: f64,
    /// Milliseconds
    pub delay: f64,
    pub times: Option<Vec<f64>>,
}

impl TweenTransition {
    /// Easing of segment `index`; the last easing repeats past the end of the list
    pub fn easing_for_segment(&self, index: usize) -> &Easing {
        let last = self.easings.len().saturating_sub(1);
        &self.easings[index.min(last)]
    }
}

impl Default for TweenTransition {
    fn default() -> Self {
        Self {
            easings: smallvec![Easing::default()],
            duration: DEFAULT_DURATION_MS,
            delay: 0.0,
            times: None,
        }
    }
}

/// A physically simulated transition; its duration comes from sampling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringTransition {
    pub config: SpringConfig,
    pub rest_distance: f64,
    pub rest_velocity: f64,
    /// Milliseconds
    pub delay: f64,
}

impl SpringTransition {
    /// Generator parameters for one motion
    pub fn params(&self, from: f64, to: f64, velocity: f64) -> SpringParams {
        SpringParams::new(from, to)
            .with_config(self.config)
            .with_velocity(velocity)
            .with_rest(self.rest_distance, self.rest_velocity)
    }
}

impl Default for SpringTransition {
    fn default() -> Self {
        Self {
            config: SpringConfig::default(),
            rest_distance: DEFAULT_REST_DISTANCE,
            rest_velocity: DEFAULT_REST_VELOCITY,
            delay: 0.0,
        }
    }
}

/// A fully resolved transition
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Tween(TweenTransition),
    Spring(SpringTransition),
}

impl Transition {
    /// Fill in defaults and decide between tween and spring
    pub fn classify(spec: &TransitionSpec) -> Transition {
        let delay = spec.delay.unwrap_or(0.0);
        match &spec.easing {
            Some(TransitionEasing::Spring) => {
                let defaults = SpringConfig::default();
                Transition::Spring(SpringTransition {
                    config: SpringConfig::new(
                        spec.stiffness.unwrap_or(defaults.stiffness),
                        spec.friction.unwrap_or(defaults.friction),
                        spec.mass.unwrap_or(defaults.mass),
                    ),
                    rest_distance: spec.rest_distance.unwrap_or(DEFAULT_REST_DISTANCE),
                    rest_velocity: spec.rest_velocity.unwrap_or(DEFAULT_REST_VELOCITY),
                    delay,
                })
            }
            easing => {
                let easings: SmallVec<[Easing; 2]> = match easing {
                    Some(TransitionEasing::Single(easing)) => smallvec![easing.clone()],
                    Some(TransitionEasing::List(list)) if !list.is_empty() => {
                        list.iter().cloned().collect()
                    }
                    _ => smallvec![Easing::default()],
                };
                Transition::Tween(TweenTransition {
                    easings,
                    duration: spec.duration.unwrap_or(DEFAULT_DURATION_MS).max(0.0),
                    delay,
                    times: spec.times.clone(),
                })
            }
        }
    }

    pub fn delay(&self) -> f64 {
        match self {
            Transition::Tween(tween) => tween.delay,
            Transition::Spring(spring) => spring.delay,
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, Transition::Spring(_))
    }
}

impl Default for Transition {
    fn default() -> Self {
        Transition::Tween(TweenTransition::default())
    }
}

/// Merge every layer that applies to `property`, lowest priority first
pub fn merge_layers(layers: &[&TransitionTree], property: &PropertyName) -> TransitionSpec {
    layers
        .iter()
        .flat_map(|tree| tree.layers_for(property))
        .fold(TransitionSpec::default(), |merged, layer| merged.merge(layer))
}

/// Resolve the effective transition of `property`.
///
/// `layers` run from lowest to highest priority, typically the element's
/// transition followed by the active state's. Each tree contributes its base
/// spec and then its override for `property`.
pub fn resolve_transition(layers: &[&TransitionTree], property: &PropertyName) -> Transition {
    Transition::classify(&merge_layers(layers, property))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_layers_is_default_tween() {
        let transition = resolve_transition(&[], &"opacity".into());
        assert_eq!(transition, Transition::default());
        match transition {
            Transition::Tween(tween) => {
                assert_eq!(tween.duration, 500.0);
                assert_eq!(tween.delay, 0.0);
                assert_eq!(tween.easings.as_slice(), &[Easing::EaseInOut]);
            }
            Transition::Spring(_) => panic!("expected tween"),
        }
    }

    #[test]
    fn test_spring_defaults() {
        let tree = TransitionTree::new(TransitionSpec::default().with_easing(TransitionEasing::Spring));
        match resolve_transition(&[&tree], &"x".into()) {
            Transition::Spring(spring) => {
                assert_eq!(spring.config, SpringConfig::new(100.0, 10.0, 1.0));
                assert_eq!(spring.rest_distance, 0.005);
                assert_eq!(spring.rest_velocity, 0.005);
                assert_eq!(spring.delay, 0.0);
            }
            Transition::Tween(_) => panic!("expected spring"),
        }
    }

    #[test]
    fn test_layer_priority() {
        let global = TransitionTree::new(TransitionSpec::tween(1000.0).with_delay(50.0))
            .with_override("opacity", TransitionSpec::tween(900.0));
        let state = TransitionTree::new(TransitionSpec::tween(300.0))
            .with_override("opacity", TransitionSpec::default().with_easing(Easing::Linear));

        let opacity = resolve_transition(&[&global, &state], &"opacity".into());
        let width = resolve_transition(&[&global, &state], &"width".into());

        match (opacity, width) {
            (Transition::Tween(opacity), Transition::Tween(width)) => {
                // The state's base duration beats the element's per-property override
                assert_eq!(opacity.duration, 300.0);
                assert_eq!(opacity.delay, 50.0);
                assert_eq!(opacity.easings.as_slice(), &[Easing::Linear]);
                assert_eq!(width.duration, 300.0);
                assert_eq!(width.easings.as_slice(), &[Easing::EaseInOut]);
            }
            _ => panic!("expected tweens"),
        }
    }

    #[test]
    fn test_state_override_can_switch_to_spring() {
        let global = TransitionTree::new(TransitionSpec::tween(200.0).with_delay(10.0));
        let state = TransitionTree::default()
            .with_override("x", TransitionSpec::spring(SpringConfig::wobbly()));

        let x = resolve_transition(&[&global, &state], &"x".into());
        assert!(x.is_spring());
        assert_eq!(x.delay(), 10.0);
        assert!(!resolve_transition(&[&global, &state], &"y".into()).is_spring());
    }

    #[test]
    fn test_easing_for_segment_repeats_last() {
        let tween = TweenTransition {
            easings: smallvec![Easing::EaseIn, Easing::EaseOut],
            ..Default::default()
        };
        assert_eq!(tween.easing_for_segment(0), &Easing::EaseIn);
        assert_eq!(tween.easing_for_segment(1), &Easing::EaseOut);
        assert_eq!(tween.easing_for_segment(5), &Easing::EaseOut);
    }

    #[test]
    fn test_empty_easing_list_uses_default() {
        let spec = TransitionSpec::default().with_easings(Vec::new());
        match Transition::classify(&spec) {
            Transition::Tween(tween) => assert_eq!(tween.easings.as_slice(), &[Easing::EaseInOut]),
            Transition::Spring(_) => panic!("expected tween"),
        }
    }

    #[test]
    fn test_spring_params_carry_velocity() {
        let spring = SpringTransition::default();
        let params = spring.params(0.0, 10.0, 0.25);
        assert_eq!(params.velocity, 0.25);
        assert_eq!(params.stiffness, 100.0);
        assert_eq!(params.rest_distance, 0.005);
    }
}
