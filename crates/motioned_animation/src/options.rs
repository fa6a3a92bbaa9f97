//! Animation request types
//!
//! These mirror what a caller writes declaratively: target values per
//! property plus a transition tree. All of them deserialize from JSON or
//! TOML so variant tables can live in config files.

use crate::easing::{Easing, TransitionEasing};
use crate::spring::SpringConfig;
use indexmap::IndexMap;
use motioned_core::{PropertyName, StyleValue};
use serde::{Deserialize, Serialize};

/// Target of one property: a single value or a keyframe list
///
/// A leading `None` in a keyframe list stands for the property's live value
/// at the moment the animation starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Value(StyleValue),
    Keyframes(Vec<Option<StyleValue>>),
}

impl From<StyleValue> for Target {
    fn from(value: StyleValue) -> Self {
        Target::Value(value)
    }
}

impl From<f64> for Target {
    fn from(value: f64) -> Self {
        Target::Value(value.into())
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::Value(value.into())
    }
}

impl From<Vec<Option<StyleValue>>> for Target {
    fn from(keyframes: Vec<Option<StyleValue>>) -> Self {
        Target::Keyframes(keyframes)
    }
}

/// One layer of transition settings; unset fields inherit from lower layers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<TransitionEasing>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Keyframe offsets, 0..1, one per keyframe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stiffness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_velocity: Option<f64>,
}

impl TransitionSpec {
    /// A tween with the given duration
    pub fn tween(duration_ms: f64) -> Self {
        Self {
            duration: Some(duration_ms),
            ..Default::default()
        }
    }

    /// A spring with the given constants
    pub fn spring(config: SpringConfig) -> Self {
        Self {
            easing: Some(TransitionEasing::Spring),
            stiffness: Some(config.stiffness),
            friction: Some(config.friction),
            mass: Some(config.mass),
            ..Default::default()
        }
    }

    pub fn with_easing(mut self, easing: impl Into<TransitionEasing>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// One easing per keyframe segment
    pub fn with_easings(mut self, easings: Vec<Easing>) -> Self {
        self.easing = Some(TransitionEasing::List(easings));
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    pub fn with_times(mut self, times: Vec<f64>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn with_rest(mut self, rest_distance: f64, rest_velocity: f64) -> Self {
        self.rest_distance = Some(rest_distance);
        self.rest_velocity = Some(rest_velocity);
        self
    }

    /// Field-wise override: every field set on `over` replaces ours
    pub fn merge(&self, over: &TransitionSpec) -> TransitionSpec {
        TransitionSpec {
            easing: over.easing.clone().or_else(|| self.easing.clone()),
            duration: over.duration.or(self.duration),
            delay: over.delay.or(self.delay),
            times: over.times.clone().or_else(|| self.times.clone()),
            stiffness: over.stiffness.or(self.stiffness),
            friction: over.friction.or(self.friction),
            mass: over.mass.or(self.mass),
            rest_distance: over.rest_distance.or(self.rest_distance),
            rest_velocity: over.rest_velocity.or(self.rest_velocity),
        }
    }
}

/// A transition with optional per-property overrides
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionTree {
    #[serde(flatten)]
    pub base: TransitionSpec,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub overrides: IndexMap<PropertyName, TransitionSpec>,
}

impl TransitionTree {
    pub fn new(base: TransitionSpec) -> Self {
        Self {
            base,
            overrides: IndexMap::new(),
        }
    }

    pub fn with_override(mut self, property: impl Into<PropertyName>, spec: TransitionSpec) -> Self {
        self.overrides.insert(property.into(), spec);
        self
    }

    /// The base spec followed by the override for `property`, if any
    pub fn layers_for<'a>(
        &'a self,
        property: &'a PropertyName,
    ) -> impl Iterator<Item = &'a TransitionSpec> + 'a {
        std::iter::once(&self.base).chain(self.overrides.get(property))
    }
}

impl From<TransitionSpec> for TransitionTree {
    fn from(base: TransitionSpec) -> Self {
        Self::new(base)
    }
}

/// Concrete targets for a set of properties
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionTree>,
    #[serde(flatten)]
    pub properties: IndexMap<PropertyName, Target>,
}

impl AnimateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target of one property
    pub fn set(mut self, property: impl Into<PropertyName>, target: impl Into<Target>) -> Self {
        self.properties.insert(property.into(), target.into());
        self
    }

    pub fn with_transition(mut self, transition: impl Into<TransitionTree>) -> Self {
        self.transition = Some(transition.into());
        self
    }

    /// The same targets without the transition
    pub fn without_transition(&self) -> AnimateOptions {
        AnimateOptions {
            transition: None,
            properties: self.properties.clone(),
        }
    }
}

/// Named states, each a self-contained set of targets
pub type Variants = IndexMap<String, AnimateOptions>;

/// What a caller asks an element to animate to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimateTarget {
    Variant(String),
    Options(AnimateOptions),
}

impl From<&str> for AnimateTarget {
    fn from(name: &str) -> Self {
        AnimateTarget::Variant(name.to_string())
    }
}

impl From<String> for AnimateTarget {
    fn from(name: String) -> Self {
        AnimateTarget::Variant(name)
    }
}

impl From<AnimateOptions> for AnimateTarget {
    fn from(options: AnimateOptions) -> Self {
        AnimateTarget::Options(options)
    }
}
