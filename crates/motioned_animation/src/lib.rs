//! motioned animation engine
//!
//! Spring physics, curve sampling, transition resolution, and
//! interruption-aware scheduling of declarative property animations.
//!
//! # Features
//!
//! - **Generators**: closed-form damped springs and constant-velocity tweens
//! - **Sampling**: springs flattened into piecewise-linear easing curves
//! - **Transitions**: layered element/state/property transitions resolved to a tween or spring
//! - **Variants**: named target states looked up by name
//! - **Interruptible**: retargeted springs inherit the outgoing velocity
//!
//! # Example
//!
//! ```rust
//! use motioned_animation::{
//!     AnimateOptions, ElementConfig, HeadlessSurface, MotionScheduler, SpringConfig,
//!     TransitionSpec,
//! };
//!
//! let mut scheduler = MotionScheduler::new(HeadlessSurface::new());
//! let card = scheduler.register_element(
//!     ElementConfig::new().with_transition(TransitionSpec::spring(SpringConfig::snappy())),
//! );
//!
//! scheduler.animate(card, AnimateOptions::new().set("x", 120.0)).unwrap();
//! assert_eq!(scheduler.tick().unwrap(), 1);
//! ```

pub mod easing;
pub mod generator;
pub mod headless;
pub mod keyframe;
pub mod linear;
pub mod options;
pub mod registration;
pub mod sampler;
pub mod scheduler;
pub mod spring;
pub mod style;
pub mod surface;
pub mod transition;
pub mod variants;

pub use easing::{Easing, TransitionEasing};
pub use generator::{Generator, GeneratorState, MAX_TIME_MS};
pub use headless::{HeadlessHandle, HeadlessSurface, PlayRecord};
pub use keyframe::{
    plan_spring, plan_transition, plan_tween, resolve_keyframes, FillMode, KeyframePlan,
    PlannedKeyframe, PlaybackTiming, Segment,
};
pub use linear::{LinearGenerator, LinearParams};
pub use options::{AnimateOptions, AnimateTarget, Target, TransitionSpec, TransitionTree, Variants};
pub use registration::{is_registered, register_custom_properties, PropertyRegistry};
pub use sampler::{sample_generator, Sample, DEFAULT_RESOLUTION, MAX_RESOLUTION};
pub use scheduler::{
    ElementConfig, MotionPhase, MotionScheduler, PropertyMotion, SchedulerConfig,
};
pub use spring::{SpringConfig, SpringGenerator, SpringParams};
pub use style::{initial_style, Initial};
pub use surface::{ElementId, PlaybackHandle, PlaybackOutcome, StyleSurface};
pub use transition::{resolve_transition, SpringTransition, Transition, TweenTransition};
pub use variants::match_against_variants;

pub use motioned_core::{MotionError, PropertyName, Result, StyleValue};
