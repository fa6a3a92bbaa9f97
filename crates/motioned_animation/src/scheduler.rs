//! Interruption-aware motion scheduler
//!
//! Owns every in-flight property motion. `animate` only queues work; each
//! `tick` reaps finished playbacks and then starts the queued motions in
//! one pass. A motion retargeted mid-flight hands its velocity to the
//! spring that replaces it.

use crate::generator::Generator;
use crate::keyframe::{plan_transition, resolve_keyframes};
use crate::options::{AnimateOptions, AnimateTarget, Target, TransitionTree, Variants};
use crate::sampler::DEFAULT_RESOLUTION;
use crate::spring::SpringGenerator;
use crate::style::{initial_style, Initial};
use crate::surface::{ElementId, PlaybackHandle, PlaybackOutcome, StyleSurface};
use crate::transition::resolve_transition;
use crate::variants::match_against_variants;
use indexmap::IndexMap;
use motioned_core::{MotionError, PropertyName, Result};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

/// Scheduler configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Spring samples per second of motion
    pub sample_resolution: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sample_resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_resolution(mut self, resolution: u32) -> Self {
        self.sample_resolution = resolution;
        self
    }
}

/// Per-element settings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementConfig {
    pub variants: Option<Variants>,
    /// Lowest-priority transition for every property of the element
    pub transition: Option<TransitionTree>,
}

impl ElementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variants(mut self, variants: Variants) -> Self {
        self.variants = Some(variants);
        self
    }

    pub fn with_transition(mut self, transition: impl Into<TransitionTree>) -> Self {
        self.transition = Some(transition.into());
        self
    }
}

/// Whether a property is currently moving
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Animating,
}

/// An in-flight motion of one property
pub struct PropertyMotion<H> {
    pub handle: H,
    /// Present for springs; evaluated on interruption to recover velocity
    pub generator: Option<SpringGenerator>,
    /// Milliseconds
    pub duration: f64,
    /// Milliseconds
    pub delay: f64,
}

impl<H: PlaybackHandle> PropertyMotion<H> {
    /// Velocity to hand to a replacement motion
    ///
    /// Springs are evaluated at `duration × progress`, counting missing
    /// progress as complete. Tweens and springs at rest carry none.
    pub fn outgoing_velocity(&self) -> f64 {
        let Some(generator) = &self.generator else {
            return 0.0;
        };
        let progress = self.handle.progress().unwrap_or(1.0);
        let state = generator.state_at(self.duration * progress);
        if state.at_rest {
            0.0
        } else {
            state.velocity
        }
    }
}

struct ElementState {
    config: ElementConfig,
    last_request: Option<AnimateOptions>,
}

struct PendingUpdate {
    target: Target,
    state_transition: Option<TransitionTree>,
}

type MotionKey = (ElementId, PropertyName);

/// Schedules property motions on a [`StyleSurface`]
pub struct MotionScheduler<S: StyleSurface> {
    surface: S,
    config: SchedulerConfig,
    elements: SlotMap<ElementId, ElementState>,
    motions: FxHashMap<MotionKey, PropertyMotion<S::Handle>>,
    pending: IndexMap<MotionKey, PendingUpdate>,
}

impl<S: StyleSurface> MotionScheduler<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, SchedulerConfig::default())
    }

    pub fn with_config(surface: S, config: SchedulerConfig) -> Self {
        Self {
            surface,
            config,
            elements: SlotMap::with_key(),
            motions: FxHashMap::default(),
            pending: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn register_element(&mut self, config: ElementConfig) -> ElementId {
        self.elements.insert(ElementState {
            config,
            last_request: None,
        })
    }

    /// Replace an element's variants and transition
    ///
    /// Takes effect from the next request or tick.
    pub fn update_element(&mut self, element: ElementId, config: ElementConfig) -> Result<()> {
        let state = self
            .elements
            .get_mut(element)
            .ok_or(MotionError::ElementNotFound)?;
        state.config = config;
        Ok(())
    }

    /// Forget an element, cancelling its motions and queued updates
    pub fn destroy_element(&mut self, element: ElementId) -> bool {
        if self.elements.remove(element).is_none() {
            return false;
        }

        self.pending.retain(|(owner, _), _| *owner != element);
        let keys: Vec<MotionKey> = self
            .motions
            .keys()
            .filter(|(owner, _)| *owner == element)
            .cloned()
            .collect();
        for key in keys {
            if let Some(mut motion) = self.motions.remove(&key) {
                motion.handle.cancel();
            }
        }
        debug!(?element, "Destroyed element");
        true
    }

    /// Queue `target` for the next tick.
    ///
    /// Returns `false` when the resolved options equal the element's previous
    /// request, in which case nothing is queued. Per property, a later
    /// request replaces an earlier one that has not been ticked yet.
    pub fn animate(&mut self, element: ElementId, target: impl Into<AnimateTarget>) -> Result<bool> {
        let target = target.into();
        let state = self
            .elements
            .get_mut(element)
            .ok_or(MotionError::ElementNotFound)?;
        let options = match_against_variants(state.config.variants.as_ref(), &target)?;

        if state.last_request.as_ref() == Some(options) {
            trace!(?element, "Ignoring unchanged animate request");
            return Ok(false);
        }

        for (property, property_target) in &options.properties {
            self.pending.insert(
                (element, property.clone()),
                PendingUpdate {
                    target: property_target.clone(),
                    state_transition: options.transition.clone(),
                },
            );
        }
        state.last_request = Some(options.clone());
        Ok(true)
    }

    /// Run one frame.
    ///
    /// Reaps playbacks that finished or were cancelled, then starts every
    /// queued motion. Returns how many motions started. When some properties
    /// fail, the others still start and the first error is returned.
    pub fn tick(&mut self) -> Result<usize> {
        self.reap();

        let batch = std::mem::take(&mut self.pending);
        let mut started = 0;
        let mut first_error = None;
        for ((element, property), update) in batch {
            if !self.elements.contains_key(element) {
                continue;
            }
            match self.start_motion(element, &property, update) {
                Ok(true) => started += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(?element, %property, %err, "Failed to start motion");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(started),
        }
    }

    /// Whether requests are waiting for the next tick
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Whether any playback is still running
    pub fn is_animating(&self) -> bool {
        self.motions
            .values()
            .any(|motion| motion.handle.outcome() == PlaybackOutcome::Pending)
    }

    pub fn phase(&self, element: ElementId, property: &str) -> MotionPhase {
        match self.motions.get(&(element, PropertyName::new(property))) {
            Some(motion) if motion.handle.outcome() == PlaybackOutcome::Pending => {
                MotionPhase::Animating
            }
            _ => MotionPhase::Idle,
        }
    }

    /// The tracked motion of a property, if any
    pub fn motion(&self, element: ElementId, property: &str) -> Option<&PropertyMotion<S::Handle>> {
        self.motions.get(&(element, PropertyName::new(property)))
    }

    /// Every tracked motion of an element
    pub fn motions(
        &self,
        element: ElementId,
    ) -> impl Iterator<Item = (&PropertyName, &PropertyMotion<S::Handle>)> + '_ {
        self.motions
            .iter()
            .filter(move |((owner, _), _)| *owner == element)
            .map(|((_, property), motion)| (property, motion))
    }

    /// Inline style for the element's first frame
    pub fn initial_style(
        &self,
        element: ElementId,
        initial: Option<&Initial>,
        animate: &AnimateTarget,
        extra_transform: Option<&str>,
    ) -> Result<Vec<(String, String)>> {
        let state = self
            .elements
            .get(element)
            .ok_or(MotionError::ElementNotFound)?;
        initial_style(state.config.variants.as_ref(), initial, animate, extra_transform)
    }

    /// Drop motions whose playback ended, committing natural completions
    fn reap(&mut self) {
        let done: Vec<(MotionKey, PlaybackOutcome)> = self
            .motions
            .iter()
            .map(|(key, motion)| (key, motion.handle.outcome()))
            .filter(|(_, outcome)| *outcome != PlaybackOutcome::Pending)
            .map(|(key, outcome)| (key.clone(), outcome))
            .collect();

        for (key, outcome) in done {
            let Some(mut motion) = self.motions.remove(&key) else {
                continue;
            };
            let (element, property) = &key;
            match outcome {
                PlaybackOutcome::Finished => {
                    motion.handle.commit_styles();
                    motion.handle.cancel();
                    debug!(?element, %property, "Motion finished");
                }
                PlaybackOutcome::Cancelled => {
                    trace!(?element, %property, "Motion cancelled");
                }
                PlaybackOutcome::Pending => {}
            }
        }
    }

    /// Replace the motion of one property; `Ok(false)` when there is nothing to play
    fn start_motion(
        &mut self,
        element: ElementId,
        property: &PropertyName,
        update: PendingUpdate,
    ) -> Result<bool> {
        let style_name = property.style_name();
        let key = (element, property.clone());

        let mut velocity = 0.0;
        if let Some(mut outgoing) = self.motions.remove(&key) {
            velocity = outgoing.outgoing_velocity();
            outgoing.handle.commit_styles();
            outgoing.handle.cancel();
            debug!(?element, %property, velocity, "Interrupted motion");
        }

        let surface = &self.surface;
        let values = resolve_keyframes(&update.target, || {
            surface.current_value(element, &style_name)
        });
        if values.is_empty() {
            warn!(?element, %property, "No keyframes to animate");
            return Ok(false);
        }

        let global = self
            .elements
            .get(element)
            .and_then(|state| state.config.transition.as_ref());
        let layers: Vec<&TransitionTree> = global
            .into_iter()
            .chain(update.state_transition.as_ref())
            .collect();
        let transition = resolve_transition(&layers, property);

        let (plan, generator) = plan_transition(
            property,
            &values,
            &transition,
            velocity,
            self.config.sample_resolution,
        )?;

        let handle = self
            .surface
            .play(element, &style_name, &plan.keyframes, &plan.timing);
        debug!(
            ?element,
            %property,
            spring = generator.is_some(),
            duration_ms = plan.timing.duration,
            delay_ms = plan.timing.delay,
            "Started motion"
        );

        self.motions.insert(
            key,
            PropertyMotion {
                handle,
                generator,
                duration: plan.timing.duration,
                delay: plan.timing.delay,
            },
        );
        Ok(true)
    }
}
