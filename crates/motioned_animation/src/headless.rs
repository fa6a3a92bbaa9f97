//! Headless style surface for testing.
//!
//! Plays keyframes against a virtual clock instead of a renderer, useful for:
//! - Unit and integration testing the scheduler
//! - Previewing motion plans from the command line
//!
//! Time only moves when [`HeadlessSurface::advance`] is called, so every run
//! is deterministic.

use crate::keyframe::{FillMode, PlannedKeyframe, PlaybackTiming};
use crate::registration::PropertyRegistry;
use crate::surface::{ElementId, PlaybackHandle, PlaybackOutcome, StyleSurface};
use motioned_core::{CustomProperty, StyleValue, CUSTOM_PROPERTIES};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

new_key_type! {
    struct PlaybackId;
}

/// A `play` call as received by the surface
#[derive(Clone, Debug, PartialEq)]
pub struct PlayRecord {
    pub element: ElementId,
    pub property: String,
    pub keyframes: Vec<PlannedKeyframe>,
    pub timing: PlaybackTiming,
    /// Virtual time of the call (ms)
    pub started_at: f64,
}

struct Playback {
    element: ElementId,
    property: String,
    keyframes: Vec<PlannedKeyframe>,
    timing: PlaybackTiming,
    started_at: f64,
    /// Start order; the latest playback of a property wins
    sequence: u64,
}

impl Playback {
    fn local_time(&self, now: f64) -> f64 {
        now - self.started_at - self.timing.delay
    }

    fn is_finished(&self, now: f64) -> bool {
        self.local_time(now) >= self.timing.duration
    }

    /// Iteration progress, `None` when the playback has no effect
    fn progress(&self, now: f64) -> Option<f64> {
        let local = self.local_time(now);
        if local < 0.0 {
            return None;
        }
        if local >= self.timing.duration {
            return match self.timing.fill {
                FillMode::Forwards => Some(1.0),
                FillMode::None => None,
            };
        }
        Some(local / self.timing.duration)
    }

    /// Displayed value at `now`
    fn value_at(&self, now: f64) -> Option<StyleValue> {
        self.progress(now)
            .map(|progress| interpolate_keyframes(&self.keyframes, progress))
    }
}

#[derive(Default)]
struct HeadlessState {
    now: f64,
    next_sequence: u64,
    base_values: FxHashMap<(ElementId, String), StyleValue>,
    playbacks: SlotMap<PlaybackId, Playback>,
    history: Vec<PlayRecord>,
    registered: Vec<String>,
}

impl HeadlessState {
    /// The playback currently driving `property`, if any
    fn active_playback(&self, element: ElementId, property: &str) -> Option<&Playback> {
        self.playbacks
            .values()
            .filter(|p| p.element == element && p.property == property)
            .filter(|p| p.progress(self.now).is_some())
            .max_by_key(|p| p.sequence)
    }

    fn computed_value(&self, element: ElementId, property: &str) -> StyleValue {
        if let Some(value) = self
            .active_playback(element, property)
            .and_then(|p| p.value_at(self.now))
        {
            return value;
        }
        if let Some(value) = self.base_values.get(&(element, property.to_string())) {
            return value.clone();
        }
        CUSTOM_PROPERTIES
            .iter()
            .find(|custom| custom.name == property)
            .map(|custom| StyleValue::from(custom.initial_value))
            .unwrap_or_else(|| StyleValue::from(""))
    }
}

/// A [`StyleSurface`] driven by a virtual clock
#[derive(Clone, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the virtual clock forward
    pub fn advance(&mut self, dt_ms: f64) {
        self.state.borrow_mut().now += dt_ms.max(0.0);
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Set the base (non-animated) value of a property
    pub fn set_value(&mut self, element: ElementId, property: &str, value: impl Into<StyleValue>) {
        self.state
            .borrow_mut()
            .base_values
            .insert((element, property.to_string()), value.into());
    }

    /// Base value of a property, ignoring running playbacks
    pub fn base_value(&self, element: ElementId, property: &str) -> Option<StyleValue> {
        self.state
            .borrow()
            .base_values
            .get(&(element, property.to_string()))
            .cloned()
    }

    /// Every `play` call so far, oldest first
    pub fn history(&self) -> Vec<PlayRecord> {
        self.state.borrow().history.clone()
    }

    /// The most recent `play` call for `property`
    pub fn last_play(&self, element: ElementId, property: &str) -> Option<PlayRecord> {
        self.state
            .borrow()
            .history
            .iter()
            .rev()
            .find(|record| record.element == element && record.property == property)
            .cloned()
    }

    /// Cancel every playback of `property` from outside the scheduler
    pub fn cancel_playbacks(&mut self, element: ElementId, property: &str) -> usize {
        let mut state = self.state.borrow_mut();
        let before = state.playbacks.len();
        state
            .playbacks
            .retain(|_, p| !(p.element == element && p.property == property));
        before - state.playbacks.len()
    }

    /// Playbacks that have not been cancelled
    pub fn live_playbacks(&self) -> usize {
        self.state.borrow().playbacks.len()
    }

    /// `@property` rules registered through [`PropertyRegistry`]
    pub fn registered_rules(&self) -> Vec<String> {
        self.state.borrow().registered.clone()
    }
}

impl StyleSurface for HeadlessSurface {
    type Handle = HeadlessHandle;

    fn current_value(&self, element: ElementId, property: &str) -> StyleValue {
        self.state.borrow().computed_value(element, property)
    }

    fn play(
        &mut self,
        element: ElementId,
        property: &str,
        keyframes: &[PlannedKeyframe],
        timing: &PlaybackTiming,
    ) -> HeadlessHandle {
        let mut state = self.state.borrow_mut();
        let started_at = state.now;
        let sequence = state.next_sequence;
        state.next_sequence += 1;

        state.history.push(PlayRecord {
            element,
            property: property.to_string(),
            keyframes: keyframes.to_vec(),
            timing: *timing,
            started_at,
        });
        let id = state.playbacks.insert(Playback {
            element,
            property: property.to_string(),
            keyframes: keyframes.to_vec(),
            timing: *timing,
            started_at,
            sequence,
        });

        HeadlessHandle {
            id,
            state: Rc::clone(&self.state),
        }
    }
}

impl PropertyRegistry for HeadlessSurface {
    type Error = Infallible;

    fn register_property(&mut self, property: &CustomProperty) -> Result<(), Infallible> {
        self.state.borrow_mut().registered.push(property.to_css_rule());
        Ok(())
    }
}

/// Handle to a headless playback
pub struct HeadlessHandle {
    id: PlaybackId,
    state: Rc<RefCell<HeadlessState>>,
}

impl PlaybackHandle for HeadlessHandle {
    fn progress(&self) -> Option<f64> {
        let state = self.state.borrow();
        state.playbacks.get(self.id)?.progress(state.now)
    }

    fn commit_styles(&mut self) {
        let mut state = self.state.borrow_mut();
        let now = state.now;
        let Some((key, value)) = state.playbacks.get(self.id).and_then(|p| {
            p.value_at(now)
                .map(|value| ((p.element, p.property.clone()), value))
        }) else {
            return;
        };
        state.base_values.insert(key, value);
    }

    fn cancel(&mut self) {
        self.state.borrow_mut().playbacks.remove(self.id);
    }

    fn outcome(&self) -> PlaybackOutcome {
        let state = self.state.borrow();
        match state.playbacks.get(self.id) {
            None => PlaybackOutcome::Cancelled,
            Some(playback) if playback.is_finished(state.now) => PlaybackOutcome::Finished,
            Some(_) => PlaybackOutcome::Pending,
        }
    }
}

/// Value of a keyframe list at iteration `progress`
///
/// Numeric keyframes interpolate their leading numbers and keep the unit of
/// the later keyframe; anything else switches at the segment midpoint.
fn interpolate_keyframes(keyframes: &[PlannedKeyframe], progress: f64) -> StyleValue {
    let count = keyframes.len();
    match count {
        0 => return StyleValue::from(""),
        1 => return StyleValue::from(keyframes[0].value.as_str()),
        _ => {}
    }

    let even = (count - 1) as f64;
    let offsets: Vec<f64> = keyframes
        .iter()
        .enumerate()
        .map(|(i, k)| k.offset.unwrap_or(i as f64 / even))
        .collect();

    let index = (0..count - 1)
        .rev()
        .find(|&i| offsets[i] <= progress)
        .unwrap_or(0);
    let (start, end) = (&keyframes[index], &keyframes[index + 1]);

    let span = offsets[index + 1] - offsets[index];
    let local = if span > 0.0 {
        ((progress - offsets[index]) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let eased = start.easing.as_ref().map_or(local, |easing| easing.apply(local));

    let from = StyleValue::from(start.value.as_str());
    let to = StyleValue::from(end.value.as_str());
    match (from.leading_number(), to.leading_number()) {
        (Ok(a), Ok(b)) => StyleValue::Text(format!("{}{}", a + (b - a) * eased, to.unit_suffix())),
        _ if eased < 0.5 => from,
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use slotmap::SlotMap;

    fn element() -> ElementId {
        let mut elements: SlotMap<ElementId, ()> = SlotMap::with_key();
        elements.insert(())
    }

    fn keyframe(value: &str, easing: Option<Easing>) -> PlannedKeyframe {
        PlannedKeyframe {
            value: value.to_string(),
            offset: None,
            easing,
        }
    }

    fn timing(duration: f64, delay: f64) -> PlaybackTiming {
        PlaybackTiming {
            duration,
            delay,
            fill: FillMode::Forwards,
        }
    }

    #[test]
    fn test_unset_values_fall_back_to_initial() {
        let surface = HeadlessSurface::new();
        let el = element();
        assert_eq!(surface.current_value(el, "--scale-x"), StyleValue::from("1"));
        assert_eq!(surface.current_value(el, "opacity"), StyleValue::from(""));
    }

    #[test]
    fn test_playback_interpolates_with_unit() {
        let mut surface = HeadlessSurface::new();
        let el = element();
        let frames = [
            keyframe("0px", Some(Easing::Linear)),
            keyframe("100px", None),
        ];
        let handle = surface.play(el, "width", &frames, &timing(1000.0, 0.0));

        surface.advance(250.0);
        assert_eq!(surface.current_value(el, "width"), StyleValue::from("25px"));
        assert_eq!(handle.progress(), Some(0.25));
        assert_eq!(handle.outcome(), PlaybackOutcome::Pending);

        surface.advance(750.0);
        assert_eq!(handle.outcome(), PlaybackOutcome::Finished);
        assert_eq!(surface.current_value(el, "width"), StyleValue::from("100px"));
    }

    #[test]
    fn test_delay_has_no_effect_until_elapsed() {
        let mut surface = HeadlessSurface::new();
        let el = element();
        surface.set_value(el, "opacity", "0.2");
        let frames = [keyframe("0", Some(Easing::Linear)), keyframe("1", None)];
        let handle = surface.play(el, "opacity", &frames, &timing(100.0, 50.0));

        surface.advance(25.0);
        assert_eq!(handle.progress(), None);
        assert_eq!(surface.current_value(el, "opacity"), StyleValue::from("0.2"));

        surface.advance(75.0);
        assert_eq!(handle.progress(), Some(0.5));
    }

    #[test]
    fn test_commit_then_cancel_keeps_value() {
        let mut surface = HeadlessSurface::new();
        let el = element();
        let frames = [keyframe("0px", Some(Easing::Linear)), keyframe("10px", None)];
        let mut handle = surface.play(el, "--x", &frames, &timing(100.0, 0.0));

        surface.advance(50.0);
        handle.commit_styles();
        handle.cancel();

        assert_eq!(handle.outcome(), PlaybackOutcome::Cancelled);
        assert_eq!(handle.progress(), None);
        assert_eq!(surface.live_playbacks(), 0);
        assert_eq!(surface.current_value(el, "--x"), StyleValue::from("5px"));
    }

    #[test]
    fn test_cancel_without_commit_reverts() {
        let mut surface = HeadlessSurface::new();
        let el = element();
        let frames = [keyframe("0px", None), keyframe("10px", None)];
        let mut handle = surface.play(el, "--y", &frames, &timing(100.0, 0.0));
        surface.advance(50.0);
        handle.cancel();
        assert_eq!(surface.current_value(el, "--y"), StyleValue::from("0px"));
    }

    #[test]
    fn test_per_keyframe_offsets_and_easing() {
        let frames = [
            PlannedKeyframe {
                value: "0".to_string(),
                offset: Some(0.0),
                easing: Some(Easing::Linear),
            },
            PlannedKeyframe {
                value: "10".to_string(),
                offset: Some(0.2),
                easing: Some(Easing::Piecewise(vec![0.0, 0.0, 1.0])),
            },
            PlannedKeyframe {
                value: "20".to_string(),
                offset: Some(1.0),
                easing: None,
            },
        ];
        assert_eq!(interpolate_keyframes(&frames, 0.1), StyleValue::from("5"));
        // Halfway through the second segment the piecewise easing is still at 0
        assert_eq!(interpolate_keyframes(&frames, 0.6), StyleValue::from("10"));
        assert_eq!(interpolate_keyframes(&frames, 1.0), StyleValue::from("20"));
    }

    #[test]
    fn test_non_numeric_keyframes_switch_discretely() {
        let frames = [keyframe("red", None), keyframe("blue", None)];
        assert_eq!(interpolate_keyframes(&frames, 0.4), StyleValue::from("red"));
        assert_eq!(interpolate_keyframes(&frames, 0.6), StyleValue::from("blue"));
    }

    #[test]
    fn test_history_records_plays() {
        let mut surface = HeadlessSurface::new();
        let el = element();
        surface.advance(10.0);
        surface.play(el, "opacity", &[keyframe("0", None), keyframe("1", None)], &timing(5.0, 0.0));
        let record = surface.last_play(el, "opacity").unwrap();
        assert_eq!(record.started_at, 10.0);
        assert_eq!(record.keyframes.len(), 2);
        assert_eq!(surface.history().len(), 1);
    }
}
