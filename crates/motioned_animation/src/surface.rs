//! Style surface contract
//!
//! The scheduler never touches rendering directly. It reads live values and
//! starts keyframe playback through a [`StyleSurface`], then polls the
//! returned [`PlaybackHandle`] on each tick.

use crate::keyframe::{PlannedKeyframe, PlaybackTiming};
use motioned_core::StyleValue;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to an element registered with the scheduler
    pub struct ElementId;
}

/// Where a playback stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Delayed or running
    Pending,
    /// Reached its end on its own
    Finished,
    /// Stopped before reaching its end
    Cancelled,
}

/// A running keyframe playback
pub trait PlaybackHandle {
    /// Fraction of the duration played, 0..1; `None` before the delay ends
    /// or once playback no longer applies
    fn progress(&self) -> Option<f64>;

    /// Write the currently displayed value into the element's base style
    fn commit_styles(&mut self);

    /// Stop playback and remove its effect
    fn cancel(&mut self);

    fn outcome(&self) -> PlaybackOutcome;
}

/// Something that can display animated style values
pub trait StyleSurface {
    type Handle: PlaybackHandle;

    /// Live value of `property` (a style name such as `--x` or `opacity`)
    fn current_value(&self, element: ElementId, property: &str) -> StyleValue;

    /// Start playing `keyframes` for `property`
    fn play(
        &mut self,
        element: ElementId,
        property: &str,
        keyframes: &[PlannedKeyframe],
        timing: &PlaybackTiming,
    ) -> Self::Handle;
}
