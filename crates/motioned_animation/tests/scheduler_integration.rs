//! Integration tests for the motion scheduler against the headless surface
//!
//! These tests verify that:
//! - Retargeting a spring mid-flight carries its velocity into the new spring
//! - Requests made between ticks collapse into one batch
//! - Keyframes, segment easings and layered transitions reach the surface
//! - Finished and externally cancelled playbacks are cleaned up

use motioned_animation::{
    AnimateOptions, Easing, ElementConfig, ElementId, HeadlessSurface, MotionError, MotionPhase,
    MotionScheduler, PlaybackHandle, SpringConfig, StyleSurface, StyleValue, TransitionSpec,
    TransitionTree, Variants,
};

fn scheduler() -> MotionScheduler<HeadlessSurface> {
    MotionScheduler::new(HeadlessSurface::new())
}

fn spring_element(scheduler: &mut MotionScheduler<HeadlessSurface>) -> ElementId {
    let el = scheduler.register_element(
        ElementConfig::new().with_transition(TransitionSpec::spring(SpringConfig::default())),
    );
    scheduler.surface_mut().set_value(el, "--x", StyleValue::from("0px"));
    el
}

fn keyframe_values(scheduler: &MotionScheduler<HeadlessSurface>, el: ElementId, property: &str) -> Vec<String> {
    scheduler
        .surface()
        .last_play(el, property)
        .unwrap()
        .keyframes
        .into_iter()
        .map(|k| k.value)
        .collect()
}

/// Interrupting a spring halfway seeds the new spring with its velocity
#[test]
fn test_interruption_preserves_velocity() {
    let mut scheduler = scheduler();
    let el = spring_element(&mut scheduler);

    scheduler
        .animate(el, AnimateOptions::new().set("x", 100.0))
        .unwrap();
    scheduler.tick().unwrap();

    let duration = scheduler.motion(el, "x").unwrap().duration;
    assert!(duration > 0.0);
    scheduler.surface_mut().advance(duration / 2.0);

    let outgoing = scheduler.motion(el, "x").unwrap();
    assert_eq!(outgoing.handle.progress(), Some(0.5));
    let expected_velocity = outgoing.outgoing_velocity();
    assert!(expected_velocity != 0.0);

    scheduler
        .animate(el, AnimateOptions::new().set("x", 0.0))
        .unwrap();
    scheduler.tick().unwrap();

    let incoming = scheduler.motion(el, "x").unwrap();
    let generator = incoming.generator.unwrap();
    assert_eq!(generator.params().velocity, expected_velocity);
    assert_eq!(generator.params().to, 0.0);

    // The new spring starts where the old one was committed
    let committed = scheduler
        .surface()
        .base_value(el, "--x")
        .unwrap()
        .leading_number()
        .unwrap();
    assert_eq!(generator.params().from, committed);
    assert!(committed > 0.0);

    // Only the new playback is still alive
    assert_eq!(scheduler.surface().live_playbacks(), 1);
}

/// A spring still in its delay has not moved, so it hands over no velocity
#[test]
fn test_interruption_during_delay_carries_no_velocity() {
    let mut scheduler = scheduler();
    let el = scheduler.register_element(ElementConfig::new().with_transition(
        TransitionSpec::spring(SpringConfig::default()).with_delay(200.0),
    ));
    scheduler.surface_mut().set_value(el, "--y", StyleValue::from("0px"));

    scheduler
        .animate(el, AnimateOptions::new().set("y", 50.0))
        .unwrap();
    scheduler.tick().unwrap();
    scheduler.surface_mut().advance(100.0);

    let motion = scheduler.motion(el, "y").unwrap();
    assert_eq!(motion.handle.progress(), None);
    assert_eq!(motion.delay, 200.0);
    assert_eq!(motion.outgoing_velocity(), 0.0);

    scheduler
        .animate(el, AnimateOptions::new().set("y", 0.0))
        .unwrap();
    scheduler.tick().unwrap();
    let generator = scheduler.motion(el, "y").unwrap().generator.unwrap();
    assert_eq!(generator.params().velocity, 0.0);
}

/// Several requests before a tick produce one playback with the last value
#[test]
fn test_requests_between_ticks_are_batched() {
    let mut scheduler = scheduler();
    let el = scheduler.register_element(ElementConfig::new());
    scheduler.surface_mut().set_value(el, "opacity", 0.0);

    scheduler
        .animate(el, AnimateOptions::new().set("opacity", 0.5))
        .unwrap();
    scheduler
        .animate(el, AnimateOptions::new().set("opacity", 0.8).set("width", 10.0))
        .unwrap();
    scheduler
        .animate(el, AnimateOptions::new().set("opacity", 1.0))
        .unwrap();

    assert_eq!(scheduler.tick().unwrap(), 2);
    assert_eq!(scheduler.surface().history().len(), 2);
    assert_eq!(keyframe_values(&scheduler, el, "opacity"), vec!["0", "1"]);
    assert_eq!(keyframe_values(&scheduler, el, "width"), vec!["", "10px"]);

    // Nothing left to do on the next frame
    assert_eq!(scheduler.tick().unwrap(), 0);
}

/// A leading null reads the live value just before the curve is built
#[test]
fn test_leading_null_uses_live_value() {
    let mut scheduler = scheduler();
    let el = scheduler.register_element(ElementConfig::new());

    scheduler
        .animate(
            el,
            AnimateOptions::new().set(
                "x",
                vec![None, Some(StyleValue::from(50.0)), Some(StyleValue::from(100.0))],
            ),
        )
        .unwrap();
    // Set after the request; the value read at tick time wins
    scheduler.surface_mut().set_value(el, "--x", 10.0);
    scheduler.tick().unwrap();

    assert_eq!(
        keyframe_values(&scheduler, el, "--x"),
        vec!["10px", "50px", "100px"]
    );
}

/// Per-segment easings and explicit times become keyframe offsets
#[test]
fn test_tween_segment_easings() {
    let mut scheduler = scheduler();
    let el = scheduler.register_element(ElementConfig::new());
    let transition = TransitionSpec::tween(1000.0)
        .with_easings(vec![Easing::EaseIn, Easing::EaseOut])
        .with_times(vec![0.0, 0.5, 1.0]);

    scheduler
        .animate(
            el,
            AnimateOptions::new()
                .set(
                    "opacity",
                    vec![
                        Some(StyleValue::from(0.0)),
                        Some(StyleValue::from(0.5)),
                        Some(StyleValue::from(1.0)),
                    ],
                )
                .with_transition(transition),
        )
        .unwrap();
    scheduler.tick().unwrap();

    let record = scheduler.surface().last_play(el, "opacity").unwrap();
    assert_eq!(record.timing.duration, 1000.0);
    let offsets: Vec<_> = record.keyframes.iter().map(|k| k.offset).collect();
    assert_eq!(offsets, vec![Some(0.0), Some(0.5), Some(1.0)]);
    let easings: Vec<_> = record.keyframes.iter().map(|k| k.easing.clone()).collect();
    assert_eq!(easings, vec![Some(Easing::EaseIn), Some(Easing::EaseOut), None]);

    // Halfway through the first segment ease-in is still slow
    scheduler.surface_mut().advance(250.0);
    let value = scheduler
        .surface()
        .current_value(el, "opacity")
        .leading_number()
        .unwrap();
    assert!(value > 0.0 && value < 0.25);
}

/// Variant transitions override the element transition per property
#[test]
fn test_variant_transition_layering() {
    let mut variants = Variants::new();
    variants.insert(
        "open".to_string(),
        AnimateOptions::new()
            .set("opacity", 1.0)
            .set("height", 200.0)
            .with_transition(
                TransitionTree::default().with_override("opacity", TransitionSpec::tween(100.0)),
            ),
    );

    let mut scheduler = scheduler();
    let el = scheduler.register_element(
        ElementConfig::new()
            .with_variants(variants)
            .with_transition(TransitionSpec::tween(1000.0).with_delay(20.0)),
    );
    scheduler.surface_mut().set_value(el, "opacity", 0.0);
    scheduler.surface_mut().set_value(el, "height", "0px");

    assert!(scheduler.animate(el, "open").unwrap());
    assert!(!scheduler.animate(el, "open").unwrap());
    scheduler.tick().unwrap();

    let opacity = scheduler.surface().last_play(el, "opacity").unwrap();
    let height = scheduler.surface().last_play(el, "height").unwrap();
    assert_eq!(opacity.timing.duration, 100.0);
    assert_eq!(opacity.timing.delay, 20.0);
    assert_eq!(height.timing.duration, 1000.0);

    assert_eq!(
        scheduler.animate(el, "closed"),
        Err(MotionError::VariantNotFound("closed".to_string()))
    );
}

/// Finished playbacks are committed and dropped on the next tick
#[test]
fn test_natural_completion_returns_to_idle() {
    let mut scheduler = scheduler();
    let el = scheduler.register_element(
        ElementConfig::new().with_transition(TransitionSpec::tween(200.0).with_easing(Easing::Linear)),
    );
    scheduler.surface_mut().set_value(el, "opacity", 0.0);

    scheduler
        .animate(el, AnimateOptions::new().set("opacity", 1.0))
        .unwrap();
    scheduler.tick().unwrap();
    assert_eq!(scheduler.phase(el, "opacity"), MotionPhase::Animating);
    assert!(scheduler.is_animating());

    scheduler.surface_mut().advance(250.0);
    assert_eq!(scheduler.phase(el, "opacity"), MotionPhase::Idle);

    scheduler.tick().unwrap();
    assert!(scheduler.motion(el, "opacity").is_none());
    assert!(!scheduler.is_animating());
    assert_eq!(scheduler.surface().live_playbacks(), 0);
    assert_eq!(
        scheduler.surface().base_value(el, "opacity"),
        Some(StyleValue::from("1"))
    );
}

/// Cancellation from outside is not an error and commits nothing
#[test]
fn test_external_cancellation_is_swallowed() {
    let mut scheduler = scheduler();
    let el = scheduler.register_element(ElementConfig::new());
    scheduler.surface_mut().set_value(el, "opacity", 0.0);

    scheduler
        .animate(el, AnimateOptions::new().set("opacity", 1.0))
        .unwrap();
    scheduler.tick().unwrap();
    scheduler.surface_mut().advance(100.0);
    assert_eq!(scheduler.surface_mut().cancel_playbacks(el, "opacity"), 1);

    assert_eq!(scheduler.tick().unwrap(), 0);
    assert!(scheduler.motion(el, "opacity").is_none());
    assert_eq!(
        scheduler.surface().base_value(el, "opacity"),
        Some(StyleValue::from(0.0))
    );
}

/// One failing property does not stop the rest of the batch
#[test]
fn test_failed_property_reports_first_error() {
    let mut scheduler = scheduler();
    let el = spring_element(&mut scheduler);
    scheduler.surface_mut().set_value(el, "height", "auto");

    scheduler
        .animate(
            el,
            AnimateOptions::new()
                .set("height", 100.0)
                .set("x", 40.0),
        )
        .unwrap();

    assert_eq!(
        scheduler.tick(),
        Err(MotionError::ValueParse("auto".to_string()))
    );
    assert_eq!(scheduler.phase(el, "x"), MotionPhase::Animating);
    assert_eq!(scheduler.phase(el, "height"), MotionPhase::Idle);
}
