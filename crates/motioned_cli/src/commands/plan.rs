use std::path::Path;

use anyhow::{Context, Result};
use motioned_animation::{
    AnimateTarget, ElementConfig, ElementId, HeadlessSurface, MotionScheduler, PlayRecord,
    SchedulerConfig,
};
use serde::Serialize;
use tracing::info;

use crate::config::MotionedConfig;

#[derive(Debug, Serialize)]
struct KeyframeReport {
    value: String,
    offset: Option<f64>,
    easing: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlanReport {
    at_ms: f64,
    property: String,
    style_name: String,
    duration_ms: f64,
    delay_ms: f64,
    /// Velocity handed over from an interrupted spring
    initial_velocity: Option<f64>,
    keyframes: Vec<KeyframeReport>,
}

fn keyframe_reports(record: &PlayRecord) -> Vec<KeyframeReport> {
    let count = record.keyframes.len();
    let even = count.saturating_sub(1).max(1) as f64;
    let offset_of = |i: usize| {
        record.keyframes[i]
            .offset
            .unwrap_or(i as f64 / even)
    };

    record
        .keyframes
        .iter()
        .enumerate()
        .map(|(i, keyframe)| {
            let span = if i + 1 < count {
                offset_of(i + 1) - offset_of(i)
            } else {
                0.0
            };
            KeyframeReport {
                value: keyframe.value.clone(),
                offset: keyframe.offset,
                easing: keyframe
                    .easing
                    .as_ref()
                    .map(|easing| easing.to_css(record.timing.duration * span)),
            }
        })
        .collect()
}

/// Reports for every motion started at the current virtual time
fn collect_reports(scheduler: &MotionScheduler<HeadlessSurface>, element: ElementId) -> Vec<PlanReport> {
    let now = scheduler.surface().now();
    let mut reports: Vec<PlanReport> = scheduler
        .motions(element)
        .filter_map(|(property, motion)| {
            let style_name = property.style_name();
            let record = scheduler.surface().last_play(element, &style_name)?;
            if record.started_at != now {
                return None;
            }
            Some(PlanReport {
                at_ms: now,
                property: property.to_string(),
                style_name,
                duration_ms: record.timing.duration,
                delay_ms: record.timing.delay,
                initial_velocity: motion.generator.map(|g| g.params().velocity),
                keyframes: keyframe_reports(&record),
            })
        })
        .collect();
    reports.sort_by(|a, b| a.property.cmp(&b.property));
    reports
}

fn print_reports(reports: &[PlanReport]) {
    for report in reports {
        println!(
            "{} ({}) at {}ms: duration {}ms, delay {}ms",
            report.property, report.style_name, report.at_ms, report.duration_ms, report.delay_ms
        );
        if let Some(velocity) = report.initial_velocity {
            println!("  initial velocity: {}", velocity);
        }
        for keyframe in &report.keyframes {
            let offset = keyframe
                .offset
                .map(|o| format!("{:.3}", o))
                .unwrap_or_else(|| "-".to_string());
            match &keyframe.easing {
                Some(easing) => println!("  [{}] {} {}", offset, keyframe.value, easing),
                None => println!("  [{}] {}", offset, keyframe.value),
            }
        }
    }
}

pub fn run(path: &Path, target: &str, then: Option<&str>, after: f64, json: bool) -> Result<()> {
    let config = MotionedConfig::load(path)?;

    let mut scheduler = MotionScheduler::with_config(
        HeadlessSurface::new(),
        SchedulerConfig::new().with_sample_resolution(config.motion.resolution),
    );
    let variants = (!config.variants.is_empty()).then_some(config.variants);
    let element = scheduler.register_element(ElementConfig {
        variants,
        transition: config.transition,
    });

    for (property, value) in &config.current {
        scheduler
            .surface_mut()
            .set_value(element, &property.style_name(), value.clone());
    }

    let animate = AnimateTarget::from(target);
    let initial = scheduler
        .initial_style(element, config.initial.as_ref(), &animate, None)
        .context("Failed to resolve initial style")?;
    for (name, value) in &initial {
        if name != "transform" {
            scheduler.surface_mut().set_value(element, name, value.as_str());
        }
    }

    let mut reports = Vec::new();
    scheduler
        .animate(element, animate)
        .with_context(|| format!("Failed to animate to \"{}\"", target))?;
    let started = scheduler.tick()?;
    info!(started, target, "Planned motions");
    reports.extend(collect_reports(&scheduler, element));

    if let Some(then) = then {
        scheduler.surface_mut().advance(after);
        scheduler
            .animate(element, then)
            .with_context(|| format!("Failed to animate to \"{}\"", then))?;
        let started = scheduler.tick()?;
        info!(started, target = then, at_ms = after, "Retargeted motions");
        reports.extend(collect_reports(&scheduler, element));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
    }
    Ok(())
}
