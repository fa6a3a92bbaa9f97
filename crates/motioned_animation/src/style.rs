//! Initial inline styles
//!
//! Before the first tick an element is rendered with the first keyframe of
//! every property so it does not flash its unanimated style.

use crate::options::{AnimateTarget, Target, Variants};
use crate::variants::match_against_variants;
use motioned_core::{transform_template, Result};
use serde::{Deserialize, Serialize};

/// Where an element's first frame comes from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Initial {
    /// `false`: start from the `animate` target itself
    Disabled(bool),
    Target(AnimateTarget),
}

impl Initial {
    pub fn disabled() -> Self {
        Initial::Disabled(false)
    }
}

impl From<AnimateTarget> for Initial {
    fn from(target: AnimateTarget) -> Self {
        Initial::Target(target)
    }
}

/// Inline style declarations for an element's first frame.
///
/// Uses `initial` when given, or the `animate` target when `initial` is
/// disabled. Every property contributes its first non-null keyframe,
/// rendered under its style name; transitions are ignored. With no initial
/// style at all only the transform template is emitted.
pub fn initial_style(
    variants: Option<&Variants>,
    initial: Option<&Initial>,
    animate: &AnimateTarget,
    extra_transform: Option<&str>,
) -> Result<Vec<(String, String)>> {
    let source = match initial {
        None => None,
        Some(Initial::Disabled(_)) => Some(animate),
        Some(Initial::Target(target)) => Some(target),
    };

    let mut declarations = Vec::new();
    if let Some(source) = source {
        let options = match_against_variants(variants, source)?;
        for (property, target) in &options.properties {
            let first = match target {
                Target::Value(value) => Some(value),
                Target::Keyframes(list) => list.iter().flatten().next(),
            };
            if let Some(value) = first {
                declarations.push((property.style_name(), value.to_css(property)));
            }
        }
    }
    declarations.push(("transform".to_string(), transform_template(extra_transform)));
    Ok(declarations)
}
