//! Variant lookup

use crate::options::{AnimateOptions, AnimateTarget, Variants};
use motioned_core::{MotionError, Result};

/// Resolve `target` to concrete options.
///
/// A variant name is looked up in `variants`; concrete options are returned
/// as given. States are never merged with each other.
pub fn match_against_variants<'a>(
    variants: Option<&'a Variants>,
    target: &'a AnimateTarget,
) -> Result<&'a AnimateOptions> {
    match target {
        AnimateTarget::Options(options) => Ok(options),
        AnimateTarget::Variant(name) => variants
            .ok_or(MotionError::VariantsUndefined)?
            .get(name)
            .ok_or_else(|| MotionError::VariantNotFound(name.clone())),
    }
}
