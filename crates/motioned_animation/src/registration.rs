//! One-time custom property registration
//!
//! Transform shorthands animate CSS custom properties, which only
//! interpolate once they have a registered syntax. The composing
//! application calls [`register_custom_properties`] once at startup.

use motioned_core::{CustomProperty, CUSTOM_PROPERTIES};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Registry of typed custom properties
pub trait PropertyRegistry {
    type Error: Display;

    fn register_property(&mut self, property: &CustomProperty) -> Result<(), Self::Error>;
}

/// Register the transform custom properties with `registry`.
///
/// Only the first call in the process registers anything; it returns
/// `true`, later calls return `false`. A failed registration (typically a
/// property the host already defined) is logged and skipped.
pub fn register_custom_properties<R: PropertyRegistry + ?Sized>(registry: &mut R) -> bool {
    if REGISTERED.swap(true, Ordering::SeqCst) {
        return false;
    }

    for property in CUSTOM_PROPERTIES {
        match registry.register_property(property) {
            Ok(()) => debug!(name = property.name, "Registered custom property"),
            Err(err) => warn!(name = property.name, %err, "Custom property registration failed"),
        }
    }
    true
}

/// Whether [`register_custom_properties`] has run
pub fn is_registered() -> bool {
    REGISTERED.load(Ordering::SeqCst)
}
