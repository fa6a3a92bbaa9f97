//! Custom property registration runs once per process
//!
//! Kept in its own test binary because the registration flag is global.

use motioned_animation::{is_registered, register_custom_properties, HeadlessSurface, PropertyRegistry};
use motioned_core::{CustomProperty, CUSTOM_PROPERTIES};

/// Registry that rejects properties it has already seen
#[derive(Default)]
struct StrictRegistry {
    seen: Vec<&'static str>,
    rejected: usize,
}

impl PropertyRegistry for StrictRegistry {
    type Error = String;

    fn register_property(&mut self, property: &CustomProperty) -> Result<(), String> {
        if property.name == "--y" || self.seen.contains(&property.name) {
            self.rejected += 1;
            return Err(format!("{} is already defined", property.name));
        }
        self.seen.push(property.name);
        Ok(())
    }
}

#[test]
fn test_registration_happens_once_and_ignores_failures() {
    assert!(!is_registered());

    let mut registry = StrictRegistry::default();
    assert!(register_custom_properties(&mut registry));
    assert!(is_registered());

    // A rejected property does not stop the others
    assert_eq!(registry.rejected, 1);
    assert_eq!(registry.seen.len(), CUSTOM_PROPERTIES.len() - 1);
    assert!(registry.seen.contains(&"--rotate-z"));

    // Later calls are no-ops, whatever the registry
    let mut surface = HeadlessSurface::new();
    assert!(!register_custom_properties(&mut surface));
    assert!(surface.registered_rules().is_empty());
    assert!(!register_custom_properties(&mut registry));
    assert_eq!(registry.rejected, 1);
}
