//! motioned core types
//!
//! Shared vocabulary for the motioned animation engine:
//!
//! - **Style Values**: raw property values as numbers or CSS strings
//! - **Property Names**: animatable property names and their style mapping
//! - **Errors**: the configuration errors every engine layer reports
//!
//! # Example
//!
//! ```rust
//! use motioned_core::{PropertyName, StyleValue};
//!
//! let width = PropertyName::new("width");
//! assert_eq!(StyleValue::from(10.0).to_css(&width), "10px");
//! assert_eq!(StyleValue::from("10px").leading_number().unwrap(), 10.0);
//! ```

pub mod error;
pub mod property;
pub mod value;

pub use error::{MotionError, Result};
pub use property::{
    kebabize, transform_template, CustomProperty, PropertyName, CUSTOM_PROPERTIES,
    TRANSFORM_TEMPLATE,
};
pub use value::StyleValue;
