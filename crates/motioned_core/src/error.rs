//! Engine error types

use thiserror::Error;

/// Errors reported by the animation engine.
///
/// Every variant is a configuration or caller bug, so none of them are
/// retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A variant name was given but no variants table exists
    #[error("Variants not defined")]
    VariantsUndefined,

    /// The variant name is not in the table
    #[error("Variant \"{0}\" not found")]
    VariantNotFound(String),

    /// An easing could not be built from its definition
    #[error("Invalid easing definition: {0}")]
    InvalidEasingDefinition(String),

    /// A style value has no leading number where one is required
    #[error("Could not parse a number from style value \"{0}\"")]
    ValueParse(String),

    /// The element was never registered or has been destroyed
    #[error("Element not registered")]
    ElementNotFound,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, MotionError>;
