pub mod plan;
pub mod properties;
pub mod spring;
