//! Command implementations

pub mod config;
pub mod plan;
pub mod synth;
pub mod validate;
pub mod version;
