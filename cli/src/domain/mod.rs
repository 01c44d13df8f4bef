//! Domain layer — pure topology types, validation, synthesis, and ordering.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod assembly;
pub mod compute;
pub mod config;
pub mod error;
pub mod graph;
pub mod iam;
pub mod naming;
pub mod network;
pub mod security;
pub mod storage;
pub mod synth;
pub mod topology;

pub use config::{StackConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, TopologyError};
pub use graph::{Plan, apply_order};
pub use synth::{EntityCounts, synthesize};
pub use topology::{Check, Topology};
