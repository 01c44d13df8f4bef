//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use efs_stack_common::{CidrError, SubnetClass, TemplateError};
use thiserror::Error;

// ── Topology errors ───────────────────────────────────────────────────────────

/// Structural errors raised while defining, validating, or ordering a topology.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error(transparent)]
    Cidr(#[from] CidrError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Invalid stack name '{0}': must match ^[A-Za-z][A-Za-z0-9-]{{0,127}}$")]
    InvalidStackName(String),

    #[error("Invalid instance type '{0}': expected <family>.<size>, e.g. t2.micro")]
    InvalidInstanceType(String),

    #[error("Network block {cidr} must have a prefix between /16 and /28")]
    NetworkPrefixOutOfRange { cidr: String },

    #[error("Subnet mask /{mask} must be between /16 and /28 and longer than the network prefix /{network_prefix}")]
    SubnetMaskOutOfRange { mask: u8, network_prefix: u8 },

    #[error("Availability zone count {0} out of range (1-3)")]
    MaxAzsOutOfRange(u8),

    #[error("Address space {cidr} cannot hold {needed} /{mask} subnets")]
    AddressSpaceExhausted { cidr: String, needed: u64, mask: u8 },

    #[error("Instance '{instance}' is placed in subnet class '{class}' which the network does not declare")]
    UnknownSubnetClass { instance: String, class: SubnetClass },

    #[error("Mount port {port} is not reachable from {subnet} (instance '{instance}')")]
    MountPortUnreachable {
        instance: String,
        subnet: String,
        port: u16,
    },

    #[error("Private subnet '{subnet}' has no NAT gateway to route through")]
    MissingNatGateway { subnet: String },

    #[error("Check '{check}' failed: {detail}")]
    CheckFailed { check: String, detail: String },

    #[error("Dependency cycle between resources: {0}")]
    DependencyCycle(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
