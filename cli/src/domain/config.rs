//! Domain types and validators for stack configuration.
//!
//! Pure functions only — no I/O, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use efs_stack_common::{Ipv4Cidr, SecurityProfile};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, TopologyError};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "stack.name",
    "network.cidr",
    "network.max_azs",
    "network.subnet_mask",
    "instance.type",
    "security.profile",
];

pub const DEFAULT_STACK_NAME: &str = "EfsStack";
pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";
pub const DEFAULT_MAX_AZS: u8 = 2;
pub const DEFAULT_SUBNET_MASK: u8 = 24;
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";

/// Availability zone counts the synthesized network supports.
pub const MAX_AZS_RANGE: std::ops::RangeInclusive<u8> = 1..=3;
/// Prefix lengths AWS accepts for both VPC and subnet blocks.
pub const PREFIX_RANGE: std::ops::RangeInclusive<u8> = 16..=28;

pub static STACK_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z][A-Za-z0-9-]{0,127}$").expect("valid regex")
});

pub static INSTANCE_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z][a-z0-9-]*\.[a-z0-9]+$").expect("valid regex")
});

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.efs-stack/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StackConfig {
    pub stack: StackSettings,
    pub network: NetworkSettings,
    pub instance: InstanceSettings,
    pub security: SecuritySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StackSettings {
    /// Stack name; prefixes every `Name` tag.
    pub name: String,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_STACK_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
    /// VPC address space.
    pub cidr: Ipv4Cidr,
    /// Number of availability zones to spread subnets over.
    pub max_azs: u8,
    /// Prefix length of every subnet.
    pub subnet_mask: u8,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            cidr: default_vpc_cidr(),
            max_azs: DEFAULT_MAX_AZS,
            subnet_mask: DEFAULT_SUBNET_MASK,
        }
    }
}

#[allow(clippy::unwrap_used)] // constant input
fn default_vpc_cidr() -> Ipv4Cidr {
    DEFAULT_VPC_CIDR.parse().unwrap()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstanceSettings {
    /// EC2 size class shared by both instances.
    #[serde(rename = "type")]
    pub instance_type: String,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SecuritySettings {
    pub profile: SecurityProfile,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: valid.to_string(),
        }
        .into()
    };

    match key {
        "stack.name" if !STACK_NAME_RE.is_match(value) => {
            Err(invalid("a letter followed by up to 127 letters, digits, or '-'"))
        }
        "network.cidr" => match value.parse::<Ipv4Cidr>() {
            Ok(cidr) if PREFIX_RANGE.contains(&cidr.prefix()) => Ok(()),
            _ => Err(invalid("an IPv4 network block from /16 to /28, e.g. 10.0.0.0/16")),
        },
        "network.max_azs" => match value.parse::<u8>() {
            Ok(n) if MAX_AZS_RANGE.contains(&n) => Ok(()),
            _ => Err(invalid("1-3")),
        },
        "network.subnet_mask" => match value.parse::<u8>() {
            Ok(n) if PREFIX_RANGE.contains(&n) => Ok(()),
            _ => Err(invalid("16-28")),
        },
        "instance.type" if !INSTANCE_TYPE_RE.is_match(value) => {
            Err(invalid("<family>.<size>, e.g. t2.micro"))
        }
        "security.profile" if value.parse::<SecurityProfile>().is_err() => {
            Err(invalid(&SecurityProfile::VALUES.join(", ")))
        }
        _ => Ok(()),
    }
}

/// Apply a validated `key = value` pair to `config`.
///
/// # Errors
///
/// Returns an error if the key or value is invalid.
pub fn apply_config_value(config: &mut StackConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "stack.name" => config.stack.name = value.to_string(),
        "network.cidr" => config.network.cidr = value.parse()?,
        "network.max_azs" => config.network.max_azs = value.parse()?,
        "network.subnet_mask" => config.network.subnet_mask = value.parse()?,
        "instance.type" => config.instance.instance_type = value.to_string(),
        "security.profile" => {
            config.security.profile = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

/// Check every value of a loaded config, not just the ones set via the CLI.
///
/// # Errors
///
/// Returns the first structural problem found.
pub fn validate_stack_config(config: &StackConfig) -> Result<(), TopologyError> {
    if !STACK_NAME_RE.is_match(&config.stack.name) {
        return Err(TopologyError::InvalidStackName(config.stack.name.clone()));
    }
    if !INSTANCE_TYPE_RE.is_match(&config.instance.instance_type) {
        return Err(TopologyError::InvalidInstanceType(
            config.instance.instance_type.clone(),
        ));
    }
    let net = &config.network;
    if !PREFIX_RANGE.contains(&net.cidr.prefix()) {
        return Err(TopologyError::NetworkPrefixOutOfRange {
            cidr: net.cidr.to_string(),
        });
    }
    if !PREFIX_RANGE.contains(&net.subnet_mask) || net.subnet_mask <= net.cidr.prefix() {
        return Err(TopologyError::SubnetMaskOutOfRange {
            mask: net.subnet_mask,
            network_prefix: net.cidr.prefix(),
        });
    }
    if !MAX_AZS_RANGE.contains(&net.max_azs) {
        return Err(TopologyError::MaxAzsOutOfRange(net.max_azs));
    }
    Ok(())
}

/// `(key, value)` pairs in whitelist order, for display.
#[must_use]
pub fn config_entries(config: &StackConfig) -> Vec<(&'static str, String)> {
    vec![
        ("stack.name", config.stack.name.clone()),
        ("network.cidr", config.network.cidr.to_string()),
        ("network.max_azs", config.network.max_azs.to_string()),
        ("network.subnet_mask", config.network.subnet_mask.to_string()),
        ("instance.type", config.instance.instance_type.clone()),
        ("security.profile", config.security.profile.to_string()),
    ]
}

// ── Unit tests ───────────────────────────────────────────────────────────────
