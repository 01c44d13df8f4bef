use std::fmt;

use serde::{Deserialize, Serialize};

/// Partition of the network address space an instance can be placed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubnetClass {
    /// Externally reachable; default route to an internet gateway.
    Public,
    /// Private with outbound access through a NAT gateway.
    PrivateWithEgress,
}

impl SubnetClass {
    /// All classes in allocation order.
    pub const ALL: [SubnetClass; 2] = [SubnetClass::Public, SubnetClass::PrivateWithEgress];

    /// Construct-path name of the subnet group (`Public`, `Private`).
    #[must_use]
    pub fn group_name(self) -> &'static str {
        match self {
            SubnetClass::Public => "Public",
            SubnetClass::PrivateWithEgress => "Private",
        }
    }

    /// Whether instances launched here get a public IP by default.
    #[must_use]
    pub fn maps_public_ip(self) -> bool {
        matches!(self, SubnetClass::Public)
    }
}

impl fmt::Display for SubnetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubnetClass::Public => "public",
            SubnetClass::PrivateWithEgress => "private_with_egress",
        })
    }
}

/// What happens to a resource when the stack is torn down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    #[default]
    Destroy,
    Retain,
}

impl RemovalPolicy {
    /// CloudFormation `DeletionPolicy` / `UpdateReplacePolicy` value.
    #[must_use]
    pub fn cfn_value(self) -> &'static str {
        match self {
            RemovalPolicy::Destroy => "Delete",
            RemovalPolicy::Retain => "Retain",
        }
    }
}

/// Which rule set the security boundary and access policy are built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecurityProfile {
    /// Mount port open to the world, allow-all outbound, allow-all access policy.
    #[default]
    Open,
    /// Mount port open to the VPC only, no outbound, scoped TLS-only grant.
    Restricted,
}

impl SecurityProfile {
    pub const VALUES: &'static [&'static str] = &["open", "restricted"];
}

impl fmt::Display for SecurityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SecurityProfile::Open => "open",
            SecurityProfile::Restricted => "restricted",
        })
    }
}

impl std::str::FromStr for SecurityProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(SecurityProfile::Open),
            "restricted" => Ok(SecurityProfile::Restricted),
            other => Err(format!("unknown security profile '{other}'")),
        }
    }
}
