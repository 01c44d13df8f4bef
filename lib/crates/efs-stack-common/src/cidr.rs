//! IPv4 CIDR blocks.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing or splitting a CIDR block.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CidrError {
    #[error("invalid CIDR '{0}': expected <a.b.c.d>/<prefix>")]
    Malformed(String),

    #[error("invalid CIDR '{0}': prefix length must be 0-32")]
    PrefixOutOfRange(String),

    #[error("invalid CIDR '{input}': host bits set (did you mean {canonical}?)")]
    HostBitsSet { input: String, canonical: String },

    #[error("cannot split {block} into /{prefix} subnets")]
    InvalidSplit { block: String, prefix: u8 },
}

/// An IPv4 network block such as `10.0.0.0/16`.
///
/// The address is always the network address: host bits are rejected at
/// parse time rather than silently masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Cidr {
    network: u32,
    prefix: u8,
}

impl Ipv4Cidr {
    /// The whole IPv4 address space, `0.0.0.0/0`.
    pub const ANY: Self = Self {
        network: 0,
        prefix: 0,
    };

    /// Build a block from a network address and prefix length.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, CidrError> {
        let input = format!("{addr}/{prefix}");
        if prefix > 32 {
            return Err(CidrError::PrefixOutOfRange(input));
        }
        let raw = u32::from(addr);
        let network = raw & mask(prefix);
        if network != raw {
            return Err(CidrError::HostBitsSet {
                input,
                canonical: format!("{}/{prefix}", Ipv4Addr::from(network)),
            });
        }
        Ok(Self { network, prefix })
    }

    #[must_use]
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    #[must_use]
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Last address covered by the block.
    #[must_use]
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network | !mask(self.prefix))
    }

    /// Returns `true` if `other` lies entirely within this block.
    #[must_use]
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix >= self.prefix && (other.network & mask(self.prefix)) == self.network
    }

    #[must_use]
    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Number of `/prefix` subnets this block can be split into.
    ///
    /// Returns 0 when `prefix` is shorter than the block's own prefix.
    #[must_use]
    pub fn subnet_capacity(&self, prefix: u8) -> u64 {
        if prefix < self.prefix || prefix > 32 {
            return 0;
        }
        1u64 << (prefix - self.prefix)
    }

    /// The `index`-th `/prefix` subnet of this block, counting from the
    /// start of the address space.
    pub fn subnet(&self, prefix: u8, index: u64) -> Result<Ipv4Cidr, CidrError> {
        if index >= self.subnet_capacity(prefix) {
            return Err(CidrError::InvalidSplit {
                block: self.to_string(),
                prefix,
            });
        }
        let step = 1u64 << (32 - u32::from(prefix));
        let offset = u32::try_from(index * step).map_err(|_| CidrError::InvalidSplit {
            block: self.to_string(),
            prefix,
        })?;
        Ok(Self {
            network: self.network + offset,
            prefix,
        })
    }
}

fn mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| CidrError::Malformed(s.to_string()))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| CidrError::Malformed(s.to_string()))?;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(CidrError::Malformed(s.to_string()));
        }
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| CidrError::PrefixOutOfRange(s.to_string()))?;
        if prefix > 32 {
            return Err(CidrError::PrefixOutOfRange(s.to_string()));
        }
        Self::new(addr, prefix).map_err(|e| match e {
            CidrError::HostBitsSet { canonical, .. } => CidrError::HostBitsSet {
                input: s.to_string(),
                canonical,
            },
            other => other,
        })
    }
}

impl Serialize for Ipv4Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Cidr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
