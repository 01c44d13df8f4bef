//! Virtual network: address space and its subnet partition.

use efs_stack_common::{Ipv4Cidr, SubnetClass};

use crate::domain::config::NetworkSettings;
use crate::domain::error::TopologyError;
use crate::domain::naming::ConstructPath;

/// One subnet of one class in one availability zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub class: SubnetClass,
    /// Zero-based AZ index, resolved at apply time.
    pub az_index: usize,
    pub cidr: Ipv4Cidr,
    pub path: ConstructPath,
}

/// The VPC declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub path: ConstructPath,
    pub cidr: Ipv4Cidr,
    pub max_azs: u8,
    pub subnets: Vec<Subnet>,
}

impl Network {
    /// Partition `settings.cidr` into one `/subnet_mask` block per class per AZ.
    ///
    /// Blocks are handed out from the start of the address space, all public
    /// subnets first.
    ///
    /// # Errors
    ///
    /// Returns `AddressSpaceExhausted` if the blocks do not fit.
    pub fn define(settings: &NetworkSettings) -> Result<Self, TopologyError> {
        let path = ConstructPath::new(&["Vpc"]);
        let azs = usize::from(settings.max_azs);
        let needed = (SubnetClass::ALL.len() * azs) as u64;
        if needed > settings.cidr.subnet_capacity(settings.subnet_mask) {
            return Err(TopologyError::AddressSpaceExhausted {
                cidr: settings.cidr.to_string(),
                needed,
                mask: settings.subnet_mask,
            });
        }

        let mut subnets = Vec::with_capacity(SubnetClass::ALL.len() * azs);
        for (class_idx, class) in SubnetClass::ALL.into_iter().enumerate() {
            for az_index in 0..azs {
                let index = (class_idx * azs + az_index) as u64;
                subnets.push(Subnet {
                    class,
                    az_index,
                    cidr: settings.cidr.subnet(settings.subnet_mask, index)?,
                    path: path.child(&format!("{}Subnet{}", class.group_name(), az_index + 1)),
                });
            }
        }

        tracing::debug!(
            cidr = %settings.cidr,
            subnets = subnets.len(),
            max_azs = settings.max_azs,
            "network partitioned"
        );

        Ok(Self {
            path,
            cidr: settings.cidr,
            max_azs: settings.max_azs,
            subnets,
        })
    }

    #[must_use]
    pub fn declares(&self, class: SubnetClass) -> bool {
        self.subnets.iter().any(|s| s.class == class)
    }

    pub fn subnets_of(&self, class: SubnetClass) -> impl Iterator<Item = &Subnet> {
        self.subnets.iter().filter(move |s| s.class == class)
    }

    /// Subnet an instance of `class` is launched into.
    #[must_use]
    pub fn placement_subnet(&self, class: SubnetClass) -> Option<&Subnet> {
        self.subnets_of(class).next()
    }

    /// Public subnet hosting the NAT gateway for `az_index`.
    #[must_use]
    pub fn nat_host(&self, az_index: usize) -> Option<&Subnet> {
        self.subnets_of(SubnetClass::Public)
            .find(|s| s.az_index == az_index)
    }
}
