//! The topology definition: every declared entity and their references.
//!
//! Pure and deterministic. The same `StackConfig` always yields the same
//! `Topology`.

use efs_stack_common::{RemovalPolicy, SecurityProfile, SubnetClass};
use serde::Serialize;

use crate::domain::compute::ComputeInstance;
use crate::domain::config::{StackConfig, validate_stack_config};
use crate::domain::error::TopologyError;
use crate::domain::iam::ComputeIdentity;
use crate::domain::network::Network;
use crate::domain::security::{EFS_PORT, SecurityBoundary};
use crate::domain::storage::StorageResource;

/// Instance placements, in declaration order.
pub const INSTANCE_PLACEMENTS: [SubnetClass; 2] =
    [SubnetClass::PrivateWithEgress, SubnetClass::Public];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub stack_name: String,
    pub profile: SecurityProfile,
    pub network: Network,
    pub boundary: SecurityBoundary,
    pub storage: StorageResource,
    pub identity: ComputeIdentity,
    pub instances: Vec<ComputeInstance>,
}

/// Outcome of one structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl Check {
    fn new(name: &'static str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed,
            detail: detail.into(),
        }
    }
}

impl Topology {
    /// Build and validate the topology for `config`.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if any configured literal is structurally
    /// invalid or a check fails.
    pub fn define(config: &StackConfig) -> Result<Self, TopologyError> {
        let topology = Self::assemble(config)?;
        topology.ensure_valid()?;

        tracing::info!(
            stack = %topology.stack_name,
            profile = %topology.profile,
            instances = topology.instances.len(),
            "topology defined"
        );
        Ok(topology)
    }

    /// Build the entity graph without running the structural checks.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if a configured literal is invalid.
    pub fn assemble(config: &StackConfig) -> Result<Self, TopologyError> {
        validate_stack_config(config)?;

        let profile = config.security.profile;
        let network = Network::define(&config.network)?;
        let boundary = SecurityBoundary::for_profile(profile, network.cidr);
        let identity = ComputeIdentity::for_ec2();
        let storage = StorageResource::define(profile, &network, &boundary.path, &identity);
        let instances = INSTANCE_PLACEMENTS
            .into_iter()
            .map(|class| {
                ComputeInstance::define(class, &config.instance.instance_type, &identity.path)
            })
            .collect();

        Ok(Self {
            stack_name: config.stack.name.clone(),
            profile,
            network,
            boundary,
            storage,
            identity,
            instances,
        })
    }

    /// Run every structural check.
    #[must_use]
    pub fn validate(&self) -> Vec<Check> {
        vec![
            self.check_instance_placement(),
            self.check_mount_port_reachable(),
            self.check_storage_isolation(),
            self.check_shared_identity(),
            self.check_removal_policy(),
            self.check_access_policy(),
            self.check_address_space(),
        ]
    }

    /// # Errors
    ///
    /// Returns the first failing check as a `TopologyError`.
    pub fn ensure_valid(&self) -> Result<(), TopologyError> {
        for instance in &self.instances {
            if !self.network.declares(instance.subnet_class) {
                return Err(TopologyError::UnknownSubnetClass {
                    instance: instance.path.to_string(),
                    class: instance.subnet_class,
                });
            }
            for subnet in self.network.subnets_of(instance.subnet_class) {
                if !self.boundary.admits_tcp(&subnet.cidr, EFS_PORT) {
                    return Err(TopologyError::MountPortUnreachable {
                        instance: instance.path.to_string(),
                        subnet: subnet.cidr.to_string(),
                        port: EFS_PORT,
                    });
                }
            }
        }
        match self.validate().into_iter().find(|c| !c.passed) {
            Some(failed) => Err(TopologyError::CheckFailed {
                check: failed.name.to_string(),
                detail: failed.detail,
            }),
            None => Ok(()),
        }
    }

    fn check_instance_placement(&self) -> Check {
        let stray: Vec<_> = self
            .instances
            .iter()
            .filter(|i| !self.network.declares(i.subnet_class))
            .map(|i| i.path.to_string())
            .collect();
        if stray.is_empty() {
            Check::new(
                "instance-placement",
                true,
                "every instance binds to a declared subnet class",
            )
        } else {
            Check::new(
                "instance-placement",
                false,
                format!("undeclared subnet class for: {}", stray.join(", ")),
            )
        }
    }

    fn check_mount_port_reachable(&self) -> Check {
        let unreachable: Vec<_> = self
            .instances
            .iter()
            .flat_map(|i| self.network.subnets_of(i.subnet_class))
            .filter(|s| !self.boundary.admits_tcp(&s.cidr, EFS_PORT))
            .map(|s| s.cidr.to_string())
            .collect();
        if unreachable.is_empty() {
            Check::new(
                "mount-port-reachable",
                true,
                format!("TCP {EFS_PORT} admitted from every instance subnet"),
            )
        } else {
            Check::new(
                "mount-port-reachable",
                false,
                format!("TCP {EFS_PORT} not admitted from {}", unreachable.join(", ")),
            )
        }
    }

    fn check_storage_isolation(&self) -> Check {
        let isolated = !self.storage.mount_targets.is_empty()
            && self
                .storage
                .mount_targets
                .iter()
                .all(|m| m.security_groups == [self.boundary.path.clone()]);
        Check::new(
            "storage-isolation",
            isolated,
            if isolated {
                format!("mount targets guarded only by {}", self.boundary.path)
            } else {
                format!("a mount target is missing or not guarded only by {}", self.boundary.path)
            },
        )
    }

    fn check_shared_identity(&self) -> Check {
        let shared = self
            .instances
            .iter()
            .all(|i| i.identity == self.identity.path);
        Check::new(
            "shared-identity",
            shared,
            if shared {
                format!("all instances assume {}", self.identity.path)
            } else {
                "instances do not share one identity".to_string()
            },
        )
    }

    fn check_removal_policy(&self) -> Check {
        let destroy = self.storage.removal_policy == RemovalPolicy::Destroy;
        Check::new(
            "removal-policy",
            destroy,
            if destroy {
                "file system is destroyed on teardown"
            } else {
                "file system would be retained on teardown"
            },
        )
    }

    fn check_access_policy(&self) -> Check {
        let n = self.storage.access_policy.statements.len();
        Check::new(
            "access-policy",
            n > 0,
            format!("{n} statement(s) in file system policy"),
        )
    }

    fn check_address_space(&self) -> Check {
        let subnets = &self.network.subnets;
        let inside = subnets.iter().all(|s| self.network.cidr.contains(&s.cidr));
        let disjoint = subnets.iter().enumerate().all(|(i, a)| {
            subnets[i + 1..].iter().all(|b| !a.cidr.overlaps(&b.cidr))
        });
        Check::new(
            "address-space",
            inside && disjoint,
            match (inside, disjoint) {
                (true, true) => format!(
                    "{} subnets inside {} without overlap",
                    subnets.len(),
                    self.network.cidr
                ),
                (false, _) => format!("a subnet lies outside {}", self.network.cidr),
                (true, false) => "subnets overlap".to_string(),
            },
        )
    }
}
