//! The shared network file system and its access policy.

use efs_stack_common::{RemovalPolicy, SecurityProfile, SubnetClass};

use crate::domain::iam::{
    CLIENT_MOUNT_ACTIONS, ComputeIdentity, Condition, Effect, PolicyDocument, PolicyStatement,
    Principal,
};
use crate::domain::naming::ConstructPath;
use crate::domain::network::Network;

/// Subnet class mount targets are placed in.
pub const MOUNT_TARGET_CLASS: SubnetClass = SubnetClass::PrivateWithEgress;

/// One NFS endpoint of the file system inside a subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountTarget {
    pub path: ConstructPath,
    /// Subnet the endpoint lives in.
    pub subnet: ConstructPath,
    /// Security groups attached to the endpoint.
    pub security_groups: Vec<ConstructPath>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageResource {
    pub path: ConstructPath,
    pub encrypted: bool,
    pub removal_policy: RemovalPolicy,
    pub access_policy: PolicyDocument,
    pub mount_targets: Vec<MountTarget>,
}

impl StorageResource {
    /// Declare the file system with one mount target per private subnet, each
    /// guarded only by `boundary`.
    #[must_use]
    pub fn define(
        profile: SecurityProfile,
        network: &Network,
        boundary: &ConstructPath,
        identity: &ComputeIdentity,
    ) -> Self {
        let path = ConstructPath::new(&["EfsFileSystem"]);
        let mount_targets = network
            .subnets_of(MOUNT_TARGET_CLASS)
            .enumerate()
            .map(|(i, subnet)| MountTarget {
                path: path.child(&format!("EfsMountTarget{}", i + 1)),
                subnet: subnet.path.clone(),
                security_groups: vec![boundary.clone()],
            })
            .collect();

        Self {
            path,
            encrypted: true,
            removal_policy: RemovalPolicy::Destroy,
            access_policy: access_policy(profile, identity),
            mount_targets,
        }
    }

    #[must_use]
    pub fn logical_id(&self) -> String {
        self.path.logical_id()
    }
}

fn access_policy(profile: SecurityProfile, identity: &ComputeIdentity) -> PolicyDocument {
    let statement = match profile {
        SecurityProfile::Open => PolicyStatement {
            effect: Effect::Allow,
            principals: vec![Principal::Any],
            actions: vec!["*".to_string()],
            resources: vec!["*".to_string()],
            conditions: Vec::new(),
        },
        SecurityProfile::Restricted => PolicyStatement {
            effect: Effect::Allow,
            principals: vec![Principal::Role(identity.logical_id())],
            actions: CLIENT_MOUNT_ACTIONS.iter().map(|a| (*a).to_string()).collect(),
            resources: vec!["*".to_string()],
            conditions: vec![Condition {
                operator: "Bool".to_string(),
                key: "aws:SecureTransport".to_string(),
                value: "true".to_string(),
            }],
        },
    };
    PolicyDocument {
        statements: vec![statement],
    }
}
