//! IAM building blocks: principals, policy documents, and the compute identity.

use efs_stack_common::intrinsic;
use serde_json::{Map, Value, json};

use crate::domain::naming::ConstructPath;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const EC2_SERVICE: &str = "ec2.amazonaws.com";
pub const SSM_MANAGED_POLICY: &str = "AmazonSSMManagedInstanceCore";

/// Actions an NFS client needs to mount and write.
pub const CLIENT_MOUNT_ACTIONS: &[&str] = &[
    "elasticfilesystem:ClientMount",
    "elasticfilesystem:ClientWrite",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Any AWS principal (`{"AWS": "*"}`).
    Any,
    /// An AWS service, e.g. `ec2.amazonaws.com`.
    Service(String),
    /// An IAM role declared in the same topology, by logical id.
    Role(String),
}

impl Principal {
    fn to_cfn(&self) -> (&'static str, Value) {
        match self {
            Principal::Any => ("AWS", json!("*")),
            Principal::Service(name) => ("Service", json!(name)),
            Principal::Role(id) => ("AWS", intrinsic::get_att(id, "Arn")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    fn as_str(self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// A single condition, e.g. `Bool: { aws:SecureTransport: "true" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub operator: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub principals: Vec<Principal>,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
    pub conditions: Vec<Condition>,
}

impl PolicyStatement {
    /// Allow, any principal, every action, every resource.
    #[must_use]
    pub fn is_allow_all(&self) -> bool {
        self.effect == Effect::Allow
            && self.principals == [Principal::Any]
            && self.actions == ["*"]
            && self.resources == ["*"]
            && self.conditions.is_empty()
    }

    #[must_use]
    pub fn to_cfn(&self) -> Value {
        let mut stmt = Map::new();
        stmt.insert("Action".into(), one_or_many(&self.actions));
        if !self.conditions.is_empty() {
            let mut by_op: Map<String, Value> = Map::new();
            for c in &self.conditions {
                let entry = by_op
                    .entry(c.operator.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(keys) = entry {
                    keys.insert(c.key.clone(), json!(c.value));
                }
            }
            stmt.insert("Condition".into(), Value::Object(by_op));
        }
        stmt.insert("Effect".into(), json!(self.effect.as_str()));
        if !self.principals.is_empty() {
            let mut principal: Map<String, Value> = Map::new();
            for p in &self.principals {
                let (kind, value) = p.to_cfn();
                principal.insert(kind.to_string(), value);
            }
            stmt.insert("Principal".into(), Value::Object(principal));
        }
        if !self.resources.is_empty() {
            stmt.insert("Resource".into(), one_or_many(&self.resources));
        }
        Value::Object(stmt)
    }
}

fn one_or_many(items: &[String]) -> Value {
    match items {
        [single] => json!(single),
        many => json!(many),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyDocument {
    pub statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    #[must_use]
    pub fn to_cfn(&self) -> Value {
        json!({
            "Statement": self.statements.iter().map(PolicyStatement::to_cfn).collect::<Vec<_>>(),
            "Version": POLICY_VERSION,
        })
    }
}

/// Role assumed by both compute instances, plus the instance profile that
/// binds it to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeIdentity {
    pub path: ConstructPath,
    pub profile_path: ConstructPath,
    /// Service allowed to assume the role.
    pub assumed_by: String,
    /// AWS-managed policy names attached to the role.
    pub managed_policies: Vec<String>,
}

impl ComputeIdentity {
    /// EC2-assumable role with SSM core access.
    #[must_use]
    pub fn for_ec2() -> Self {
        let path = ConstructPath::new(&["InstanceRole"]);
        Self {
            profile_path: path.child("InstanceProfile"),
            path,
            assumed_by: EC2_SERVICE.to_string(),
            managed_policies: vec![SSM_MANAGED_POLICY.to_string()],
        }
    }

    #[must_use]
    pub fn logical_id(&self) -> String {
        self.path.logical_id()
    }

    #[must_use]
    pub fn profile_logical_id(&self) -> String {
        self.profile_path.logical_id()
    }

    #[must_use]
    pub fn trust_policy(&self) -> PolicyDocument {
        PolicyDocument {
            statements: vec![PolicyStatement {
                effect: Effect::Allow,
                principals: vec![Principal::Service(self.assumed_by.clone())],
                actions: vec!["sts:AssumeRole".to_string()],
                resources: Vec::new(),
                conditions: Vec::new(),
            }],
        }
    }
}
