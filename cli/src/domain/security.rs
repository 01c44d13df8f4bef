//! Security boundary: the allow-list guarding the shared file system.

use efs_stack_common::{Ipv4Cidr, SecurityProfile};
use serde_json::{Map, Value, json};

use crate::domain::naming::ConstructPath;

/// NFS port used by EFS mount targets.
pub const EFS_PORT: u16 = 2049;

/// Placeholder egress rule emitted when a group must allow no outbound
/// traffic; an empty egress list would make EC2 add allow-all.
const DISALLOW_ALL_EGRESS: (&str, &str, u16, u16) = ("255.255.255.255/32", "icmp", 252, 86);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Traffic source (inbound) or destination (outbound).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    AnyIpv4,
    Ipv4(Ipv4Cidr),
}

impl Peer {
    #[must_use]
    pub fn cidr(self) -> Ipv4Cidr {
        match self {
            Peer::AnyIpv4 => Ipv4Cidr::ANY,
            Peer::Ipv4(cidr) => cidr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Tcp(u16),
    AllTraffic,
}

impl Port {
    /// Whether TCP traffic to `port` matches this rule.
    #[must_use]
    pub fn covers_tcp(self, port: u16) -> bool {
        match self {
            Port::Tcp(p) => p == port,
            Port::AllTraffic => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub direction: Direction,
    pub peer: Peer,
    pub port: Port,
    pub description: String,
}

impl Rule {
    /// CloudFormation `SecurityGroupIngress`/`SecurityGroupEgress` entry.
    #[must_use]
    pub fn to_cfn(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("CidrIp".into(), json!(self.peer.cidr().to_string()));
        entry.insert("Description".into(), json!(self.description));
        match self.port {
            Port::Tcp(p) => {
                entry.insert("FromPort".into(), json!(p));
                entry.insert("IpProtocol".into(), json!("tcp"));
                entry.insert("ToPort".into(), json!(p));
            }
            Port::AllTraffic => {
                entry.insert("IpProtocol".into(), json!("-1"));
            }
        }
        Value::Object(entry)
    }
}

/// The file system's security group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityBoundary {
    pub path: ConstructPath,
    pub rules: Vec<Rule>,
}

impl SecurityBoundary {
    /// Build the rule set for `profile`.
    ///
    /// `Open` admits the mount port from anywhere and all outbound traffic.
    /// `Restricted` admits the mount port from `vpc_cidr` only and nothing
    /// outbound.
    #[must_use]
    pub fn for_profile(profile: SecurityProfile, vpc_cidr: Ipv4Cidr) -> Self {
        let rules = match profile {
            SecurityProfile::Open => vec![
                Rule {
                    direction: Direction::Inbound,
                    peer: Peer::AnyIpv4,
                    port: Port::Tcp(EFS_PORT),
                    description: format!("Allow inbound traffic on port {EFS_PORT}"),
                },
                Rule {
                    direction: Direction::Outbound,
                    peer: Peer::AnyIpv4,
                    port: Port::AllTraffic,
                    description: "Allow all outbound traffic".to_string(),
                },
            ],
            SecurityProfile::Restricted => vec![Rule {
                direction: Direction::Inbound,
                peer: Peer::Ipv4(vpc_cidr),
                port: Port::Tcp(EFS_PORT),
                description: format!("Allow NFS on port {EFS_PORT} from within the VPC"),
            }],
        };
        Self {
            path: ConstructPath::new(&["FileSystemSecurityGroup"]),
            rules,
        }
    }

    pub fn ingress(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(|r| r.direction == Direction::Inbound)
    }

    pub fn egress(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(|r| r.direction == Direction::Outbound)
    }

    /// Whether every address in `source` may reach TCP `port`.
    #[must_use]
    pub fn admits_tcp(&self, source: &Ipv4Cidr, port: u16) -> bool {
        self.ingress()
            .any(|r| r.port.covers_tcp(port) && r.peer.cidr().contains(source))
    }

    #[must_use]
    pub fn allows_all_outbound(&self) -> bool {
        self.egress()
            .any(|r| r.peer == Peer::AnyIpv4 && r.port == Port::AllTraffic)
    }

    /// `SecurityGroupEgress` entries, with the disallow-all placeholder when
    /// no outbound rule is declared.
    #[must_use]
    pub fn egress_cfn(&self) -> Vec<Value> {
        let rules: Vec<Value> = self.egress().map(Rule::to_cfn).collect();
        if !rules.is_empty() {
            return rules;
        }
        let (cidr, protocol, from, to) = DISALLOW_ALL_EGRESS;
        vec![json!({
            "CidrIp": cidr,
            "Description": "Disallow all traffic",
            "FromPort": from,
            "IpProtocol": protocol,
            "ToPort": to,
        })]
    }

    #[must_use]
    pub fn ingress_cfn(&self) -> Vec<Value> {
        self.ingress().map(Rule::to_cfn).collect()
    }
}
