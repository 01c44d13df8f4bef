//! Translate a `Topology` into a CloudFormation template.

use efs_stack_common::intrinsic::{self, availability_zone, get_att, reference};
use efs_stack_common::{Output, Parameter, Resource, SubnetClass, Template};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::compute::ComputeInstance;
use crate::domain::error::TopologyError;
use crate::domain::naming::ConstructPath;
use crate::domain::network::{Network, Subnet};
use crate::domain::topology::Topology;

pub mod types {
    pub const VPC: &str = "AWS::EC2::VPC";
    pub const SUBNET: &str = "AWS::EC2::Subnet";
    pub const ROUTE_TABLE: &str = "AWS::EC2::RouteTable";
    pub const ROUTE_TABLE_ASSOCIATION: &str = "AWS::EC2::SubnetRouteTableAssociation";
    pub const ROUTE: &str = "AWS::EC2::Route";
    pub const EIP: &str = "AWS::EC2::EIP";
    pub const NAT_GATEWAY: &str = "AWS::EC2::NatGateway";
    pub const INTERNET_GATEWAY: &str = "AWS::EC2::InternetGateway";
    pub const GATEWAY_ATTACHMENT: &str = "AWS::EC2::VPCGatewayAttachment";
    pub const SECURITY_GROUP: &str = "AWS::EC2::SecurityGroup";
    pub const FILE_SYSTEM: &str = "AWS::EFS::FileSystem";
    pub const MOUNT_TARGET: &str = "AWS::EFS::MountTarget";
    pub const ROLE: &str = "AWS::IAM::Role";
    pub const INSTANCE_PROFILE: &str = "AWS::IAM::InstanceProfile";
    pub const INSTANCE: &str = "AWS::EC2::Instance";
}

/// Number of declared entities per kind, as counted in a rendered template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub networks: usize,
    pub security_groups: usize,
    pub file_systems: usize,
    pub roles: usize,
    pub instances: usize,
}

impl EntityCounts {
    #[must_use]
    pub fn of(template: &Template) -> Self {
        Self {
            networks: template.count_of(types::VPC),
            security_groups: template.count_of(types::SECURITY_GROUP),
            file_systems: template.count_of(types::FILE_SYSTEM),
            roles: template.count_of(types::ROLE),
            instances: template.count_of(types::INSTANCE),
        }
    }
}

const IMAGE_PARAMETER_TYPE: &str = "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>";

/// Render `topology` as a complete template.
///
/// # Errors
///
/// Returns `TopologyError::Template` if two resources derive the same
/// logical id.
pub fn synthesize(topology: &Topology) -> Result<Template, TopologyError> {
    let mut template = Template::new(Some(format!(
        "{}: shared EFS file system mounted by {} EC2 instances",
        topology.stack_name,
        topology.instances.len()
    )));
    let stack = topology.stack_name.as_str();

    add_network(&mut template, stack, &topology.network)?;
    add_security_group(&mut template, stack, topology)?;
    add_storage(&mut template, stack, topology)?;
    add_identity(&mut template, topology)?;
    for instance in &topology.instances {
        add_instance(&mut template, stack, topology, instance)?;
    }
    add_outputs(&mut template, topology);

    tracing::debug!(
        resources = template.resources.len(),
        parameters = template.parameters.len(),
        "template synthesized"
    );
    Ok(template)
}

fn name_tag(stack: &str, path: &ConstructPath) -> Value {
    json!([{ "Key": "Name", "Value": path.tag_name(stack) }])
}

fn subnet_resource_id(subnet: &ConstructPath) -> String {
    subnet.child("Subnet").logical_id()
}

fn default_route_id(subnet: &ConstructPath) -> String {
    subnet.child("DefaultRoute").logical_id()
}

fn nat_gateway_id(subnet: &ConstructPath) -> String {
    subnet.child("NATGateway").logical_id()
}

fn add_network(template: &mut Template, stack: &str, network: &Network) -> Result<(), TopologyError> {
    let vpc_id = network.path.logical_id();
    template.add_resource(
        &vpc_id,
        Resource::new(types::VPC)
            .property("CidrBlock", network.cidr.to_string())
            .property("EnableDnsHostnames", true)
            .property("EnableDnsSupport", true)
            .property("InstanceTenancy", "default")
            .property("Tags", name_tag(stack, &network.path)),
    )?;

    let igw_path = network.path.child("IGW");
    let igw_id = igw_path.logical_id();
    template.add_resource(
        &igw_id,
        Resource::new(types::INTERNET_GATEWAY).property("Tags", name_tag(stack, &igw_path)),
    )?;
    let attachment_id = network.path.child("VPCGW").logical_id();
    template.add_resource(
        &attachment_id,
        Resource::new(types::GATEWAY_ATTACHMENT)
            .property("InternetGatewayId", reference(&igw_id))
            .property("VpcId", reference(&vpc_id)),
    )?;

    for subnet in &network.subnets {
        add_subnet(template, stack, network, subnet, &vpc_id, &igw_id, &attachment_id)?;
    }
    Ok(())
}

fn add_subnet(
    template: &mut Template,
    stack: &str,
    network: &Network,
    subnet: &Subnet,
    vpc_id: &str,
    igw_id: &str,
    attachment_id: &str,
) -> Result<(), TopologyError> {
    let subnet_id = subnet_resource_id(&subnet.path);
    template.add_resource(
        &subnet_id,
        Resource::new(types::SUBNET)
            .property("AvailabilityZone", availability_zone(subnet.az_index))
            .property("CidrBlock", subnet.cidr.to_string())
            .property("MapPublicIpOnLaunch", subnet.class.maps_public_ip())
            .property(
                "Tags",
                json!([
                    { "Key": "Name", "Value": subnet.path.tag_name(stack) },
                    { "Key": "subnet-type", "Value": subnet.class.group_name() },
                ]),
            )
            .property("VpcId", reference(vpc_id)),
    )?;

    let table_path = subnet.path.child("RouteTable");
    let table_id = table_path.logical_id();
    template.add_resource(
        &table_id,
        Resource::new(types::ROUTE_TABLE)
            .property("Tags", name_tag(stack, &subnet.path))
            .property("VpcId", reference(vpc_id)),
    )?;
    let association_id = subnet.path.child("RouteTableAssociation").logical_id();
    template.add_resource(
        &association_id,
        Resource::new(types::ROUTE_TABLE_ASSOCIATION)
            .property("RouteTableId", reference(&table_id))
            .property("SubnetId", reference(&subnet_id)),
    )?;

    let route = Resource::new(types::ROUTE)
        .property("DestinationCidrBlock", "0.0.0.0/0")
        .property("RouteTableId", reference(&table_id));
    let route_id = default_route_id(&subnet.path);
    match subnet.class {
        SubnetClass::Public => {
            template.add_resource(
                &route_id,
                route
                    .property("GatewayId", reference(igw_id))
                    .depends_on(attachment_id),
            )?;

            let eip_path = subnet.path.child("EIP");
            let eip_id = eip_path.logical_id();
            template.add_resource(
                &eip_id,
                Resource::new(types::EIP)
                    .property("Domain", "vpc")
                    .property("Tags", name_tag(stack, &subnet.path)),
            )?;
            template.add_resource(
                &nat_gateway_id(&subnet.path),
                Resource::new(types::NAT_GATEWAY)
                    .property("AllocationId", get_att(&eip_id, "AllocationId"))
                    .property("SubnetId", reference(&subnet_id))
                    .property("Tags", name_tag(stack, &subnet.path))
                    .depends_on(&route_id)
                    .depends_on(&association_id),
            )?;
        }
        SubnetClass::PrivateWithEgress => {
            // Same-AZ NAT; fall back to the first one when AZ counts differ.
            let host = network
                .nat_host(subnet.az_index)
                .or_else(|| network.nat_host(0))
                .ok_or_else(|| TopologyError::MissingNatGateway {
                    subnet: subnet.path.to_string(),
                })?;
            template.add_resource(
                &route_id,
                route.property("NatGatewayId", reference(&nat_gateway_id(&host.path))),
            )?;
        }
    }
    Ok(())
}

fn add_security_group(template: &mut Template, stack: &str, topology: &Topology) -> Result<(), TopologyError> {
    let boundary = &topology.boundary;
    template.add_resource(
        &boundary.path.logical_id(),
        Resource::new(types::SECURITY_GROUP)
            .property("GroupDescription", boundary.path.tag_name(stack))
            .property("SecurityGroupEgress", boundary.egress_cfn())
            .property("SecurityGroupIngress", boundary.ingress_cfn())
            .property("VpcId", reference(&topology.network.path.logical_id())),
    )?;
    Ok(())
}

fn add_storage(template: &mut Template, stack: &str, topology: &Topology) -> Result<(), TopologyError> {
    let storage = &topology.storage;
    let fs_id = storage.logical_id();
    template.add_resource(
        &fs_id,
        Resource::new(types::FILE_SYSTEM)
            .property("Encrypted", storage.encrypted)
            .property("FileSystemPolicy", storage.access_policy.to_cfn())
            .property("FileSystemTags", name_tag(stack, &storage.path))
            .removal_policy(storage.removal_policy),
    )?;

    for target in &storage.mount_targets {
        let groups: Vec<Value> = target
            .security_groups
            .iter()
            .map(|sg| get_att(&sg.logical_id(), "GroupId"))
            .collect();
        template.add_resource(
            &target.path.logical_id(),
            Resource::new(types::MOUNT_TARGET)
                .property("FileSystemId", reference(&fs_id))
                .property("SecurityGroups", groups)
                .property("SubnetId", reference(&subnet_resource_id(&target.subnet))),
        )?;
    }
    Ok(())
}

fn add_identity(template: &mut Template, topology: &Topology) -> Result<(), TopologyError> {
    let identity = &topology.identity;
    let role_id = identity.logical_id();
    let managed: Vec<Value> = identity
        .managed_policies
        .iter()
        .map(|name| intrinsic::managed_policy_arn(name))
        .collect();
    template.add_resource(
        &role_id,
        Resource::new(types::ROLE)
            .property("AssumeRolePolicyDocument", identity.trust_policy().to_cfn())
            .property("ManagedPolicyArns", managed),
    )?;
    template.add_resource(
        &identity.profile_logical_id(),
        Resource::new(types::INSTANCE_PROFILE).property("Roles", json!([reference(&role_id)])),
    )?;
    Ok(())
}

fn add_instance(
    template: &mut Template,
    stack: &str,
    topology: &Topology,
    instance: &ComputeInstance,
) -> Result<(), TopologyError> {
    let network = &topology.network;
    let Some(subnet) = network.placement_subnet(instance.subnet_class) else {
        return Err(TopologyError::UnknownSubnetClass {
            instance: instance.path.to_string(),
            class: instance.subnet_class,
        });
    };
    let subnet_ref = reference(&subnet_resource_id(&subnet.path));

    let param = instance.image.parameter_name();
    if !template.parameters.contains_key(&param) {
        template.add_parameter(
            &param,
            Parameter {
                parameter_type: IMAGE_PARAMETER_TYPE.to_string(),
                default: Some(instance.image.ssm_parameter.clone()),
                description: Some("Machine image id resolved from SSM".to_string()),
            },
        )?;
    }

    let mut resource = Resource::new(types::INSTANCE)
        .property("AvailabilityZone", availability_zone(subnet.az_index))
        .property("IamInstanceProfile", reference(&topology.identity.profile_logical_id()))
        .property("ImageId", reference(&param))
        .property("InstanceType", instance.instance_type.clone())
        .property("Tags", name_tag(stack, &instance.path))
        .property("UserData", instance.boot_script.to_cfn(&topology.storage.logical_id()))
        .depends_on(&instance.identity.logical_id());

    if instance.associate_public_ip {
        resource = resource.property(
            "NetworkInterfaces",
            json!([{
                "AssociatePublicIpAddress": true,
                "DeviceIndex": "0",
                "SubnetId": subnet_ref,
            }]),
        );
    } else {
        resource = resource.property("SubnetId", subnet_ref);
    }

    if instance.subnet_class == SubnetClass::Public {
        for public in network.subnets_of(SubnetClass::Public) {
            resource = resource.depends_on(&default_route_id(&public.path));
        }
    }
    // Mount targets must exist before the boot script mounts the file system.
    for target in &topology.storage.mount_targets {
        resource = resource.depends_on(&target.path.logical_id());
    }

    template.add_resource(&instance.logical_id(), resource)?;
    Ok(())
}

fn add_outputs(template: &mut Template, topology: &Topology) {
    template.add_output(
        "FileSystemId",
        Output {
            value: reference(&topology.storage.logical_id()),
            description: Some("Provider-assigned id of the shared file system".to_string()),
        },
    );
    for instance in &topology.instances {
        let name = match instance.subnet_class {
            SubnetClass::Public => "PublicInstanceId",
            SubnetClass::PrivateWithEgress => "PrivateInstanceId",
        };
        template.add_output(
            name,
            Output {
                value: reference(&instance.logical_id()),
                description: Some(format!("Instance id of {}", instance.path)),
            },
        );
    }
}
