//! Structural properties of the default topology, checked both on the
//! domain model and on the synthesized template.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use efs_stack_cli::domain::compute::MOUNT_PATH;
use efs_stack_cli::domain::config::StackConfig;
use efs_stack_cli::domain::security::EFS_PORT;
use efs_stack_cli::domain::synth::types;
use efs_stack_cli::domain::{Topology, synthesize};
use efs_stack_common::{RemovalPolicy, SubnetClass, Template};
use serde_json::json;

fn topology() -> Topology {
    Topology::define(&StackConfig::default()).unwrap()
}

fn template() -> Template {
    synthesize(&topology()).unwrap()
}

#[test]
fn test_every_instance_is_placed_in_a_declared_subnet_class() {
    let t = topology();
    for instance in &t.instances {
        assert!(SubnetClass::ALL.contains(&instance.subnet_class));
        assert!(t.network.declares(instance.subnet_class));
    }
    let classes: Vec<_> = t.instances.iter().map(|i| i.subnet_class).collect();
    assert!(classes.contains(&SubnetClass::Public));
    assert!(classes.contains(&SubnetClass::PrivateWithEgress));
}

#[test]
fn test_security_group_admits_mount_port_and_all_outbound() {
    let tpl = template();
    let sg_id = tpl.resources_of_type(types::SECURITY_GROUP).next().unwrap();
    let props = &tpl.resources[sg_id].properties;

    let ingress = props["SecurityGroupIngress"].as_array().unwrap();
    assert!(ingress.iter().any(|r| {
        r["IpProtocol"] == "tcp"
            && r["FromPort"] == json!(EFS_PORT)
            && r["ToPort"] == json!(EFS_PORT)
            && r["CidrIp"] == "0.0.0.0/0"
    }));
    let egress = props["SecurityGroupEgress"].as_array().unwrap();
    assert!(
        egress
            .iter()
            .any(|r| r["IpProtocol"] == "-1" && r["CidrIp"] == "0.0.0.0/0")
    );
}

#[test]
fn test_access_policy_is_single_allow_all_statement() {
    let tpl = template();
    let fs_id = tpl.resources_of_type(types::FILE_SYSTEM).next().unwrap();
    let statements = tpl.resources[fs_id].properties["FileSystemPolicy"]["Statement"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(statements.len(), 1);
    let s = &statements[0];
    assert_eq!(s["Effect"], "Allow");
    assert_eq!(s["Principal"], json!({ "AWS": "*" }));
    assert_eq!(s["Action"], "*");
    assert_eq!(s["Resource"], "*");
}

#[test]
fn test_instances_share_identity_and_file_system_reference() {
    let t = topology();
    let tpl = synthesize(&t).unwrap();
    let fs_id = t.storage.logical_id();
    let profile_id = t.identity.profile_logical_id();

    let instances: Vec<_> = tpl.resources_of_type(types::INSTANCE).collect();
    assert_eq!(instances.len(), 2);
    for id in instances {
        let props = &tpl.resources[id].properties;
        assert_eq!(props["IamInstanceProfile"], json!({ "Ref": profile_id }));
        let parts = props["UserData"]["Fn::Base64"]["Fn::Join"][1]
            .as_array()
            .unwrap();
        assert!(parts.contains(&json!({ "Ref": fs_id })));
        let script: String = parts.iter().filter_map(|p| p.as_str()).collect();
        assert!(script.contains(&format!("sudo mkdir -p {MOUNT_PATH}")));
    }
}

#[test]
fn test_file_system_is_destroyed_on_teardown() {
    let t = topology();
    assert_eq!(t.storage.removal_policy, RemovalPolicy::Destroy);
    let tpl = synthesize(&t).unwrap();
    let fs = &tpl.resources[&t.storage.logical_id()];
    assert_eq!(fs.deletion_policy.as_deref(), Some("Delete"));
    assert_eq!(fs.update_replace_policy.as_deref(), Some("Delete"));
}

#[test]
fn test_default_inputs_yield_exact_entity_counts() {
    let tpl = template();
    assert_eq!(tpl.count_of(types::VPC), 1);
    assert_eq!(tpl.count_of(types::SECURITY_GROUP), 1);
    assert_eq!(tpl.count_of(types::FILE_SYSTEM), 1);
    assert_eq!(tpl.count_of(types::ROLE), 1);
    assert_eq!(tpl.count_of(types::INSTANCE), 2);
}

#[test]
fn test_synthesis_is_deterministic() {
    let a = serde_json::to_string(&template()).unwrap();
    let b = serde_json::to_string(&template()).unwrap();
    assert_eq!(a, b);
}
