//! Unit tests for `application::services::stack`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use efs_stack_cli::application::services::stack;
use efs_stack_cli::domain::config::StackConfig;
use efs_stack_cli::domain::topology::Check;
use efs_stack_common::Ipv4Cidr;

use crate::mocks::{
    MemoryConfigStore, RecordingAssemblyWriter, RecordingReporter, UnreadableConfigStore,
};

#[test]
fn test_synthesize_stack_reports_progress_and_orders_every_resource() {
    let store = MemoryConfigStore::with_defaults();
    let reporter = RecordingReporter::default();

    let synthesis = stack::synthesize_stack(&store, &reporter).unwrap();

    assert_eq!(synthesis.plan.len(), synthesis.template.resources.len());
    let events = reporter.events();
    assert_eq!(events[0], "step: defining topology...");
    assert_eq!(events[1], "step: synthesizing template...");
    assert!(events[2].starts_with("success: 31 resources in "), "{events:?}");
}

#[test]
fn test_synthesize_stack_rejects_exhausted_address_space() {
    let mut cfg = StackConfig::default();
    cfg.network.cidr = "10.0.0.0/26".parse::<Ipv4Cidr>().unwrap();
    cfg.network.subnet_mask = 28;
    cfg.network.max_azs = 3;
    let store = MemoryConfigStore::new(cfg);

    let err = stack::synthesize_stack(&store, &RecordingReporter::default()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid topology"), "{err:#}");
}

#[test]
fn test_synthesize_stack_propagates_config_errors() {
    let err = stack::synthesize_stack(&UnreadableConfigStore, &RecordingReporter::default())
        .unwrap_err();
    assert!(err.to_string().contains("permission denied"));
}

#[test]
fn test_write_assembly_uses_stack_named_template() {
    let mut cfg = StackConfig::default();
    cfg.stack.name = "SharedFs".to_string();
    let store = MemoryConfigStore::new(cfg);
    let reporter = RecordingReporter::default();
    let writer = RecordingAssemblyWriter::default();
    let synthesis = stack::synthesize_stack(&store, &reporter).unwrap();

    let artifacts =
        stack::write_assembly(&writer, &reporter, Path::new("cdk.out"), &synthesis).unwrap();

    assert_eq!(
        artifacts.template_path,
        Path::new("cdk.out").join("SharedFs.template.json")
    );
    let written = writer.written.borrow();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].template_file, "SharedFs.template.json");
    assert_eq!(written[0].template, synthesis.template);
    assert_eq!(
        written[0].manifest.artifacts["SharedFs"].properties.template_file,
        "SharedFs.template.json"
    );
}

#[test]
fn test_check_stack_default_config_all_pass() {
    let reporter = RecordingReporter::default();
    let checks = stack::check_stack(&MemoryConfigStore::with_defaults(), &reporter).unwrap();
    assert_eq!(checks.len(), 7);
    assert!(checks.iter().all(|c| c.passed));
    assert!(reporter.events().is_empty());
}

#[test]
fn test_check_stack_rejects_malformed_config() {
    let mut cfg = StackConfig::default();
    cfg.instance.instance_type = "not a type".to_string();
    let reporter = RecordingReporter::default();
    assert!(stack::check_stack(&MemoryConfigStore::new(cfg), &reporter).is_err());
}

#[test]
fn test_report_failed_checks_warns_once_per_failure() {
    let checks = [
        Check {
            name: "removal-policy",
            passed: false,
            detail: "file system would be retained on teardown".to_string(),
        },
        Check {
            name: "access-policy",
            passed: true,
            detail: "2 statement(s) in file system policy".to_string(),
        },
        Check {
            name: "address-space",
            passed: false,
            detail: "subnets overlap".to_string(),
        },
    ];
    let reporter = RecordingReporter::default();

    let failed = stack::report_failed_checks(&checks, &reporter);

    assert_eq!(failed, 2);
    assert_eq!(
        reporter.events(),
        vec![
            "warn: removal-policy: file system would be retained on teardown".to_string(),
            "warn: address-space: subnets overlap".to_string(),
        ]
    );
}
