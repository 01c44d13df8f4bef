//! Property-based tests over the configuration space.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use efs_stack_cli::domain::config::{StackConfig, validate_config_key, validate_config_value};
use efs_stack_cli::domain::graph::apply_order;
use efs_stack_cli::domain::synth::types;
use efs_stack_cli::domain::{Topology, TopologyError, synthesize};
use efs_stack_common::{Ipv4Cidr, SecurityProfile};
use proptest::prelude::*;

fn profile() -> impl Strategy<Value = SecurityProfile> {
    prop_oneof![Just(SecurityProfile::Open), Just(SecurityProfile::Restricted)]
}

/// Configs whose subnets always fit: a /16 network cut into /20..=/24 blocks.
fn fitting_config() -> impl Strategy<Value = StackConfig> {
    (0u8..=255, 1u8..=3, 20u8..=24, profile()).prop_map(|(second, azs, mask, profile)| {
        let mut cfg = StackConfig::default();
        cfg.network.cidr = format!("10.{second}.0.0/16").parse().unwrap();
        cfg.network.max_azs = azs;
        cfg.network.subnet_mask = mask;
        cfg.security.profile = profile;
        cfg
    })
}

proptest! {
    /// Any fitting config defines a valid topology with two subnets per AZ.
    #[test]
    fn prop_fitting_config_is_valid(cfg in fitting_config()) {
        let t = Topology::define(&cfg).unwrap();
        prop_assert_eq!(t.network.subnets.len(), 2 * usize::from(cfg.network.max_azs));
        prop_assert!(t.validate().iter().all(|c| c.passed));
        prop_assert_eq!(t.instances.len(), 2);
    }

    /// Entity counts do not depend on the network shape or profile.
    #[test]
    fn prop_entity_counts_are_fixed(cfg in fitting_config()) {
        let tpl = synthesize(&Topology::define(&cfg).unwrap()).unwrap();
        prop_assert_eq!(tpl.count_of(types::VPC), 1);
        prop_assert_eq!(tpl.count_of(types::SECURITY_GROUP), 1);
        prop_assert_eq!(tpl.count_of(types::FILE_SYSTEM), 1);
        prop_assert_eq!(tpl.count_of(types::ROLE), 1);
        prop_assert_eq!(tpl.count_of(types::INSTANCE), 2);
        prop_assert_eq!(tpl.count_of(types::MOUNT_TARGET), usize::from(cfg.network.max_azs));
    }

    /// Every synthesized template is acyclic and fully ordered.
    #[test]
    fn prop_plan_covers_every_resource(cfg in fitting_config()) {
        let tpl = synthesize(&Topology::define(&cfg).unwrap()).unwrap();
        let plan = apply_order(&tpl).unwrap();
        prop_assert_eq!(plan.len(), tpl.resources.len());
    }

    /// Asking for more subnets than fit is reported, never panics.
    #[test]
    fn prop_exhausted_network_is_rejected(azs in 2u8..=3) {
        let mut cfg = StackConfig::default();
        cfg.network.cidr = "10.0.0.0/27".parse::<Ipv4Cidr>().unwrap();
        cfg.network.subnet_mask = 28;
        cfg.network.max_azs = azs;
        let is_exhausted = matches!(
            Topology::define(&cfg),
            Err(TopologyError::AddressSpaceExhausted { .. })
        );
        prop_assert!(is_exhausted);
    }

    /// Keys outside the whitelist are always rejected.
    #[test]
    fn prop_unknown_keys_rejected(key in "[a-z]{1,10}\\.[a-z_]{1,12}") {
        let known = [
            "stack.name",
            "network.cidr",
            "network.max_azs",
            "network.subnet_mask",
            "instance.type",
            "security.profile",
        ];
        prop_assume!(!known.contains(&key.as_str()));
        prop_assert!(validate_config_key(&key).is_err());
    }

    /// Stack names starting with a digit are rejected.
    #[test]
    fn prop_stack_name_must_start_with_letter(name in "[0-9][A-Za-z0-9-]{0,20}") {
        prop_assert!(validate_config_value("stack.name", &name).is_err());
    }
}
