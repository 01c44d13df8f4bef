//! Unit tests for `application::services::config_service`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use efs_stack_cli::application::services::config_service;
use efs_stack_cli::domain::config::StackConfig;
use efs_stack_common::SecurityProfile;

use crate::mocks::MemoryConfigStore;

#[test]
fn test_set_value_persists_valid_setting() {
    let store = MemoryConfigStore::with_defaults();
    let cfg = config_service::set_value(&store, "security.profile", "restricted").unwrap();
    assert_eq!(cfg.security.profile, SecurityProfile::Restricted);
    assert_eq!(store.current().security.profile, SecurityProfile::Restricted);
    assert_eq!(store.saves.get(), 1);
}

#[test]
fn test_set_value_parses_network_fields() {
    let store = MemoryConfigStore::with_defaults();
    config_service::set_value(&store, "network.cidr", "172.16.0.0/20").unwrap();
    config_service::set_value(&store, "network.max_azs", "3").unwrap();
    let cfg = store.current();
    assert_eq!(cfg.network.cidr.to_string(), "172.16.0.0/20");
    assert_eq!(cfg.network.max_azs, 3);
}

#[test]
fn test_set_value_unknown_key_leaves_store_untouched() {
    let store = MemoryConfigStore::with_defaults();
    let err = config_service::set_value(&store, "security.level", "strict").unwrap_err();
    assert!(err.to_string().contains("security.level"), "{err}");
    assert_eq!(store.saves.get(), 0);
    assert_eq!(store.current(), StackConfig::default());
}

#[test]
fn test_set_value_invalid_value_leaves_store_untouched() {
    let store = MemoryConfigStore::with_defaults();
    assert!(config_service::set_value(&store, "network.cidr", "10.0.0.1/16").is_err());
    assert!(config_service::set_value(&store, "network.max_azs", "0").is_err());
    assert!(config_service::set_value(&store, "instance.type", "micro").is_err());
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn test_set_value_rejects_cidr_that_leaves_subnet_mask_too_short() {
    // a /24 network cannot be split into the default /24 subnets
    let store = MemoryConfigStore::with_defaults();
    let err = config_service::set_value(&store, "network.cidr", "10.0.0.0/24").unwrap_err();
    assert!(err.to_string().contains("/24"), "{err}");
    assert_eq!(store.saves.get(), 0);
    assert_eq!(store.current(), StackConfig::default());
}

#[test]
fn test_set_value_rejects_exhausted_address_space() {
    let store = MemoryConfigStore::with_defaults();
    config_service::set_value(&store, "network.subnet_mask", "28").unwrap();
    config_service::set_value(&store, "network.cidr", "10.0.0.0/26").unwrap();
    let before = store.current();

    // four /28 blocks fit in a /26; three AZs need six
    let err = config_service::set_value(&store, "network.max_azs", "3").unwrap_err();
    assert!(err.to_string().contains("cannot hold 6"), "{err}");
    assert_eq!(store.saves.get(), 2);
    assert_eq!(store.current(), before);
}

#[test]
fn test_load_reflects_saved_value() {
    let store = MemoryConfigStore::with_defaults();
    config_service::set_value(&store, "stack.name", "SharedFs").unwrap();
    assert_eq!(config_service::load_config(&store).unwrap().stack.name, "SharedFs");
}
