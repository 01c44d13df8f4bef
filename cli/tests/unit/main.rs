//! Unit tests for the efs-stack CLI
//!
//! These tests use in-memory port implementations and run fast without
//! external I/O.

mod architecture;
mod config_service;
mod mocks;
mod property_tests;
mod stack_service;
mod topology_properties;
