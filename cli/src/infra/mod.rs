//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: config file access and
//! cloud assembly output.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod assembly;
pub mod config;
