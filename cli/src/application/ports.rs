//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared template model,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use efs_stack_common::Template;

use crate::domain::assembly::Manifest;
use crate::domain::config::StackConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Files written for one synthesized stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyArtifacts {
    pub template_path: PathBuf,
    pub manifest_path: PathBuf,
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence so services can be tested without
/// touching `~/.efs-stack/config.yaml`.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    fn load(&self) -> Result<StackConfig>;
    /// Persist the configuration.
    fn save(&self, config: &StackConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Assembly Port ─────────────────────────────────────────────────────────────

/// Abstracts writing the cloud assembly (template + manifest) to disk.
pub trait AssemblyWriter {
    /// Write `template` and `manifest` under `out_dir`.
    fn write_assembly(
        &self,
        out_dir: &Path,
        template_file: &str,
        template: &Template,
        manifest: &Manifest,
    ) -> Result<AssemblyArtifacts>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
