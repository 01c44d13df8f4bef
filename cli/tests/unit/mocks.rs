//! Shared in-memory port implementations for unit tests.
//!
//! Each test file builds on these instead of re-defining the same
//! boilerplate.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use anyhow::Result;
use efs_stack_cli::application::ports::{
    AssemblyArtifacts, AssemblyWriter, ConfigStore, ProgressReporter,
};
use efs_stack_cli::domain::assembly::Manifest;
use efs_stack_cli::domain::config::StackConfig;
use efs_stack_common::Template;

// ── ConfigStore ───────────────────────────────────────────────────────────────

/// Config store backed by a `RefCell`; counts saves.
pub struct MemoryConfigStore {
    config: RefCell<StackConfig>,
    pub saves: Cell<usize>,
}

impl MemoryConfigStore {
    pub fn new(config: StackConfig) -> Self {
        Self {
            config: RefCell::new(config),
            saves: Cell::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(StackConfig::default())
    }

    pub fn current(&self) -> StackConfig {
        self.config.borrow().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<StackConfig> {
        Ok(self.config.borrow().clone())
    }

    fn save(&self, config: &StackConfig) -> Result<()> {
        *self.config.borrow_mut() = config.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/in-memory/config.yaml"))
    }
}

/// Config store whose file cannot be read.
pub struct UnreadableConfigStore;

impl ConfigStore for UnreadableConfigStore {
    fn load(&self) -> Result<StackConfig> {
        anyhow::bail!("cannot read /in-memory/config.yaml: permission denied")
    }

    fn save(&self, _: &StackConfig) -> Result<()> {
        anyhow::bail!("not expected in this test")
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/in-memory/config.yaml"))
    }
}

// ── AssemblyWriter ────────────────────────────────────────────────────────────

/// One captured `write_assembly` call.
pub struct WrittenAssembly {
    pub out_dir: PathBuf,
    pub template_file: String,
    pub template: Template,
    pub manifest: Manifest,
}

/// Captures assemblies instead of writing them.
#[derive(Default)]
pub struct RecordingAssemblyWriter {
    pub written: RefCell<Vec<WrittenAssembly>>,
}

impl AssemblyWriter for RecordingAssemblyWriter {
    fn write_assembly(
        &self,
        out_dir: &Path,
        template_file: &str,
        template: &Template,
        manifest: &Manifest,
    ) -> Result<AssemblyArtifacts> {
        self.written.borrow_mut().push(WrittenAssembly {
            out_dir: out_dir.to_path_buf(),
            template_file: template_file.to_string(),
            template: template.clone(),
            manifest: manifest.clone(),
        });
        Ok(AssemblyArtifacts {
            template_path: out_dir.join(template_file),
            manifest_path: out_dir.join("manifest.json"),
        })
    }
}

// ── ProgressReporter ─────────────────────────────────────────────────────────

/// Records every progress event as `"<kind>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}
