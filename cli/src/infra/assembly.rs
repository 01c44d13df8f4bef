//! Filesystem implementation of the `AssemblyWriter` port.
//!
//! Both files are written atomically via temp file then rename.

use std::path::Path;

use anyhow::{Context, Result};
use efs_stack_common::Template;
use serde::Serialize;

use crate::application::ports::{AssemblyArtifacts, AssemblyWriter};
use crate::domain::assembly::{MANIFEST_FILE, Manifest};

/// Writes the cloud assembly into a local output directory.
pub struct FsAssemblyWriter;

impl AssemblyWriter for FsAssemblyWriter {
    fn write_assembly(
        &self,
        out_dir: &Path,
        template_file: &str,
        template: &Template,
        manifest: &Manifest,
    ) -> Result<AssemblyArtifacts> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("creating directory {}", out_dir.display()))?;

        let template_path = out_dir.join(template_file);
        write_json_atomic(&template_path, template)?;
        let manifest_path = out_dir.join(MANIFEST_FILE);
        write_json_atomic(&manifest_path, manifest)?;

        tracing::debug!(
            template = %template_path.display(),
            manifest = %manifest_path.display(),
            "assembly written"
        );
        Ok(AssemblyArtifacts {
            template_path,
            manifest_path,
        })
    }
}

fn write_json_atomic(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    content.push('\n');

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, &content)
        .with_context(|| format!("writing temp file {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("finalizing {}", path.display()))
}
