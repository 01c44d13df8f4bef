//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document to
//! stdout. Failures use the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use efs_stack_common::Template;
use serde::Serialize;

use crate::application::ports::AssemblyArtifacts;
use crate::application::services::stack::Synthesis;
use crate::domain::config::StackConfig;
use crate::domain::synth::EntityCounts;
use crate::domain::topology::Check;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders domain types as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_template(template: &Template) -> Result<()> {
        print_json(template)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_assembly(artifacts: &AssemblyArtifacts, synthesis: &Synthesis) -> Result<()> {
        print_json(&serde_json::json!({
            "stack": synthesis.topology.stack_name,
            "template": artifacts.template_path,
            "manifest": artifacts.manifest_path,
            "resources": synthesis.template.resources.len(),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_plan(synthesis: &Synthesis) -> Result<()> {
        let topology = &synthesis.topology;
        print_json(&serde_json::json!({
            "stack": topology.stack_name,
            "profile": topology.profile,
            "counts": EntityCounts::of(&synthesis.template),
            "resources": synthesis.plan.len(),
            "waves": synthesis.plan.waves,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_checks(checks: &[Check]) -> Result<()> {
        print_json(&serde_json::json!({
            "valid": checks.iter().all(|c| c.passed),
            "checks": checks,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(config: &StackConfig, path: &Path) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path,
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        print_json(&serde_json::json!({ "version": version }))
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}
