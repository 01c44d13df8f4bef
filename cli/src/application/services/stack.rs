//! Application service — define, check, synthesize, and write the stack.

use std::path::Path;

use anyhow::{Context, Result};
use efs_stack_common::Template;

use crate::application::ports::{
    AssemblyArtifacts, AssemblyWriter, ConfigStore, ProgressReporter,
};
use crate::domain::assembly::{Manifest, template_file_name};
use crate::domain::graph::{Plan, apply_order};
use crate::domain::synth::synthesize;
use crate::domain::topology::{Check, Topology};

/// Everything produced by one synthesis run.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub topology: Topology,
    pub template: Template,
    pub plan: Plan,
}

/// Define the topology from stored configuration, render it, and order it.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the topology is
/// structurally invalid, or the dependency graph has a cycle.
pub fn synthesize_stack(
    store: &impl ConfigStore,
    reporter: &impl ProgressReporter,
) -> Result<Synthesis> {
    let config = store.load()?;

    reporter.step("defining topology...");
    let topology = Topology::define(&config).context("invalid topology")?;

    reporter.step("synthesizing template...");
    let template = synthesize(&topology).context("synthesis failed")?;
    let plan = apply_order(&template).context("cannot order resources")?;

    tracing::info!(
        stack = %topology.stack_name,
        resources = template.resources.len(),
        waves = plan.waves.len(),
        "stack synthesized"
    );
    reporter.success(&format!(
        "{} resources in {} waves",
        template.resources.len(),
        plan.waves.len()
    ));
    Ok(Synthesis {
        topology,
        template,
        plan,
    })
}

/// Write the synthesized template and its manifest under `out_dir`.
///
/// # Errors
///
/// Returns an error if the files cannot be written.
pub fn write_assembly(
    writer: &impl AssemblyWriter,
    reporter: &impl ProgressReporter,
    out_dir: &Path,
    synthesis: &Synthesis,
) -> Result<AssemblyArtifacts> {
    let stack = &synthesis.topology.stack_name;
    reporter.step(&format!("writing assembly to {}...", out_dir.display()));
    let artifacts = writer.write_assembly(
        out_dir,
        &template_file_name(stack),
        &synthesis.template,
        &Manifest::for_stack(stack),
    )?;
    reporter.success(&format!("wrote {}", artifacts.template_path.display()));
    Ok(artifacts)
}

/// Run every structural check against the stored configuration.
///
/// Unlike [`synthesize_stack`], failing checks are reported rather than
/// returned as an error; only invalid configuration literals error out.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or assembled.
pub fn check_stack(
    store: &impl ConfigStore,
    reporter: &impl ProgressReporter,
) -> Result<Vec<Check>> {
    let config = store.load()?;
    let topology = Topology::assemble(&config).context("invalid topology")?;
    let checks = topology.validate();
    report_failed_checks(&checks, reporter);
    Ok(checks)
}

/// Emit one warning per failed check and return how many failed.
pub fn report_failed_checks(checks: &[Check], reporter: &impl ProgressReporter) -> usize {
    let mut failed = 0;
    for check in checks.iter().filter(|c| !c.passed) {
        reporter.warn(&format!("{}: {}", check.name, check.detail));
        failed += 1;
    }
    if failed > 0 {
        tracing::warn!(failed, "topology checks failed");
    }
    failed
}
