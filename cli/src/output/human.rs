//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::{Context, Result};
use efs_stack_common::Template;
use owo_colors::OwoColorize as _;

use crate::application::ports::AssemblyArtifacts;
use crate::application::services::stack::Synthesis;
use crate::domain::config::{StackConfig, config_entries};
use crate::domain::synth::EntityCounts;
use crate::domain::topology::Check;
use crate::infra::config::CONFIG_PATH_ENV;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("efs-stack {version}");
    }

    /// Print the template as YAML. Never suppressed: this is the command's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be serialized.
    pub fn render_template(&self, template: &Template) -> Result<()> {
        let yaml = serde_yaml::to_string(template).context("cannot serialize template")?;
        print!("{yaml}");
        Ok(())
    }

    /// Render the paths written by `synth --out`.
    pub fn render_assembly(&self, artifacts: &AssemblyArtifacts, synthesis: &Synthesis) {
        self.ctx.kv("Template:", &artifacts.template_path.display().to_string());
        self.ctx.kv("Manifest:", &artifacts.manifest_path.display().to_string());
        self.ctx
            .kv("Resources:", &synthesis.template.resources.len().to_string());
    }

    /// Render the apply plan: entity summary, then one block per wave.
    pub fn render_plan(&self, synthesis: &Synthesis) {
        if self.ctx.quiet {
            return;
        }
        let topology = &synthesis.topology;
        println!();
        self.ctx.header(&format!("Stack {}", topology.stack_name));
        self.ctx.kv("Profile:", &topology.profile.to_string());
        self.ctx.kv("Network:", &topology.network.cidr.to_string());
        self.ctx.kv("Entities:", &entity_summary(&EntityCounts::of(&synthesis.template)));
        println!();

        for (i, wave) in synthesis.plan.waves.iter().enumerate() {
            println!("  {}", format!("Wave {}", i + 1).style(self.ctx.styles.bold));
            for r in wave {
                println!(
                    "    {:<44} {}",
                    r.logical_id,
                    r.resource_type.style(self.ctx.styles.resource)
                );
            }
        }
        println!();
        self.ctx.info(&format!(
            "{} resources in {} waves",
            synthesis.plan.len(),
            synthesis.plan.waves.len()
        ));
    }

    /// Render structural check results.
    pub fn render_checks(&self, checks: &[Check]) {
        println!();
        println!("  {}", "Topology Checks".style(self.ctx.styles.header));
        println!();
        for check in checks {
            self.print_check(check.passed, &format!("{:<22} {}", check.name, check.detail));
        }
        println!();
        let failed = checks.iter().filter(|c| !c.passed).count();
        if failed == 0 {
            self.ctx.success("Topology is valid.");
        } else {
            self.ctx.warn(&format!("{failed} check(s) failed."));
        }
    }

    /// Render the current stack configuration.
    pub fn render_config(&self, config: &StackConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for (key, value) in config_entries(config) {
            println!("  {:<22} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        println!(
            "    {:<18} {}",
            format!("{CONFIG_PATH_ENV}:"),
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "(not set)".to_string())
        );
        println!(
            "    {:<18} {}",
            "NO_COLOR:",
            std::env::var("NO_COLOR").unwrap_or_else(|_| "(not set)".to_string())
        );
        println!();
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "✓".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "✗".style(self.ctx.styles.error));
        }
    }
}

/// `1 network, 1 security group, ...` with naive pluralization.
#[must_use]
pub fn entity_summary(counts: &EntityCounts) -> String {
    [
        (counts.networks, "network"),
        (counts.security_groups, "security group"),
        (counts.file_systems, "file system"),
        (counts.roles, "role"),
        (counts.instances, "instance"),
    ]
    .iter()
    .map(|(n, noun)| {
        if *n == 1 {
            format!("{n} {noun}")
        } else {
            format!("{n} {noun}s")
        }
    })
    .collect::<Vec<_>>()
    .join(", ")
}
