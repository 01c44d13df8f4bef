//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Synthesize a VPC, an encrypted EFS file system, and two EC2 instances that
/// mount it, as a deployable CloudFormation template
#[derive(Parser)]
#[command(
    name = "efs-stack",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug diagnostics to stderr (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the template, or write a cloud assembly with --out
    Synth(commands::synth::SynthArgs),

    /// Show resources grouped in dependency order
    Plan,

    /// Run structural checks on the topology
    Validate,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        let app = AppContext::new(&OutputFlags {
            no_color,
            quiet,
            json,
        });
        match command {
            Command::Synth(args) => commands::synth::run(&app, &args),
            Command::Plan => commands::plan::run(&app),
            Command::Validate => commands::validate::run(&app),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
