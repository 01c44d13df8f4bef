//! `efs-stack synth` — render the stack template.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::stack;
use crate::infra::assembly::FsAssemblyWriter;
use crate::output::TerminalReporter;

/// Arguments for the synth command.
#[derive(Args)]
pub struct SynthArgs {
    /// Write a cloud assembly (template + manifest.json) into this directory
    /// instead of printing the template
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

/// Run the synth command.
///
/// # Errors
///
/// Returns an error if the topology is invalid or the assembly cannot be written.
pub fn run(app: &AppContext, args: &SynthArgs) -> Result<ExitCode> {
    let reporter = TerminalReporter::new(&app.output);
    let synthesis = stack::synthesize_stack(&app.config_store, &reporter)?;

    match &args.out {
        Some(dir) => {
            let artifacts = stack::write_assembly(&FsAssemblyWriter, &reporter, dir, &synthesis)?;
            app.renderer().render_assembly(&artifacts, &synthesis)?;
        }
        None => app.renderer().render_template(&synthesis.template)?,
    }
    Ok(ExitCode::SUCCESS)
}
