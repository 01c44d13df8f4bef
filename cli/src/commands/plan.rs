//! `efs-stack plan` — show the resources in dependency order.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::stack;
use crate::output::TerminalReporter;

/// Run the plan command.
///
/// # Errors
///
/// Returns an error if the topology is invalid.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let synthesis = stack::synthesize_stack(&app.config_store, &TerminalReporter::new(&app.output))?;
    app.renderer().render_plan(&synthesis)?;
    Ok(ExitCode::SUCCESS)
}
