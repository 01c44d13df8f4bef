//! `efs-stack validate` — run the structural checks.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::stack;
use crate::output::TerminalReporter;

/// Run the validate command. Exits 1 when any check fails.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is malformed.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let checks = stack::check_stack(&app.config_store, &TerminalReporter::new(&app.output))?;
    app.renderer().render_checks(&checks)?;
    if checks.iter().all(|c| c.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
