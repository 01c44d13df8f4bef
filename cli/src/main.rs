//! efs-stack CLI - synthesize a shared-EFS stack as a CloudFormation template

use std::process::ExitCode;

use clap::Parser;
use efs_stack_cli::cli::Cli;
use efs_stack_cli::output::json::format_error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match format_error(&message, "COMMAND_FAILED") {
                Ok(out) if json => println!("{out}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}
