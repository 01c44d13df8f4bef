//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use efs_stack_common::Template;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;

use crate::application::ports::AssemblyArtifacts;
use crate::application::services::stack::Synthesis;
use crate::domain::config::StackConfig;
use crate::domain::topology::Check;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Mode-dispatching renderer handed out by `AppContext::renderer`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the synthesized template document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_template(&self, template: &Template) -> Result<()> {
        match self {
            Self::Human(r) => r.render_template(template),
            Self::Json(_) => JsonRenderer::render_template(template),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_assembly(&self, artifacts: &AssemblyArtifacts, synthesis: &Synthesis) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_assembly(artifacts, synthesis);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_assembly(artifacts, synthesis),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_plan(&self, synthesis: &Synthesis) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_plan(synthesis);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_plan(synthesis),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_checks(&self, checks: &[Check]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_checks(checks);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_checks(checks),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &StackConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_config(config, path),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_version(version),
        }
    }
}
