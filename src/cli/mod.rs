//! Command-line interface for stencil.
//!
//! # Commands
//!
//! - `render` - Render a template file to stdout or a file
//! - `path` - Resolve path fragments the way the renderer does
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging on stderr
//! - `--quiet` / `-q` - Log errors only
//! - `--config` / `-c` - Path to a config file
//!
//! # Examples
//!
//! ```bash
//! stencil render views/page.html --var title=Home --var 'items=[1,2,3]'
//! stencil render page.html --vars data.json --script /js/app.js --output out.html
//! stencil path --separator / a ./b ../c
//! ```

mod path;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::StencilConfig;
use crate::constants::DEFAULT_LOG_FILTER;

pub use path::PathCommand;
pub use render::{RenderCommand, parse_variable};

#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    about = "Render template files with bound variables",
    version,
    long_about = "stencil renders Tera template files with variables, script and style includes, and messages bound from the command line."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a config file (overrides `STENCIL_CONFIG_PATH`).
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template file
    Render(RenderCommand),

    /// Normalize and resolve path fragments
    Path(PathCommand),
}

impl Cli {
    /// Log filter implied by `--verbose` and `--quiet`. `None` defers to
    /// `RUST_LOG`.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level());

        let config = StencilConfig::load_with_optional(self.config.clone())?;
        tracing::debug!(?config, "configuration loaded");

        match self.command {
            Commands::Render(cmd) => cmd.execute(&config),
            Commands::Path(cmd) => cmd.execute(&config),
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// An explicit `level` wins; otherwise `RUST_LOG` is used, falling back to
/// `warn`. Calling this more than once is harmless.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
