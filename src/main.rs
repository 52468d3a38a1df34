//! stencil CLI entry point
//!
//! Parses arguments, runs the command and prints errors with suggestions.
//! The process exits with status 1 on any error.

use clap::Parser;
use stencil::cli;
use stencil::core::error::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
