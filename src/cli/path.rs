//! `stencil path`: print the path the renderer would use for some fragments.

use anyhow::Result;
use clap::Args;

use crate::config::StencilConfig;
use crate::path::{PathResolver, Separator};

#[derive(Args, Debug)]
pub struct PathCommand {
    /// Path fragments, joined in order
    #[arg(value_name = "FRAGMENT", required = true)]
    pub fragments: Vec<String>,

    /// Stop after normalization and leave `..` segments in place
    #[arg(long)]
    pub normalize_only: bool,

    /// Separator to produce: "native", "/" or "\\" (defaults to the config value)
    #[arg(long, value_name = "SEP")]
    pub separator: Option<Separator>,
}

impl PathCommand {
    pub fn execute(self, config: &StencilConfig) -> Result<()> {
        println!("{}", self.run(config));
        Ok(())
    }

    fn run(&self, config: &StencilConfig) -> String {
        let resolver = PathResolver::new(self.separator.unwrap_or(config.separator));
        let fragments = self.fragments.clone();

        if self.normalize_only {
            resolver.normalize(fragments)
        } else {
            resolver.resolve(fragments)
        }
    }
}
