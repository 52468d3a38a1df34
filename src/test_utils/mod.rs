//! Test utilities for stencil
//!
//! Available with the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use stencil::test_utils::{TemplateDir, init_test_logging};
//! use stencil::templating::TemplateRenderer;
//!
//! init_test_logging(None);
//! let dir = TemplateDir::new().unwrap();
//! let page = dir.write("page.html", "Hello {{ name }}").unwrap();
//!
//! let mut renderer = TemplateRenderer::new(page);
//! renderer.set_variable("name", "Ada");
//! assert_eq!(renderer.render_to_string().unwrap(), "Hello Ada");
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, else `RUST_LOG`. With neither, no subscriber is
/// installed.
///
/// ```bash
/// RUST_LOG=stencil=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary directory of template files, removed on drop.
#[derive(Debug)]
pub struct TemplateDir {
    temp: TempDir,
}

impl TemplateDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp directory")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// The directory as a string, for use as a template root.
    pub fn root(&self) -> String {
        self.temp.path().to_string_lossy().into_owned()
    }

    /// Write a template, creating parent directories, and return its full
    /// path as a string.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> Result<String> {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp.path().join(relative)
    }
}
