//! Renderer configuration file.
//!
//! # Location
//!
//! - **Unix/macOS**: `~/.config/stencil/config.toml`
//! - **Windows**: `%APPDATA%\stencil\config.toml`
//!
//! The location can be overridden using the `STENCIL_CONFIG_PATH` environment variable.
//!
//! # File Format
//!
//! ```toml
//! # Directory prepended to relative template paths
//! template_root = "templates"
//!
//! # Path separator: "native", "/" or "\\"
//! separator = "/"
//!
//! # Escape HTML in .html, .htm and .xml templates
//! autoescape = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
use crate::path::Separator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct StencilConfig {
    /// Directory prepended to relative template paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_root: Option<String>,

    /// Separator used when resolving template paths.
    pub separator: Separator,

    /// Whether `.html`, `.htm` and `.xml` templates are autoescaped.
    pub autoescape: bool,
}

impl StencilConfig {
    /// Load from an explicit path, `STENCIL_CONFIG_PATH`, or the default
    /// location, in that order. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path),
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
                _ => Self::default_path().ok(),
            },
        };

        match path {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    ///
    /// ```rust,no_run
    /// use stencil::config::StencilConfig;
    /// use std::path::Path;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = StencilConfig::load_from(Path::new("stencil.toml"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// `<config_dir>/stencil/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine config directory"))?;

        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// The template root, if one is configured.
    pub fn template_root(&self) -> Option<&Path> {
        self.template_root.as_deref().map(Path::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config: StencilConfig = toml::from_str("").unwrap();
        assert_eq!(config, StencilConfig::default());
        assert_eq!(config.separator, Separator::native());
        assert!(!config.autoescape);
        assert!(config.template_root().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
template_root = "site/templates"
separator = "\\"
autoescape = true
"#,
        )
        .unwrap();

        let config = StencilConfig::load_from(&path).unwrap();
        assert_eq!(config.template_root.as_deref(), Some("site/templates"));
        assert_eq!(config.separator, Separator::Backslash);
        assert!(config.autoescape);
    }

    #[test]
    fn test_invalid_separator_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "separator = \"|\"").unwrap();

        let error = StencilConfig::load_from(&path).unwrap_err();
        assert!(format!("{error:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_missing_path_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config =
            StencilConfig::load_with_optional(Some(temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config, StencilConfig::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = StencilConfig {
            template_root: Some("views".to_string()),
            separator: Separator::Slash,
            autoescape: true,
        };

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("separator = \"/\""));
        assert_eq!(toml::from_str::<StencilConfig>(&text).unwrap(), config);
    }
}
