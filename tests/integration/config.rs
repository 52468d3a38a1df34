//! Config file discovery. These tests mutate `STENCIL_CONFIG_PATH` and run
//! serially.

use serial_test::serial;
use std::fs;
use stencil::config::StencilConfig;
use stencil::constants::CONFIG_PATH_ENV;
use stencil::path::Separator;
use stencil::templating::TemplateRenderer;
use tempfile::TempDir;

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, value);
        }
        Self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
    }
}

#[test]
#[serial]
fn test_env_var_points_at_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("stencil.toml");
    fs::write(&path, "template_root = \"views\"\nseparator = \"/\"\n").unwrap();
    let _guard = EnvGuard::set(&path);

    let config = StencilConfig::load_with_optional(None).unwrap();
    assert_eq!(config.template_root.as_deref(), Some("views"));
    assert_eq!(config.separator, Separator::Slash);

    let renderer = TemplateRenderer::from_config("pages/../home.html", &config);
    assert_eq!(renderer.resolved_path(), "views/home.html");
}

#[test]
#[serial]
fn test_explicit_path_beats_env_var() {
    let temp = TempDir::new().unwrap();
    let from_env = temp.path().join("env.toml");
    let explicit = temp.path().join("explicit.toml");
    fs::write(&from_env, "autoescape = false").unwrap();
    fs::write(&explicit, "autoescape = true").unwrap();
    let _guard = EnvGuard::set(&from_env);

    let config = StencilConfig::load_with_optional(Some(explicit)).unwrap();
    assert!(config.autoescape);
}

#[test]
#[serial]
fn test_missing_env_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let _guard = EnvGuard::set(&temp.path().join("absent.toml"));

    assert_eq!(StencilConfig::load_with_optional(None).unwrap(), StencilConfig::default());
}

#[test]
#[serial]
fn test_malformed_env_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "template_root = [").unwrap();
    let _guard = EnvGuard::set(&path);

    let error = StencilConfig::load_with_optional(None).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config"));
}
