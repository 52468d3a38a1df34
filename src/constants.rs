//! Constants shared between the library and the binary.

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "STENCIL_CONFIG_PATH";

/// Directory under the platform config dir that holds the config file.
pub const CONFIG_DIR_NAME: &str = "stencil";

/// Name of the config file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Log filter used when neither a flag nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";
