//! Configuration for the renderer and the `stencil` binary.
//!
//! Configuration lives in a single optional TOML file, resolved in this order:
//!
//! 1. The `--config` command-line flag
//! 2. The `STENCIL_CONFIG_PATH` environment variable
//! 3. The platform config directory (see [`StencilConfig::default_path`])
//!
//! A missing file is not an error; every setting has a default. Command-line
//! flags such as `--root` override values read from the file.

mod global;

pub use global::StencilConfig;
