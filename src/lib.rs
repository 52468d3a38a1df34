//! stencil - a small template renderer
//!
//! Renders template files with a scope of named variables, collects script and
//! style includes plus info/error messages for a page, and resolves template
//! paths lexically.
//!
//! # Core Modules
//!
//! - [`path`] - Fragment flattening, path normalization and `..` resolution
//! - [`templating`] - Renderer, variable scope, evaluators and output capture
//!
//! ## Supporting Modules
//!
//! - [`config`] - Optional TOML configuration
//! - [`core`] - Application errors with user-facing suggestions
//! - [`cli`] - The `stencil` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use stencil::templating::{SharedValue, TemplateRenderer};
//!
//! # fn example() -> Result<(), stencil::templating::TemplateError> {
//! let cart = SharedValue::new(json!({ "items": 2 }));
//!
//! let mut page = TemplateRenderer::new("templates/cart.html");
//! page.set_variable("title", "Your cart");
//! page.set_variable_by_reference("cart", &cart);
//! page.add_style_include("/css/cart.css");
//!
//! let html = page.render_to_string()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod path;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
