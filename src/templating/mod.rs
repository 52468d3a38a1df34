//! Template rendering.
//!
//! A [`TemplateRenderer`] binds named variables, resolves its file path with a
//! [`PathResolver`](crate::path::PathResolver) and evaluates the file through an
//! [`Evaluator`]. The default evaluator treats files as Tera templates.
//!
//! # Bindings
//!
//! - `set_variable`: a private copy of the value
//! - `set_variable_by_reference`: a caller-owned [`SharedValue`] cell
//! - `set_template`: any [`Renderable`], rendered to a string before the owning
//!   template is evaluated and memoized into the scope
//!
//! # Template Functions
//!
//! Tera templates can call `script_includes()`, `style_includes()`,
//! `info_messages()`, `error_messages()` and `assign(name, value)`. See
//! [`functions`].
//!
//! # Output
//!
//! Rendered text goes to the ambient [`output`] sink: stdout by default, or
//! the innermost active capture. `render_to_string` wraps a render in a capture
//! that is released on every exit path.
//!
//! # Example
//!
//! ```rust,no_run
//! use stencil::templating::TemplateRenderer;
//!
//! # fn example() -> Result<(), stencil::templating::TemplateError> {
//! let mut renderer = TemplateRenderer::new("templates/welcome.html");
//! renderer.set_variable("name", "Ada");
//! renderer.add_info_message("Profile saved");
//!
//! let html = renderer.render_to_string()?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod output;
pub mod renderer;
pub mod scope;

pub use assets::{IncludeKind, IncludeList};
pub use error::TemplateError;
pub use evaluator::{Evaluation, Evaluator, RenderContext, TeraEvaluator};
pub use renderer::{Renderable, TemplateRenderer};
pub use scope::{Binding, SharedValue, VariableScope};
