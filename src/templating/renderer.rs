//! Template renderer with variable binding and nested rendering.
//!
//! A [`TemplateRenderer`] owns a file reference, a [`VariableScope`] and the
//! page's script/style includes and messages. Rendering resolves the file path
//! lexically, renders any nested templates bound as variables, evaluates the
//! file through an [`Evaluator`] and writes the result to the ambient
//! [`output`](super::output) sink.
//!
//! # Examples
//!
//! ```rust,no_run
//! use serde_json::json;
//! use stencil::templating::{SharedValue, TemplateRenderer};
//!
//! # fn example() -> Result<(), stencil::templating::TemplateError> {
//! let visits = SharedValue::new(json!(0));
//!
//! let mut sidebar = TemplateRenderer::new("views/sidebar.html");
//! sidebar.set_variable("links", json!(["/", "/about"]));
//!
//! let mut page = TemplateRenderer::new("views/page.html");
//! page.set_variable("title", "Home");
//! page.set_variable_by_reference("visits", &visits);
//! page.set_template("sidebar", sidebar);
//! page.add_script_include("/js/app.js");
//!
//! let html = page.render_to_string()?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

use super::assets::{IncludeKind, IncludeList};
use super::error::TemplateError;
use super::evaluator::{Evaluator, RenderContext, TeraEvaluator};
use super::output;
use super::scope::{Binding, SharedValue, VariableScope};
use crate::config::StencilConfig;
use crate::path::{Fragment, PathResolver};

/// Anything that can render itself to a string.
///
/// Values bound with [`TemplateRenderer::set_template`] are rendered through
/// this trait before the owning template is evaluated.
pub trait Renderable: fmt::Debug {
    fn render_to_string(&mut self) -> Result<String, TemplateError>;
}

pub struct TemplateRenderer {
    file_path: String,
    variables: VariableScope,
    scripts: IncludeList,
    styles: IncludeList,
    info_messages: Vec<String>,
    error_messages: Vec<String>,
    root: Option<String>,
    resolver: PathResolver,
    evaluator: Arc<dyn Evaluator>,
}

impl fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("file_path", &self.file_path)
            .field("variables", &self.variables)
            .field("scripts", &self.scripts.entries())
            .field("styles", &self.styles.entries())
            .field("info_messages", &self.info_messages)
            .field("error_messages", &self.error_messages)
            .field("root", &self.root)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::with_scope("", VariableScope::new())
    }
}

impl TemplateRenderer {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self::with_scope(file_path, VariableScope::new())
    }

    pub fn with_scope(file_path: impl Into<String>, variables: VariableScope) -> Self {
        Self {
            file_path: file_path.into(),
            variables,
            scripts: IncludeList::new(IncludeKind::Script),
            styles: IncludeList::new(IncludeKind::Style),
            info_messages: Vec::new(),
            error_messages: Vec::new(),
            root: None,
            resolver: PathResolver::native(),
            evaluator: Arc::new(TeraEvaluator::default()),
        }
    }

    /// Create a renderer whose separator, template root and autoescaping come
    /// from configuration.
    pub fn from_config(file_path: impl Into<String>, config: &StencilConfig) -> Self {
        let renderer = Self::new(file_path)
            .with_resolver(PathResolver::new(config.separator))
            .with_evaluator(TeraEvaluator::new(config.autoescape));

        match &config.template_root {
            Some(root) => renderer.with_root(root.clone()),
            None => renderer,
        }
    }

    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Directory that relative file paths are resolved against.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Bind a private copy of `value` under `key`.
    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key, Binding::Value(value.into()));
    }

    /// Bind `key` to the caller's cell.
    ///
    /// Changes the caller makes before rendering are seen by the template, and
    /// values the template assigns are seen by the caller afterwards.
    pub fn set_variable_by_reference(&mut self, key: impl Into<String>, cell: &SharedValue) {
        self.variables.insert(key, Binding::Shared(cell.clone()));
    }

    /// Bind a nested template. It is rendered, and its binding replaced by the
    /// rendered string, on this renderer's next render.
    pub fn set_template(&mut self, key: impl Into<String>, template: impl Renderable + 'static) {
        self.variables.insert(key, Binding::Template(Box::new(template)));
    }

    /// Bind a copy of any serializable value.
    pub fn set_serialized<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), TemplateError> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|source| TemplateError::Serialization {
            key: key.clone(),
            source,
        })?;
        self.variables.insert(key, Binding::Value(value));
        Ok(())
    }

    /// Current value of a variable. Nested templates have no value until the
    /// first render.
    pub fn variable(&self, key: &str) -> Option<Value> {
        self.variables.get(key).and_then(Binding::value)
    }

    pub fn variables(&self) -> &VariableScope {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableScope {
        &mut self.variables
    }

    pub fn add_script_include(&mut self, reference: impl Into<String>) {
        self.scripts.push(reference);
    }

    pub fn prepend_script_include(&mut self, reference: impl Into<String>) {
        self.scripts.prepend(reference);
    }

    pub fn add_style_include(&mut self, reference: impl Into<String>) {
        self.styles.push(reference);
    }

    pub fn script_includes(&self) -> &[String] {
        self.scripts.entries()
    }

    pub fn style_includes(&self) -> &[String] {
        self.styles.entries()
    }

    pub fn render_script_includes(&self) -> String {
        self.scripts.render()
    }

    pub fn render_style_includes(&self) -> String {
        self.styles.render()
    }

    pub fn add_info_message(&mut self, text: impl Into<String>) {
        self.info_messages.push(text.into());
    }

    pub fn add_error_message(&mut self, text: impl Into<String>) {
        self.error_messages.push(text.into());
    }

    pub fn info_messages(&self) -> &[String] {
        &self.info_messages
    }

    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// The path the next render will evaluate. The root is prepended unless
    /// the file path starts with the resolver's separator.
    pub fn resolved_path(&self) -> String {
        let absolute = self.file_path.starts_with(self.resolver.separator().as_char());
        match &self.root {
            Some(root) if !absolute => self.resolver.resolve(Fragment::Nested(vec![
                root.as_str().into(),
                self.file_path.as_str().into(),
            ])),
            _ => self.resolver.resolve(self.file_path.as_str()),
        }
    }

    /// Render the current file and emit its output.
    ///
    /// Returns the evaluator's success flag. Missing files and evaluation
    /// failures are returned as errors; nothing is emitted for them.
    pub fn render(&mut self) -> Result<bool, TemplateError> {
        let path = self.resolved_path();
        self.render_nested()?;

        let context = self.build_context();
        debug!(
            file = %self.file_path,
            path = %path,
            bindings = self.variables.len(),
            "rendering template"
        );

        let result = self.evaluator.evaluate(Path::new(&path), &context);
        self.write_back(&context);
        let evaluation = result?;

        output::emit(&evaluation.output)?;
        Ok(evaluation.success)
    }

    /// Set the file path, then [`render`](Self::render).
    pub fn render_file(&mut self, file_path: impl Into<String>) -> Result<bool, TemplateError> {
        let file_path = file_path.into();
        if !file_path.is_empty() {
            self.file_path = file_path;
        }
        self.render()
    }

    /// Render into a string instead of the ambient output sink.
    ///
    /// The capture is released before any error propagates.
    pub fn render_to_string(&mut self) -> Result<String, TemplateError> {
        let capture = output::capture();
        self.render()?;
        Ok(capture.finish())
    }

    /// Set the file path, then [`render_to_string`](Self::render_to_string).
    pub fn render_file_to_string(
        &mut self,
        file_path: impl Into<String>,
    ) -> Result<String, TemplateError> {
        let file_path = file_path.into();
        if !file_path.is_empty() {
            self.file_path = file_path;
        }
        self.render_to_string()
    }

    /// Replace every nested template binding with its rendered text.
    fn render_nested(&mut self) -> Result<(), TemplateError> {
        for (key, binding) in self.variables.iter_mut() {
            if let Binding::Template(nested) = binding {
                trace!(key = %key, "rendering nested template");
                let rendered =
                    nested.render_to_string().map_err(|source| TemplateError::NestedRender {
                        key: key.clone(),
                        source: Box::new(source),
                    })?;
                *binding = Binding::Rendered(rendered);
            }
        }
        Ok(())
    }

    fn build_context(&self) -> RenderContext {
        let bindings: BTreeMap<String, SharedValue> = self
            .variables
            .iter()
            .filter_map(|(key, binding)| {
                let cell = match binding {
                    Binding::Value(value) => SharedValue::new(value.clone()),
                    Binding::Shared(cell) => cell.clone(),
                    Binding::Rendered(text) => SharedValue::new(text.as_str()),
                    Binding::Template(_) => return None,
                };
                Some((key.clone(), cell))
            })
            .collect();
        let rendered = self
            .variables
            .iter()
            .filter(|(_, binding)| binding.is_rendered())
            .map(|(key, _)| key.clone());

        RenderContext::new(bindings)
            .with_rendered(rendered)
            .with_includes(self.scripts.render(), self.styles.render())
            .with_messages(self.info_messages.clone(), self.error_messages.clone())
    }

    /// Copy bindings pick up whatever the template assigned to them. A
    /// rendered binding that was reassigned becomes a plain value.
    fn write_back(&mut self, context: &RenderContext) {
        for (key, binding) in self.variables.iter_mut() {
            let Some(cell) = context.binding(key) else {
                continue;
            };
            let reassigned = match binding {
                Binding::Value(value) => {
                    *value = cell.get();
                    None
                }
                Binding::Rendered(text) => {
                    let current = cell.get();
                    (current.as_str() != Some(text.as_str())).then_some(current)
                }
                _ => None,
            };
            if let Some(value) = reassigned {
                *binding = Binding::Value(value);
            }
        }
    }
}

impl Renderable for TemplateRenderer {
    fn render_to_string(&mut self) -> Result<String, TemplateError> {
        TemplateRenderer::render_to_string(self)
    }
}
