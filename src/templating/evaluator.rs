//! Template file evaluation.
//!
//! An [`Evaluator`] turns a resolved file path plus a [`RenderContext`] into
//! output text. The renderer never interprets template syntax itself; the
//! default [`TeraEvaluator`] evaluates files as Tera templates.

use regex::Regex;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::error::TemplateError;
use super::functions;
use super::scope::SharedValue;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// File suffixes that are autoescaped when autoescaping is enabled.
const AUTOESCAPE_SUFFIXES: &[&str] = &[".html", ".htm", ".xml"];

thread_local! {
    static RENDERED_MARKUP: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Tera escape function that leaves nested template output as it is.
///
/// Tera only accepts a plain `fn` here, so the texts to pass through are read
/// from a thread local set up by [`MarkupGuard`].
fn escape_unless_rendered(input: &str) -> String {
    if RENDERED_MARKUP.with_borrow(|markup| markup.iter().any(|text| text == input)) {
        input.to_string()
    } else {
        tera::escape_html(input)
    }
}

/// Installs the nested outputs of one evaluation and restores the previous
/// set on drop.
struct MarkupGuard {
    previous: Vec<String>,
}

impl MarkupGuard {
    fn install(markup: Vec<String>) -> Self {
        Self {
            previous: RENDERED_MARKUP.with_borrow_mut(|current| std::mem::replace(current, markup)),
        }
    }
}

impl Drop for MarkupGuard {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        RENDERED_MARKUP.with_borrow_mut(|current| *current = previous);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Parse,
    Render,
}

/// Result of evaluating one template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Text the template produced.
    pub output: String,
    /// The template's own verdict on the render.
    pub success: bool,
}

impl Evaluation {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }
}

/// Everything a template can see while it is evaluated.
///
/// Each binding is a [`SharedValue`] cell. By-reference bindings share the
/// caller's cell; copy bindings get a fresh cell that the renderer reads back
/// once evaluation ends, so writes made through [`RenderContext::assign`] land
/// in the right place either way.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    bindings: BTreeMap<String, SharedValue>,
    script_includes: String,
    style_includes: String,
    info_messages: Vec<String>,
    error_messages: Vec<String>,
    rendered: BTreeSet<String>,
}

impl RenderContext {
    pub fn new(bindings: BTreeMap<String, SharedValue>) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    pub fn with_includes(mut self, scripts: String, styles: String) -> Self {
        self.script_includes = scripts;
        self.style_includes = styles;
        self
    }

    pub fn with_messages(mut self, info: Vec<String>, errors: Vec<String>) -> Self {
        self.info_messages = info;
        self.error_messages = errors;
        self
    }

    /// Mark bindings that hold the output of a nested template. Autoescaping
    /// leaves their text untouched.
    pub fn with_rendered(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.rendered = keys.into_iter().collect();
        self
    }

    pub fn is_rendered(&self, name: &str) -> bool {
        self.rendered.contains(name)
    }

    /// Current value of a binding.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).map(SharedValue::get)
    }

    /// Overwrite a bound name. Only names that were bound before evaluation
    /// can be assigned.
    pub fn assign(&self, name: &str, value: impl Into<Value>) -> Result<(), TemplateError> {
        let cell = self.bindings.get(name).ok_or_else(|| TemplateError::UnboundVariable {
            name: name.to_string(),
        })?;
        cell.set(value);
        Ok(())
    }

    pub fn binding(&self, name: &str) -> Option<&SharedValue> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> &BTreeMap<String, SharedValue> {
        &self.bindings
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    /// Point-in-time copy of every binding.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.bindings.iter().map(|(name, cell)| (name.clone(), cell.get())).collect()
    }

    pub fn script_includes(&self) -> &str {
        &self.script_includes
    }

    pub fn style_includes(&self) -> &str {
        &self.style_includes
    }

    pub fn info_messages(&self) -> &[String] {
        &self.info_messages
    }

    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }
}

/// Evaluates a template file against a [`RenderContext`].
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, path: &Path, context: &RenderContext) -> Result<Evaluation, TemplateError>;
}

impl<F> Evaluator for F
where
    F: Fn(&Path, &RenderContext) -> Result<Evaluation, TemplateError> + Send + Sync,
{
    fn evaluate(&self, path: &Path, context: &RenderContext) -> Result<Evaluation, TemplateError> {
        self(path, context)
    }
}

/// Evaluates files as Tera templates.
///
/// Bindings become top-level template variables. The functions registered by
/// [`functions::register`] give templates access to the include blocks, the
/// message lists and write-back through `assign`.
///
/// A fresh Tera instance is created per evaluation, so no state leaks between
/// renders.
#[derive(Debug, Clone, Default)]
pub struct TeraEvaluator {
    autoescape: bool,
}

impl TeraEvaluator {
    pub fn new(autoescape: bool) -> Self {
        Self {
            autoescape,
        }
    }

    fn read_source(path: &Path) -> Result<String, TemplateError> {
        fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => TemplateError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => TemplateError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    /// Parse a Tera error into a structured TemplateError.
    ///
    /// Unknown variables are reported the same way in both phases. Anything
    /// else is a syntax error while parsing and an evaluation error while
    /// rendering.
    fn parse_tera_error(
        error: &tera::Error,
        phase: Phase,
        path: &Path,
        context: &RenderContext,
    ) -> TemplateError {
        let message = Self::format_tera_error(error, path);

        if let Some(variable) = Self::extract_variable_name(&message) {
            let available = context.names();
            let suggestions = Self::find_similar_variables(&variable, &available);
            return TemplateError::VariableNotFound {
                variable,
                path: path.to_path_buf(),
                available,
                suggestions,
            };
        }

        match phase {
            Phase::Parse => TemplateError::Syntax {
                line: Self::extract_line_from_tera_error(error),
                message,
                path: path.to_path_buf(),
            },
            Phase::Render => TemplateError::Evaluation {
                message,
                path: path.to_path_buf(),
            },
        }
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        if let Some(name) = re.captures(error_msg).and_then(|caps| caps.get(1)) {
            return Some(name.as_str().to_string());
        }

        let re2 = Regex::new(r"Unknown variable `([^`]+)`").ok()?;
        re2.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> = available
            .iter()
            .map(|var| {
                let distance = levenshtein(target, var);
                (var.clone(), distance)
            })
            .collect();

        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Tera includes line:column information in parse error messages,
    /// e.g. "1:7" or "15:23".
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = format!("{:?}", error);

        let re = Regex::new(r"(\d+):(\d+)").ok()?;
        re.captures(&error_msg)
            .and_then(|caps| caps.get(1))
            .and_then(|line| line.as_str().parse::<usize>().ok())
    }

    /// Flatten the Tera error chain into one readable message, dropping the
    /// redundant "Failed to render '<name>'" wrappers.
    pub fn format_tera_error(error: &tera::Error, path: &Path) -> String {
        use std::error::Error;

        let name = path.to_string_lossy();
        let wrappers = [format!("Failed to render '{name}'"), format!("Failed to parse '{name}'")];

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| msg.replace(&format!(" while rendering '{name}'"), "").trim().to_string())
            .filter(|msg| !msg.is_empty() && !wrappers.contains(msg))
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

impl Evaluator for TeraEvaluator {
    fn evaluate(&self, path: &Path, context: &RenderContext) -> Result<Evaluation, TemplateError> {
        let source = Self::read_source(path)?;
        let name = path.to_string_lossy();

        let mut tera = Tera::default();
        if self.autoescape {
            tera.autoescape_on(AUTOESCAPE_SUFFIXES.to_vec());
        } else {
            tera.autoescape_on(Vec::new());
        }
        functions::register(&mut tera, context);

        tera.add_raw_template(&name, &source)
            .map_err(|e| Self::parse_tera_error(&e, Phase::Parse, path, context))?;

        let snapshot = context.snapshot();
        let markup: Vec<String> = snapshot
            .iter()
            .filter(|(key, _)| context.is_rendered(key))
            .filter_map(|(_, value)| value.as_str().map(str::to_string))
            .collect();
        let _guard = (self.autoescape && !markup.is_empty()).then(|| {
            tera.set_escape_fn(escape_unless_rendered);
            MarkupGuard::install(markup)
        });

        let mut tera_context = TeraContext::new();
        for (key, value) in snapshot {
            tera_context.insert(key, &value);
        }

        tracing::debug!(template = %name, bytes = source.len(), "evaluating tera template");
        let output = tera
            .render(&name, &tera_context)
            .map_err(|e| Self::parse_tera_error(&e, Phase::Render, path, context))?;

        Ok(Evaluation::success(output))
    }
}
