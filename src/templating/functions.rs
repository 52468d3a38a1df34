//! Tera functions exposed to templates.
//!
//! | Function              | Returns                                        |
//! |-----------------------|------------------------------------------------|
//! | `script_includes()`   | rendered script tags, one per line (safe HTML) |
//! | `style_includes()`    | rendered stylesheet tags (safe HTML)           |
//! | `info_messages()`     | array of info message strings                  |
//! | `error_messages()`    | array of error message strings                 |
//! | `assign(name, value)` | writes `value` back into a bound variable      |
//!
//! `assign` returns nothing, so `{{ assign(name="count", value=2) }}` prints an
//! empty string. The write is visible to the caller once rendering finishes,
//! not to later expressions in the same render.

use std::collections::HashMap;
use tera::{Tera, Value};

use super::evaluator::RenderContext;

/// Register every template function for one evaluation.
pub fn register(tera: &mut Tera, context: &RenderContext) {
    tera.register_function(
        "script_includes",
        SafeHtml(context.script_includes().to_string()),
    );
    tera.register_function("style_includes", SafeHtml(context.style_includes().to_string()));
    tera.register_function(
        "info_messages",
        create_messages_function(context.info_messages().to_vec()),
    );
    tera.register_function(
        "error_messages",
        create_messages_function(context.error_messages().to_vec()),
    );
    tera.register_function("assign", create_assign_function(context.clone()));
}

/// A pre-rendered HTML block that bypasses autoescaping.
struct SafeHtml(String);

impl tera::Function for SafeHtml {
    fn call(&self, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        Ok(Value::String(self.0.clone()))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

fn create_messages_function(messages: Vec<String>) -> impl tera::Function + 'static {
    move |_args: &HashMap<String, Value>| -> tera::Result<Value> {
        Ok(Value::Array(messages.iter().cloned().map(Value::String).collect()))
    }
}

/// Writes go to the shared cells, which outlive the Tera instance.
fn create_assign_function(context: RenderContext) -> impl tera::Function + 'static {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("assign requires a string `name` argument"))?;
        let value = args.get("value").cloned().unwrap_or(Value::Null);

        context.assign(name, value).map_err(|e| tera::Error::msg(e.to_string()))?;
        tracing::trace!(name, "template assigned variable");
        Ok(Value::Null)
    }
}
