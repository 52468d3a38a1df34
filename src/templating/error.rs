//! Template error types
//!
//! Errors carry enough context (file, line, bound names) to print an
//! actionable explanation via [`TemplateError::format_with_context`].

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while resolving, evaluating or capturing a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The resolved path does not reference an existing file.
    #[error("Template file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Template variable not found: '{variable}'")]
    VariableNotFound {
        variable: String,
        path: PathBuf,
        available: Vec<String>,
        suggestions: Vec<String>,
    },

    #[error("Template syntax error in {}: {message}", path.display())]
    Syntax {
        message: String,
        path: PathBuf,
        line: Option<usize>,
    },

    /// Evaluation started but failed (a function call, a type error, ...).
    #[error("Template evaluation failed in {}: {message}", path.display())]
    Evaluation {
        message: String,
        path: PathBuf,
    },

    /// A template bound as a variable failed to render.
    #[error("Failed to render nested template '{key}': {source}")]
    NestedRender {
        key: String,
        source: Box<TemplateError>,
    },

    #[error("Cannot assign to unbound variable '{name}'")]
    UnboundVariable {
        name: String,
    },

    #[error("Failed to serialize variable '{key}': {source}")]
    Serialization {
        key: String,
        source: serde_json::Error,
    },

    /// Writing to the output sink failed.
    #[error("Failed to write rendered output: {0}")]
    Output(#[from] io::Error),
}

impl TemplateError {
    /// The template file the error points at, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            TemplateError::FileNotFound {
                path,
            }
            | TemplateError::Io {
                path,
                ..
            }
            | TemplateError::VariableNotFound {
                path,
                ..
            }
            | TemplateError::Syntax {
                path,
                ..
            }
            | TemplateError::Evaluation {
                path,
                ..
            } => Some(path.as_path()),
            TemplateError::NestedRender {
                source,
                ..
            } => source.path(),
            _ => None,
        }
    }

    /// Generate a user-friendly, multi-line explanation with suggestions.
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::FileNotFound {
                path,
            } => format_file_not_found(path),
            TemplateError::VariableNotFound {
                variable,
                path,
                available,
                suggestions,
            } => format_variable_not_found(variable, path, available, suggestions),
            TemplateError::Syntax {
                message,
                path,
                line,
            } => format_syntax_error(message, path, *line),
            TemplateError::Evaluation {
                message,
                path,
            } => format_evaluation_error(message, path),
            TemplateError::NestedRender {
                key,
                source,
            } => {
                let mut msg = format!("ERROR: Nested Template Failed\n\nVariable: {key}\n\n");
                msg.push_str(&source.format_with_context());
                msg
            }
            other => format!("ERROR: {other}\n"),
        }
    }
}

fn format_file_not_found(path: &Path) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template File Not Found\n\n");
    msg.push_str(&format!("Path: {}\n\n", path.display()));
    msg.push_str("SUGGESTION: Check the file name and the configured template root.\n");
    msg.push_str("Paths are resolved lexically: `..` segments are folded before lookup.\n\n");

    msg
}

fn format_variable_not_found(
    variable: &str,
    path: &Path,
    available: &[String],
    suggestions: &[String],
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    msg.push_str(&format!("Variable: {variable}\n"));
    msg.push_str(&format!("Template: {}\n\n", path.display()));

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {suggestion}\n"));
        }
        msg.push('\n');
    }

    if available.is_empty() {
        msg.push_str("No variables are bound for this template.\n\n");
    } else {
        msg.push_str("Available variables in this context:\n");
        for name in available.iter().take(10) {
            msg.push_str(&format!("  {name}\n"));
        }
        if available.len() > 10 {
            msg.push_str(&format!("  ... and {} more\n", available.len() - 10));
        }
        msg.push('\n');
    }

    msg
}

fn format_syntax_error(message: &str, path: &Path, line: Option<usize>) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    msg.push_str(&format!("Error: {message}\n"));
    msg.push_str(&format!("Template: {}\n", path.display()));

    if let Some(line) = line {
        msg.push_str(&format!("Line: {line}\n"));
    }

    msg.push_str("\nSUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Invalid filter or function names\n");
    msg.push_str("  - Missing quotes around string values\n\n");

    msg
}

fn format_evaluation_error(message: &str, path: &Path) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Evaluation Failed\n\n");
    msg.push_str(&format!("Error: {message}\n"));
    msg.push_str(&format!("Template: {}\n\n", path.display()));
    msg.push_str("SUGGESTION: The template parsed, but an expression failed at render time.\n");
    msg.push_str("Check the types of the values it uses and the arguments of its calls.\n\n");

    msg
}
