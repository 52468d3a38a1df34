//! Application error handling for the `stencil` binary.
//!
//! Library code returns [`TemplateError`] or `anyhow::Error` with context.
//! At the top level the binary converts whatever it got into an
//! [`ErrorContext`] via [`user_friendly_error`], which adds a suggestion and
//! details and prints them with terminal colors.
//!
//! ```rust,no_run
//! use stencil::core::{StencilError, ErrorContext};
//!
//! let context = ErrorContext::new(StencilError::InvalidVariable {
//!     spec: "title".to_string(),
//!     reason: "expected KEY=VALUE".to_string(),
//! })
//! .with_suggestion("Pass variables as --var title=Home");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::TemplateError;

/// Errors surfaced to the user by the `stencil` binary.
#[derive(Debug, Error)]
pub enum StencilError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("{context}: {reason}")]
    Config {
        context: String,
        reason: String,
    },

    /// A `--var` argument that is not `KEY=VALUE`.
    #[error("Invalid variable '{spec}': {reason}")]
    InvalidVariable {
        spec: String,
        reason: String,
    },

    #[error("Invalid variables file {path}: {reason}")]
    VariablesFile {
        path: String,
        reason: String,
    },

    #[error("Permission denied: {operation}")]
    PermissionDenied {
        operation: String,
    },

    #[error("File system error: {operation}")]
    FileSystem {
        operation: String,
    },

    #[error("{message}")]
    Other {
        message: String,
    },
}

/// An error plus optional details and a suggestion for fixing it.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: StencilError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: StencilError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a suggestion.
///
/// Known error types are recognized by downcasting; anything else is reported
/// with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<StencilError>() {
        Ok(stencil_error) => return create_error_context(stencil_error),
        Err(error) => error,
    };

    let error = match error.downcast::<TemplateError>() {
        Ok(template_error) => return create_error_context(StencilError::Template(template_error)),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(StencilError::PermissionDenied {
                    operation: error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(StencilError::FileSystem {
                    operation: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Config loading wraps the toml error with the file path as context.
    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return create_error_context(StencilError::Config {
            context: error.to_string(),
            reason: toml_error.message().to_string(),
        });
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(StencilError::Other {
        message,
    })
}

fn create_error_context(error: StencilError) -> ErrorContext {
    match &error {
        StencilError::Template(template_error) => {
            let suggestion = template_suggestion(template_error);
            let details = template_error.format_with_context();
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details.trim_end())
        }
        StencilError::Config {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Valid keys are template_root, separator (\"native\", \"/\" or \"\\\\\") and autoescape",
        ),
        StencilError::InvalidVariable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass variables as --var KEY=VALUE; VALUE may be any JSON literal")
            .with_details("Values that are not valid JSON are bound as plain strings"),
        StencilError::VariablesFile {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("The --vars file must contain a single JSON object"),
        _ => ErrorContext::new(error),
    }
}

fn template_suggestion(error: &TemplateError) -> &'static str {
    match error {
        TemplateError::FileNotFound {
            ..
        } => "Check the template path and the --root directory",
        TemplateError::VariableNotFound {
            ..
        } => "Bind the variable with --var or --vars, or guard it with {% if var is defined %}",
        TemplateError::Syntax {
            ..
        } => "Check for unclosed {{ }} or {% %} delimiters",
        TemplateError::Evaluation {
            ..
        } => "Check the types of the values the failing expression uses",
        TemplateError::NestedRender {
            source,
            ..
        } => template_suggestion(source),
        TemplateError::UnboundVariable {
            ..
        } => "assign() can only write to variables that were bound before rendering",
        _ => "Run with --verbose for more detail",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_error_context_display() {
        let context = ErrorContext::new(StencilError::Other {
            message: "boom".to_string(),
        })
        .with_details("it broke")
        .with_suggestion("fix it");

        assert_eq!(context.to_string(), "boom\nDetails: it broke\nSuggestion: fix it");
    }

    #[test]
    fn test_template_error_is_recognized() {
        let error = anyhow::Error::from(TemplateError::FileNotFound {
            path: PathBuf::from("views/missing.html"),
        });

        let context = user_friendly_error(error);
        assert!(matches!(context.error, StencilError::Template(_)));
        assert!(context.suggestion.unwrap().contains("--root"));
        assert!(context.details.unwrap().contains("Template File Not Found"));
    }

    #[test]
    fn test_stencil_error_is_recognized() {
        let error = anyhow::Error::from(StencilError::InvalidVariable {
            spec: "oops".to_string(),
            reason: "missing '='".to_string(),
        });

        let context = user_friendly_error(error);
        assert!(context.error.to_string().contains("'oops'"));
        assert!(context.suggestion.is_some());
    }

    #[test]
    fn test_generic_error_keeps_chain() {
        let error = Err::<(), _>(std::fmt::Error)
            .context("inner step")
            .context("outer step")
            .unwrap_err();

        let context = user_friendly_error(error);
        let text = context.error.to_string();
        assert!(text.starts_with("outer step"));
        assert!(text.contains("1: inner step"));
    }

    #[test]
    fn test_config_parse_error_is_recognized() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "autoescape = \"maybe\"").unwrap();
        let error = crate::config::StencilConfig::load_from(&path).unwrap_err();

        let context = user_friendly_error(error);
        assert!(matches!(context.error, StencilError::Config { .. }));
        assert!(context.error.to_string().starts_with("Failed to parse config from"));
        assert!(context.suggestion.unwrap().contains("template_root"));
    }

    #[test]
    fn test_io_not_found() {
        let error = anyhow::Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));

        let context = user_friendly_error(error);
        assert!(matches!(context.error, StencilError::FileSystem { .. }));
    }
}
