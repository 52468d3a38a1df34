//! `stencil render`: render one template file.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StencilConfig;
use crate::core::StencilError;
use crate::templating::TemplateRenderer;

#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template file to render
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Bind a variable. VALUE is parsed as JSON when possible, else taken as a string
    #[arg(long, value_name = "KEY=VALUE")]
    pub var: Vec<String>,

    /// JSON file holding an object of variables. `--var` wins on conflicts
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Script include (URL or literal `<script>` block)
    #[arg(long, value_name = "REF")]
    pub script: Vec<String>,

    /// Stylesheet include (URL or literal `<style>` block)
    #[arg(long, value_name = "REF")]
    pub style: Vec<String>,

    /// Directory that relative template paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Write the rendered page to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RenderCommand {
    pub fn execute(self, config: &StencilConfig) -> Result<()> {
        let mut renderer = TemplateRenderer::from_config(self.file.as_str(), config);
        if let Some(root) = self.root {
            renderer = renderer.with_root(root);
        }

        if let Some(path) = &self.vars_file {
            for (key, value) in load_variables_file(path)? {
                renderer.set_variable(key, value);
            }
        }
        for spec in &self.var {
            let (key, value) = parse_variable(spec)?;
            renderer.set_variable(key, value);
        }
        for script in self.script {
            renderer.add_script_include(script);
        }
        for style in self.style {
            renderer.add_style_include(style);
        }

        tracing::info!(
            file = %self.file,
            path = %renderer.resolved_path(),
            variables = renderer.variables().len(),
            "rendering"
        );

        let success = match &self.output {
            Some(output) => {
                let page = renderer.render_to_string()?;
                fs::write(output, page)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                true
            }
            None => renderer.render()?,
        };

        if !success {
            return Err(StencilError::Other {
                message: format!("Template {} reported an unsuccessful render", self.file),
            }
            .into());
        }

        Ok(())
    }
}

/// Split `KEY=VALUE`, parsing the value as JSON and falling back to a string.
pub fn parse_variable(spec: &str) -> Result<(String, Value), StencilError> {
    let (key, raw) = spec.split_once('=').ok_or_else(|| StencilError::InvalidVariable {
        spec: spec.to_string(),
        reason: "expected KEY=VALUE".to_string(),
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(StencilError::InvalidVariable {
            spec: spec.to_string(),
            reason: "variable name is empty".to_string(),
        });
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn load_variables_file(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read variables from {}", path.display()))?;

    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StencilError::VariablesFile {
            path: path.display().to_string(),
            reason: "expected a JSON object".to_string(),
        }
        .into()),
        Err(e) => Err(StencilError::VariablesFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()),
    }
}
