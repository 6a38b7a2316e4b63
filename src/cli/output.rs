//! Output formatting for CLI commands

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

/// How results are rendered on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}' (expected text or json)", other)),
        }
    }
}

/// Output context for consistent formatting across commands
#[derive(Debug, Clone)]
pub struct OutputContext {
    /// Working directory for relative path calculation
    root: PathBuf,
    format: OutputFormat,
}

impl OutputContext {
    pub fn new(root: PathBuf, format: OutputFormat) -> Self {
        Self { root, format }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Convert an absolute path to relative (if within the working directory)
    pub fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }

    /// Print a response with data fields at top level, or its text rendering
    pub fn print_success<T: Serialize>(&self, data: T, text: impl FnOnce() -> String) {
        match self.format {
            OutputFormat::Json => {
                let mut response = serde_json::to_value(data).unwrap_or(serde_json::json!({}));
                if let Some(obj) = response.as_object_mut() {
                    obj.insert("success".to_string(), serde_json::json!(true));
                }
                print_json(&response);
            }
            OutputFormat::Text => print!("{}", text()),
        }
    }

    /// Print an error response; `code` is present for typed failures
    pub fn print_error(&self, message: &str, code: Option<&str>) {
        match self.format {
            OutputFormat::Json => print_json(&error_json(message, code)),
            OutputFormat::Text => match code {
                Some(code) => eprintln!("Error [{}]: {}", code, message),
                None => eprintln!("Error: {}", message),
            },
        }
    }
}

pub fn error_json(message: &str, code: Option<&str>) -> serde_json::Value {
    let mut response = serde_json::json!({
        "success": false,
        "error": message
    });
    if let Some(code) = code
        && let Some(obj) = response.as_object_mut()
    {
        obj.insert("code".to_string(), serde_json::json!(code));
    }
    response
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
