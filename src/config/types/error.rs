//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a modal configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read modal config `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("modal config is not valid TOML")]
    Toml(#[from] toml::de::Error),

    // Displayed inline; a #[from] would print the list twice through source()
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected key.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Every problem found by one `validate` pass.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics(Vec<ConfigDiagnostic>);

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.0.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.0
    }

    /// `Ok` when nothing was reported.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.len();
        write!(
            f,
            "{} ({} {})",
            "invalid modal config".red().bold(),
            count,
            if count == 1 { "problem" } else { "problems" }
        )?;
        for diag in &self.0 {
            write!(f, "\n  {} {}: {}", "-".dimmed(), diag.field, diag.message)?;
            if let Some(hint) = &diag.hint {
                write!(f, "\n    {} {}", "hint:".yellow(), hint)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_path() {
        let io_err = ConfigError::Io(
            PathBuf::from("modal.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert!(io_err.to_string().contains("modal.toml"));
    }

    #[test]
    fn test_diagnostics_list_every_problem() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());

        let mut diag = ConfigDiagnostics::new();
        diag.error_with_hint(FieldPath::new("id"), "must not be empty", "use `lcs-modal`");
        diag.error(FieldPath::new("timing.exit_ms"), "must be positive");
        assert_eq!(diag.len(), 2);

        let display = diag.into_result().unwrap_err().to_string();
        assert!(display.contains("2 problems"));
        assert!(display.contains("must not be empty"));
        assert!(display.contains("lcs-modal"));
        assert!(display.contains("timing.exit_ms"));
    }
}
