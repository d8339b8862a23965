//! Error handling for the gantry CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use gantry_core::error::{ErrorCategory as CoreCategory, GantryError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration key or value could not be read or rendered.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `gantry-core` or an adapter.
    #[error("{0}")]
    Core(#[from] GantryError),

    // ── System errors ──────────────────────────────────────────────────────
    /// Writing to the terminal, or another local I/O step, failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Run 'gantry config path' to locate the config file".into(),
                "Run 'gantry config list' to see the active values".into(),
            ],

            Self::Core(core) => {
                let mut suggestions = core.suggestions();
                if core.is_retryable() {
                    suggestions.push("Re-running the same command is safe".into());
                }
                suggestions
            }

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::External => ErrorCategory::External,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | External      |  1   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::External | ErrorCategory::Internal => 1,
        }
    }

    /// Render with ANSI colours, for a terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Render without ANSI codes, for pipes and log files.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if color { style(text) } else { text.to_owned() }
        };
        let mut out = String::new();

        out.push_str(&format!(
            "\n{} {}\n",
            paint("\u{2717}", |s| s.red().bold().to_string()),
            paint("Error:", |s| s.red().bold().to_string()),
        ));
        out.push_str(&format!("  {}\n", paint(&self.to_string(), |s| s.red().to_string())));

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                out.push_str(&format!(
                    "  {} {}\n",
                    paint("Caused by:", |s| s.dimmed().to_string()),
                    err
                ));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                paint("Suggestions:", |s| s.yellow().bold().to_string())
            ));
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{}\n",
                paint("Use -v / --verbose for more details.", |s| s.dimmed().to_string())
            ));
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::External => tracing::error!("Cluster error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// The cluster client or the cluster rejected a request.
    External,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
///
/// No blanket impl: it would overlap with both concrete impls.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, GantryError> {
    /// Core errors already name the object, file or namespace involved, so
    /// the context message is only logged.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| {
            tracing::debug!(context = %f().into(), "{e}");
            CliError::Core(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::application::ApplicationError;
    use gantry_core::domain::DomainError;
    use std::io;
    use std::path::PathBuf;

    fn core(err: impl Into<GantryError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        let err = core(DomainError::UnresolvedVariable {
            names: vec!["HOST".into()],
        });
        assert_eq!(err.exit_code(), 2);

        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/p"),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err = core(ApplicationError::SourceNotFound {
            location: "petstore.yaml".into(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exit_code_cluster_failure() {
        let err = core(ApplicationError::ResourceApply {
            name: "petstore".into(),
            namespace: "default".into(),
            reason: "forbidden".into(),
        });
        assert_eq!(err.category(), ErrorCategory::External);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn exit_code_internal() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn project_exists_suggests_force() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/test"),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn retryable_errors_say_so() {
        let err = core(ApplicationError::ConfigObject {
            name: "petstore-swagger".into(),
            namespace: "default".into(),
            reason: "connection refused".into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("Re-running")));

        let err = core(DomainError::InvalidInitialState {
            state: "RETIRED".into(),
        });
        assert!(!err.suggestions().iter().any(|s| s.contains("Re-running")));
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        });
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "writing manifest".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }

    #[test]
    fn into_cli_core_error() {
        let result: Result<(), GantryError> = Err(DomainError::InvalidStructure("x".into()).into());
        let cli = result.with_cli_context(|| "planning project");
        assert!(matches!(cli, Err(CliError::Core(_))));
    }
}
