//! Unified error handling for gantry core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions and a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for gantry core operations.
#[derive(Debug, Error, Clone)]
pub enum GantryError {
    /// Errors from the domain layer (bad documents, bad names).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O, cluster, orchestration).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl GantryError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run `gantry config path` to locate the config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in gantry".into(),
                "Please report this issue at: https://github.com/cosecruz/gantry/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether running the same command again may succeed.
    ///
    /// Every cluster write is create-or-fail or create-or-replace, so a
    /// failed synchronization can always be re-run.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(
                ApplicationError::ConfigObject { .. }
                    | ApplicationError::ResourceApply { .. }
                    | ApplicationError::SourceUnavailable { .. }
                    | ApplicationError::StoreLockError
            )
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    /// The cluster rejected a request.
    External,
    Internal,
}

/// Convenient result type alias.
pub type GantryResult<T> = Result<T, GantryError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> GantryResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> GantryResult<T> {
        self.map_err(|e| GantryError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
