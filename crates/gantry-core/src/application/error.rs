//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! documents themselves. Document errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A named configuration object could not be created or updated.
    #[error("Failed to write config object '{name}' in namespace '{namespace}': {reason}")]
    ConfigObject {
        name: String,
        namespace: String,
        reason: String,
    },

    /// The final custom resource apply failed.
    #[error("Failed to apply API resource '{name}' in namespace '{namespace}': {reason}")]
    ResourceApply {
        name: String,
        namespace: String,
        reason: String,
    },

    /// An external command ran but failed.
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// A document source (path or URL) does not exist.
    #[error("Source not found: {location}")]
    SourceNotFound { location: String },

    /// A document source exists but could not be read.
    #[error("Could not read {location}: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("In-memory store lock poisoned")]
    StoreLockError,

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Target location exists and is a file.
    #[error("{path} exists and is not a directory")]
    NotADirectory { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigObject { namespace, .. } | Self::ResourceApply { namespace, .. } => vec![
                "Check that kubectl can reach the cluster: kubectl cluster-info".into(),
                format!("Check that namespace '{}' exists", namespace),
                "Use `gantry update api` if the objects already exist".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Try running the command yourself: {}", command),
                "Set cluster.kubectl in the config file if kubectl is not on PATH".into(),
            ],
            Self::SourceNotFound { location } => vec![
                format!("Check that '{}' exists", location),
                "Paths are resolved relative to the current directory".into(),
            ],
            Self::SourceUnavailable { .. } => vec![
                "Check file permissions or network connectivity".into(),
                "Try again in a moment".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to initialise into it anyway".into(),
                "Choose a different project path".into(),
            ],
            Self::NotADirectory { path } => vec![
                format!("Remove or rename the file at {}", path.display()),
                "Choose a different project path".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigObject { .. } | Self::ResourceApply { .. } | Self::CommandFailed { .. } => {
                ErrorCategory::External
            }
            Self::SourceNotFound { .. } => ErrorCategory::NotFound,
            Self::SourceUnavailable { .. } | Self::FilesystemError { .. } => {
                ErrorCategory::Internal
            }
            Self::StoreLockError => ErrorCategory::Internal,
            Self::ProjectExists { .. } | Self::NotADirectory { .. } => ErrorCategory::Validation,
        }
    }
}
