// ============================================================================
// domain/error.rs - DEFINITION AND DOCUMENT ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input Errors (user-correctable)
    // ========================================================================
    #[error("Invalid OpenAPI document from {origin}: {reason}")]
    SpecParse { origin: String, reason: String },

    #[error("Unresolved environment variable(s): {}", names.join(", "))]
    UnresolvedVariable { names: Vec<String> },

    #[error("Invalid API definition from {origin}: {reason}")]
    DefinitionParse { origin: String, reason: String },

    #[error("Invalid initial API state '{state}'")]
    InvalidInitialState { state: String },

    #[error("Invalid API name '{name}': {reason}")]
    InvalidApiName { name: String, reason: String },

    #[error("Library '{file}' cannot be synchronized: {reason}")]
    InvalidLibrary { file: String, reason: String },

    // ========================================================================
    // Packaging Errors (not user-correctable)
    // ========================================================================
    #[error("Built-in asset '{asset}' could not be loaded: {reason}")]
    BaselineLoad { asset: String, reason: String },

    #[error("Failed to serialize {what}: {reason}")]
    Serialization { what: &'static str, reason: String },

    #[error("Invalid project structure: {0}")]
    InvalidStructure(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SpecParse { origin, .. } => vec![
                format!("Check that '{}' is an OpenAPI 2.0 or 3.0 document", origin),
                "Both YAML and JSON are accepted".into(),
                "The document must declare a `swagger` or `openapi` version field".into(),
            ],
            Self::UnresolvedVariable { names } => {
                let mut suggestions = vec!["Export the missing variables before running:".into()];
                for name in names {
                    suggestions.push(format!("  export {}=...", name));
                }
                suggestions.push("Or add them to a .env file in the current directory".into());
                suggestions
            }
            Self::DefinitionParse { origin, .. } => vec![
                format!("Check the YAML in '{}'", origin),
                "The definition must be a mapping, e.g. `status: PUBLISHED`".into(),
            ],
            Self::InvalidInitialState { .. } => vec![format!(
                "Valid initial states: {}",
                crate::domain::InitialState::VALID.join(", ")
            )],
            Self::InvalidApiName { .. } => vec![
                "Use lowercase letters, digits and '-'".into(),
                "Example: --name petstore".into(),
            ],
            Self::InvalidLibrary { file, .. } => vec![
                format!("Rename '{}' under libs/", file),
                "Library file names become object names: lowercase letters, digits, '-' and '.'"
                    .into(),
                "Each library file name must be unique across libs/ and its subdirectories"
                    .into(),
            ],
            Self::BaselineLoad { asset, .. } => vec![
                format!("The built-in asset '{}' is missing or corrupt", asset),
                "This is a packaging defect; please reinstall gantry".into(),
            ],
            Self::Serialization { .. } | Self::InvalidStructure(_) => {
                vec!["See documentation for more details".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SpecParse { .. }
            | Self::UnresolvedVariable { .. }
            | Self::DefinitionParse { .. }
            | Self::InvalidInitialState { .. }
            | Self::InvalidApiName { .. }
            | Self::InvalidLibrary { .. } => ErrorCategory::Validation,
            Self::BaselineLoad { .. } | Self::Serialization { .. } | Self::InvalidStructure(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
