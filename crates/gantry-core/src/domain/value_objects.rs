// ============================================================================
// value_objects.rs - Immutable, validated domain primitives
// ============================================================================

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::DomainError;

// ============================================================================
// ProjectLayout
// ============================================================================

/// Fixed on-disk layout of a gateway project.
pub struct ProjectLayout;

impl ProjectLayout {
    /// Directories created by `gantry init`, relative to the project root.
    pub const DIRECTORIES: [&'static str; 9] = [
        "meta",
        "image",
        "docs",
        "docs/file-contents",
        "sequences/in-sequence",
        "sequences/out-sequence",
        "sequences/fault-sequence",
        Self::INTERCEPTORS_DIR,
        Self::LIBS_DIR,
    ];

    pub const DEFINITION_FILE: &'static str = "meta/api.yaml";
    pub const SWAGGER_FILE: &'static str = "meta/swagger.yaml";
    pub const PARAMS_FILE: &'static str = "api_params.yaml";
    pub const README_FILE: &'static str = "README.md";
    pub const INTERCEPTORS_DIR: &'static str = "interceptors";
    pub const LIBS_DIR: &'static str = "libs";

    /// File extensions treated as binary interceptor libraries.
    pub const LIBRARY_EXTENSIONS: [&'static str; 1] = ["jar"];

    pub fn is_library(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| Self::LIBRARY_EXTENSIONS.contains(&ext))
    }
}

// ============================================================================
// AssetPath
// ============================================================================

/// Logical paths of the assets shipped inside the binary.
pub struct AssetPath;

impl AssetPath {
    pub const DEFAULT_DEFINITION: &'static str = "init/default_api.yaml";
    pub const DEFAULT_SWAGGER: &'static str = "init/swagger-default.yaml";
    /// One environment entry of `api_params.yaml`; cloned per environment.
    pub const PARAMS_ENTRY: &'static str = "init/api_params.yaml";
    pub const README: &'static str = "init/README.md";
    pub const RESOURCE_TEMPLATE: &'static str = "kubernetes_resources/api_cr.yaml";

    pub const ALL: [&'static str; 5] = [
        Self::DEFAULT_DEFINITION,
        Self::DEFAULT_SWAGGER,
        Self::PARAMS_ENTRY,
        Self::README,
        Self::RESOURCE_TEMPLATE,
    ];
}

// ============================================================================
// ConfigMode
// ============================================================================

/// How a named configuration object is written to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    /// Create; fails if the object already exists.
    #[default]
    Create,
    /// Create or replace.
    Update,
}

impl fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

// ============================================================================
// ApiName
// ============================================================================

/// Name of an API in the cluster.
///
/// Must be usable as a resource name: lowercase alphanumerics, `-` and `.`,
/// starting and ending with an alphanumeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiName(String);

impl ApiName {
    /// Longest accepted API name, leaving room for the object suffixes.
    pub const MAX_LEN: usize = 200;

    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        match resource_name_problem(&name, Self::MAX_LEN) {
            Some(reason) => Err(DomainError::InvalidApiName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<name>-swagger`
    pub fn swagger_config(&self) -> String {
        format!("{}-swagger", self.0)
    }

    /// `<name>-interceptors`
    pub fn interceptors_config(&self) -> String {
        format!("{}-interceptors", self.0)
    }

    /// `<name>-<library file name>`, checked to be a usable object name.
    pub fn library_config(&self, file_name: &str) -> Result<String, DomainError> {
        let name = format!("{}-{}", self.0, file_name);
        match resource_name_problem(&name, MAX_OBJECT_NAME_LEN) {
            Some(reason) => Err(DomainError::InvalidLibrary {
                file: file_name.to_owned(),
                reason: format!("object name '{name}' is invalid: {reason}"),
            }),
            None => Ok(name),
        }
    }
}

/// Longest name the cluster accepts for a configuration object.
const MAX_OBJECT_NAME_LEN: usize = 253;

/// Why `name` is not a valid cluster resource name, if it is not.
///
/// Lowercase alphanumerics, `-` and `.`, starting and ending with an
/// alphanumeric.
fn resource_name_problem(name: &str, max_len: usize) -> Option<String> {
    if name.is_empty() {
        return Some("name cannot be empty".into());
    }
    if name.len() > max_len {
        return Some(format!("name is longer than {max_len} characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Some("only lowercase letters, digits, '-' and '.' are allowed".into());
    }
    let alnum = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !alnum(name.chars().next()) || !alnum(name.chars().last()) {
        return Some("name must start and end with a letter or digit".into());
    }
    None
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
