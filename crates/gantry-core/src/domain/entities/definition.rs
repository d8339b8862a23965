use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{error::DomainError, tree};

/// Lifecycle state of an API on the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    #[default]
    Created,
    Prototyped,
    Published,
    Blocked,
    Deprecated,
    Retired,
}

impl LifecycleStatus {
    pub const ALL: [LifecycleStatus; 6] = [
        Self::Created,
        Self::Prototyped,
        Self::Published,
        Self::Blocked,
        Self::Deprecated,
        Self::Retired,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Prototyped => "PROTOTYPED",
            Self::Published => "PUBLISHED",
            Self::Blocked => "BLOCKED",
            Self::Deprecated => "DEPRECATED",
            Self::Retired => "RETIRED",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInitialState {
                state: s.to_owned(),
            })
    }
}

/// A lifecycle state a freshly initialised project may start in.
///
/// Only constructible from the states in [`InitialState::VALID`], so the
/// resolver never has to re-check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialState(LifecycleStatus);

impl InitialState {
    pub const VALID: [&'static str; 3] = ["CREATED", "PROTOTYPED", "PUBLISHED"];

    pub fn status(self) -> LifecycleStatus {
        self.0
    }
}

impl FromStr for InitialState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::VALID.contains(&s) {
            return Err(DomainError::InvalidInitialState { state: s.to_owned() });
        }
        s.parse().map(Self)
    }
}

/// The canonical, mergeable description of one API.
///
/// Only the fields the tooling reasons about are modelled; everything else
/// rides along in [`ApiDefinition::extra`] so merges never drop data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: LifecycleStatus,
    #[serde(default)]
    pub production_url: String,
    #[serde(default)]
    pub sandbox_url: String,
    /// Structured endpoint description (load-balance, failover...).
    /// Authoritative over the URL fields when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiDefinition {
    /// Build a definition from a merge tree.
    ///
    /// `origin` names the document the tree came from, for error messages.
    pub fn from_tree(tree: Value, origin: &str) -> Result<Self, DomainError> {
        if !tree.is_object() {
            return Err(DomainError::DefinitionParse {
                origin: origin.to_owned(),
                reason: "expected a mapping at the top level".into(),
            });
        }

        let mut definition: Self =
            serde_json::from_value(tree).map_err(|e| DomainError::DefinitionParse {
                origin: origin.to_owned(),
                reason: e.to_string(),
            })?;
        definition.normalize_endpoints();
        Ok(definition)
    }

    /// Parse a YAML definition document.
    pub fn from_yaml(text: &[u8], origin: &str) -> Result<Self, DomainError> {
        let tree = tree::parse(text).map_err(|reason| DomainError::DefinitionParse {
            origin: origin.to_owned(),
            reason,
        })?;
        Self::from_tree(tree, origin)
    }

    pub fn to_tree(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self).map_err(|e| DomainError::Serialization {
            what: "API definition",
            reason: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(self).map_err(|e| DomainError::Serialization {
            what: "API definition",
            reason: e.to_string(),
        })
    }

    /// Enforce the endpoint invariant: a present endpoint config clears the
    /// production and sandbox URLs. Returns `true` if anything was cleared.
    pub fn normalize_endpoints(&mut self) -> bool {
        if self.endpoint_config.is_none() {
            return false;
        }
        let cleared = !self.production_url.is_empty() || !self.sandbox_url.is_empty();
        self.production_url.clear();
        self.sandbox_url.clear();
        cleared
    }

    pub fn has_endpoint_config(&self) -> bool {
        self.endpoint_config.is_some()
    }
}
