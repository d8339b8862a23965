use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// The API custom resource applied to the cluster.
///
/// Only the fields gantry sets are modelled. Anything else the manifest
/// template carries is preserved through `extra` maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMetadata,
    pub spec: ApiResourceSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceSpec {
    #[serde(default)]
    pub definition: DefinitionSource,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default)]
    pub r#override: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time_stamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where the operator finds the definition and its interceptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSource {
    #[serde(default)]
    pub swagger_configmap_name: String,
    #[serde(default)]
    pub interceptors: InterceptorRefs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorRefs {
    /// Config object holding the interceptor code bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    /// One config object per binary library, in enumeration order.
    #[serde(default)]
    pub libraries: Vec<String>,
}

fn default_replicas() -> u32 {
    1
}

impl ApiResource {
    /// Parse the manifest template.
    pub fn from_template(text: &str, asset: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(text).map_err(|e| DomainError::BaselineLoad {
            asset: asset.to_owned(),
            reason: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(self).map_err(|e| DomainError::Serialization {
            what: "API custom resource",
            reason: e.to_string(),
        })
    }
}
