//! YAML/JSON text to merge tree, and back.
//!
//! YAML is parsed into `serde_yaml::Value` first and then converted, because
//! OpenAPI documents routinely use integer mapping keys (`200:` under
//! `responses`) that `serde_json::Value` refuses to deserialize directly.
//! Converting through the serializer turns those keys into strings.

use serde_json::Value;

/// Parse YAML (or JSON, which is a YAML subset) into a merge tree.
pub fn parse(text: &[u8]) -> Result<Value, String> {
    let yaml: serde_yaml::Value = serde_yaml::from_slice(text).map_err(|e| e.to_string())?;
    serde_json::to_value(yaml).map_err(|e| e.to_string())
}

/// Emit a tree as YAML.
pub fn to_yaml(tree: &Value) -> Result<String, String> {
    serde_yaml::to_string(tree).map_err(|e| e.to_string())
}
