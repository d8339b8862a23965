//! OpenAPI 2.0 / 3.0 documents and their translation into definition fields.

use std::fmt;

use serde_json::{Map, Value, json};
use url::Url;

use crate::domain::{error::DomainError, tree};

/// Vendor extension overriding the derived context.
pub const EXT_BASE_PATH: &str = "x-gantry-basepath";
/// Vendor extension describing production endpoints.
pub const EXT_PRODUCTION_ENDPOINTS: &str = "x-gantry-production-endpoints";
/// Vendor extension describing sandbox endpoints.
pub const EXT_SANDBOX_ENDPOINTS: &str = "x-gantry-sandbox-endpoints";

const HTTP_VERBS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiVersion {
    /// Swagger 2.0
    V2,
    /// OpenAPI 3.0.x
    V3,
}

impl fmt::Display for OpenApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => write!(f, "swagger 2.0"),
            Self::V3 => write!(f, "openapi 3.0"),
        }
    }
}

/// A parsed OpenAPI document.
///
/// Keeps the raw bytes next to the normalized tree so the document can be
/// re-emitted without loss.
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    version: OpenApiVersion,
    tree: Value,
    raw: Vec<u8>,
    origin: String,
}

impl OpenApiDocument {
    /// Parse `raw` as an OpenAPI 2.0 or 3.0 document (YAML or JSON).
    pub fn parse(raw: Vec<u8>, origin: impl Into<String>) -> Result<Self, DomainError> {
        let origin = origin.into();
        let spec_err = |reason: String| DomainError::SpecParse {
            origin: origin.clone(),
            reason,
        };

        let tree = tree::parse(&raw).map_err(spec_err)?;
        let root = tree
            .as_object()
            .ok_or_else(|| spec_err("expected a mapping at the top level".into()))?;

        let version = match (version_field(root, "swagger"), version_field(root, "openapi")) {
            (Some(v), _) if v == "2.0" => OpenApiVersion::V2,
            (_, Some(v)) if v.starts_with("3.0") => OpenApiVersion::V3,
            (Some(v), _) | (_, Some(v)) => {
                return Err(spec_err(format!("unsupported specification version '{v}'")));
            }
            (None, None) => {
                return Err(spec_err(
                    "missing `swagger` or `openapi` version field".into(),
                ));
            }
        };

        if version == OpenApiVersion::V3 {
            serde_json::from_value::<openapiv3::OpenAPI>(tree.clone())
                .map_err(|e| spec_err(e.to_string()))?;
        } else if !root.get("info").is_some_and(Value::is_object) {
            return Err(spec_err("missing `info` object".into()));
        }

        Ok(Self {
            version,
            tree,
            raw,
            origin,
        })
    }

    pub fn version(&self) -> OpenApiVersion {
        self.version
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Re-emit the document as YAML.
    pub fn to_yaml(&self) -> Result<String, DomainError> {
        tree::to_yaml(&self.tree).map_err(|reason| DomainError::Serialization {
            what: "OpenAPI document",
            reason,
        })
    }

    /// Translate the document into definition vocabulary.
    ///
    /// The result is a partial definition tree meant to be merged onto the
    /// baseline. `name` is never derived; callers set it.
    pub fn derive_definition(&self) -> Value {
        let mut derived = Map::new();

        if let Some(info) = self.tree.get("info") {
            for key in ["version", "description"] {
                if let Some(value) = info.get(key).and_then(Value::as_str) {
                    derived.insert(key.into(), Value::from(value));
                }
            }
        }

        if let Some(tags) = self.tree.get("tags").and_then(Value::as_array) {
            let names: Vec<Value> = tags
                .iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str))
                .map(Value::from)
                .collect();
            derived.insert("tags".into(), Value::Array(names));
        }

        if let Some(context) = self.context() {
            derived.insert("context".into(), Value::from(context));
        }

        self.derive_endpoints(&mut derived);

        let resources = self.resources();
        if !resources.is_empty() {
            derived.insert("resources".into(), Value::Array(resources));
        }

        Value::Object(derived)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn extension(&self, key: &str) -> Option<&Value> {
        self.tree.get(key).filter(|v| !v.is_null())
    }

    fn context(&self) -> Option<String> {
        if let Some(base) = self.extension(EXT_BASE_PATH).and_then(Value::as_str) {
            return Some(base.to_owned());
        }
        let path = match self.version {
            OpenApiVersion::V2 => self
                .tree
                .get("basePath")
                .and_then(Value::as_str)
                .map(str::to_owned),
            OpenApiVersion::V3 => self.server_url().map(|url| split_url(&url).1),
        }?;
        let path = path.trim_end_matches('/');
        (!path.is_empty()).then(|| path.to_owned())
    }

    /// The URL the API is served from, if the document says.
    fn served_url(&self) -> Option<String> {
        match self.version {
            OpenApiVersion::V2 => {
                let host = self.tree.get("host").and_then(Value::as_str)?;
                let base_path = self
                    .tree
                    .get("basePath")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let scheme = self.scheme();
                Some(format!(
                    "{scheme}://{host}{}",
                    base_path.trim_end_matches('/')
                ))
            }
            OpenApiVersion::V3 => {
                let url = self.server_url()?;
                let (origin, _) = split_url(&url);
                origin.map(|_| url.trim_end_matches('/').to_owned())
            }
        }
    }

    fn scheme(&self) -> String {
        let schemes: Vec<&str> = self
            .tree
            .get("schemes")
            .and_then(Value::as_array)
            .map(|s| s.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if schemes.contains(&"https") {
            "https".into()
        } else {
            schemes.first().copied().unwrap_or("https").to_owned()
        }
    }

    /// First server URL with its variables replaced by their defaults.
    fn server_url(&self) -> Option<String> {
        let server = self.tree.get("servers")?.as_array()?.first()?;
        let mut url = server.get("url")?.as_str()?.to_owned();
        if let Some(vars) = server.get("variables").and_then(Value::as_object) {
            for (name, var) in vars {
                if let Some(default) = var.get("default").and_then(Value::as_str) {
                    url = url.replace(&format!("{{{name}}}"), default);
                }
            }
        }
        Some(url)
    }

    fn derive_endpoints(&self, derived: &mut Map<String, Value>) {
        let production = self
            .extension(EXT_PRODUCTION_ENDPOINTS)
            .and_then(EndpointSet::from_extension);
        let sandbox = self
            .extension(EXT_SANDBOX_ENDPOINTS)
            .and_then(EndpointSet::from_extension);

        if production.is_none() && sandbox.is_none() {
            if let Some(url) = self.served_url() {
                derived.insert("productionUrl".into(), Value::from(url.clone()));
                derived.insert("sandboxUrl".into(), Value::from(url));
            }
            return;
        }

        let structured = [&production, &sandbox]
            .into_iter()
            .flatten()
            .any(EndpointSet::is_structured);

        if !structured {
            if let Some(url) = production.and_then(|set| set.urls.into_iter().next()) {
                derived.insert("productionUrl".into(), Value::from(url));
            }
            if let Some(url) = sandbox.and_then(|set| set.urls.into_iter().next()) {
                derived.insert("sandboxUrl".into(), Value::from(url));
            }
            return;
        }

        let endpoint_type = [&production, &sandbox]
            .into_iter()
            .flatten()
            .find_map(|set| set.kind.clone())
            .unwrap_or_else(|| "load_balance".into());

        let mut config = Map::new();
        config.insert("endpointType".into(), Value::from(endpoint_type));
        if let Some(set) = production {
            config.insert("productionEndpoints".into(), set.to_tree());
        }
        if let Some(set) = sandbox {
            config.insert("sandboxEndpoints".into(), set.to_tree());
        }
        derived.insert("endpointConfig".into(), Value::Object(config));
        derived.insert("productionUrl".into(), Value::from(""));
        derived.insert("sandboxUrl".into(), Value::from(""));
    }

    fn resources(&self) -> Vec<Value> {
        let Some(paths) = self.tree.get("paths").and_then(Value::as_object) else {
            return Vec::new();
        };

        paths
            .iter()
            .filter(|(path, _)| path.starts_with('/'))
            .map(|(path, item)| {
                let verbs: Vec<Value> = item
                    .as_object()
                    .map(|ops| {
                        ops.keys()
                            .filter(|k| HTTP_VERBS.contains(&k.as_str()))
                            .map(|k| Value::from(k.to_uppercase()))
                            .collect()
                    })
                    .unwrap_or_default();
                json!({ "path": path, "verbs": verbs })
            })
            .collect()
    }
}

fn version_field(root: &Map<String, Value>, key: &str) -> Option<String> {
    match root.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Split a server URL into `(origin, path)`. Relative URLs have no origin.
fn split_url(raw: &str) -> (Option<String>, String) {
    match Url::parse(raw) {
        Ok(url) => {
            let origin = url.origin().ascii_serialization();
            (Some(origin), url.path().to_owned())
        }
        Err(_) => (None, raw.to_owned()),
    }
}

/// Endpoints declared through a vendor extension.
#[derive(Debug, Clone)]
struct EndpointSet {
    kind: Option<String>,
    urls: Vec<String>,
}

impl EndpointSet {
    /// Accepts a bare URL, a list of URLs, or `{type, urls}`.
    fn from_extension(value: &Value) -> Option<Self> {
        let (kind, urls) = match value {
            Value::String(url) => (None, vec![url.clone()]),
            Value::Array(items) => (None, string_items(items)),
            Value::Object(obj) => {
                let kind = obj.get("type").and_then(Value::as_str).map(normalize_kind);
                let urls = obj
                    .get("urls")
                    .and_then(Value::as_array)
                    .map(|items| string_items(items))
                    .unwrap_or_default();
                (kind, urls)
            }
            _ => return None,
        };
        (!urls.is_empty()).then_some(Self { kind, urls })
    }

    fn is_structured(&self) -> bool {
        self.kind.is_some() || self.urls.len() > 1
    }

    fn to_tree(&self) -> Value {
        Value::Array(self.urls.iter().map(|url| json!({ "url": url })).collect())
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}

fn normalize_kind(kind: &str) -> String {
    match kind.to_ascii_lowercase().as_str() {
        "loadbalance" | "load_balance" | "load-balance" => "load_balance".into(),
        "failover" => "failover".into(),
        other => other.to_owned(),
    }
}
