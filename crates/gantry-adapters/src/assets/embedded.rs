//! Assets compiled into the binary.
//!
//! Every logical path in [`AssetPath`] maps to a file under the crate's
//! `assets/` directory, so a missing asset is caught at build time rather
//! than at run time.

use gantry_core::{application::ports::AssetStore, domain::AssetPath};

/// Read-only store over the assets shipped with gantry.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    pub fn new() -> Self {
        Self
    }

    /// Raw content for a logical path, without allocating.
    pub fn content(logical_path: &str) -> Option<&'static str> {
        let content = match logical_path {
            AssetPath::DEFAULT_DEFINITION => include_str!("../../assets/init/default_api.yaml"),
            AssetPath::DEFAULT_SWAGGER => include_str!("../../assets/init/swagger-default.yaml"),
            AssetPath::PARAMS_ENTRY => include_str!("../../assets/init/api_params.yaml"),
            AssetPath::README => include_str!("../../assets/init/README.md"),
            AssetPath::RESOURCE_TEMPLATE => {
                include_str!("../../assets/kubernetes_resources/api_cr.yaml")
            }
            _ => return None,
        };
        Some(content)
    }
}

impl AssetStore for EmbeddedAssets {
    fn get(&self, logical_path: &str) -> Option<String> {
        Self::content(logical_path).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use gantry_core::domain::{ApiDefinition, ApiResource, LifecycleStatus, OpenApiDocument};

    use super::*;

    #[test]
    fn every_logical_path_is_embedded() {
        for path in AssetPath::ALL {
            assert!(EmbeddedAssets.get(path).is_some(), "{path} missing");
        }
        assert!(EmbeddedAssets.get("init/unknown.yaml").is_none());
    }

    #[test]
    fn baseline_definition_parses() {
        let text = EmbeddedAssets::content(AssetPath::DEFAULT_DEFINITION).unwrap();
        let def = ApiDefinition::from_yaml(text.as_bytes(), AssetPath::DEFAULT_DEFINITION).unwrap();
        assert_eq!(def.name, "");
        assert_eq!(def.status, LifecycleStatus::Created);
        assert!(!def.has_endpoint_config());
    }

    #[test]
    fn default_swagger_is_valid_openapi() {
        let text = EmbeddedAssets::content(AssetPath::DEFAULT_SWAGGER).unwrap();
        assert!(OpenApiDocument::parse(text.as_bytes().to_vec(), AssetPath::DEFAULT_SWAGGER).is_ok());
    }

    #[test]
    fn resource_template_parses() {
        let text = EmbeddedAssets::content(AssetPath::RESOURCE_TEMPLATE).unwrap();
        let resource = ApiResource::from_template(text, AssetPath::RESOURCE_TEMPLATE).unwrap();
        assert_eq!(resource.kind, "API");
        assert_eq!(resource.spec.replicas, 1);
    }
}
