use crate::domain::{
    entities::{ApiDefinition, ApiResource, ProjectStructure},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Checks that run right before something leaves the core: a structure
/// about to be written, a definition about to be serialized, a manifest
/// about to be applied.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }

    /// A definition carrying an endpoint config must not also carry URLs.
    pub fn validate_definition(definition: &ApiDefinition) -> Result<(), DomainError> {
        if definition.has_endpoint_config()
            && (!definition.production_url.is_empty() || !definition.sandbox_url.is_empty())
        {
            return Err(DomainError::DefinitionParse {
                origin: "resolved definition".into(),
                reason: "endpointConfig and endpoint URLs are mutually exclusive".into(),
            });
        }
        Ok(())
    }

    pub fn validate_resource(resource: &ApiResource) -> Result<(), DomainError> {
        if resource.metadata.name.is_empty() {
            return Err(DomainError::InvalidStructure(
                "custom resource has no metadata.name".into(),
            ));
        }
        if resource.spec.definition.swagger_configmap_name.is_empty() {
            return Err(DomainError::InvalidStructure(
                "custom resource does not reference a definition config object".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_with_both_endpoint_forms_is_rejected() {
        let mut def = ApiDefinition {
            endpoint_config: Some(json!({ "endpointType": "http" })),
            ..Default::default()
        };
        def.production_url = "https://prod".into();
        assert!(DomainValidator::validate_definition(&def).is_err());

        def.normalize_endpoints();
        assert!(DomainValidator::validate_definition(&def).is_ok());
    }

    #[test]
    fn resource_requires_name_and_swagger_reference() {
        let mut resource = ApiResource::from_template(
            "apiVersion: v1\nkind: API\nmetadata: {}\nspec: {}\n",
            "test",
        )
        .unwrap();
        assert!(DomainValidator::validate_resource(&resource).is_err());

        resource.metadata.name = "pets".into();
        assert!(DomainValidator::validate_resource(&resource).is_err());

        resource.spec.definition.swagger_configmap_name = "pets-swagger".into();
        assert!(DomainValidator::validate_resource(&resource).is_ok());
    }
}
