//! Definition Resolver - builds the final API definition for a project.
//!
//! Linear pipeline:
//! 1. Load the embedded baseline definition
//! 2. Ingest an OpenAPI document, if given, and merge its derived fields
//! 3. Ingest an override definition, if given, after `${NAME}` substitution
//! 4. Apply the requested initial lifecycle state
//!
//! Nothing is written anywhere; the caller decides what to do with the
//! result.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::ports::{AssetStore, DocumentReader, Environment},
    domain::{
        ApiDefinition, AssetPath, DomainError, DomainValidator as validator, InitialState,
        OpenApiDocument, OpenApiVersion, env, merge, tree,
    },
    error::GantryResult,
};

/// Inputs for one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// OpenAPI document path or URL.
    pub spec_source: Option<String>,
    /// User override definition (YAML, may contain `${NAME}` markers).
    pub override_path: Option<PathBuf>,
    pub initial_state: Option<InitialState>,
}

/// Output of a resolution run.
#[derive(Debug, Clone)]
pub struct ResolvedDefinition {
    pub definition: ApiDefinition,
    /// The ingested OpenAPI document as YAML, or the embedded default.
    pub swagger_yaml: String,
    /// Version of the ingested document, `None` for the embedded default.
    pub spec_version: Option<OpenApiVersion>,
}

pub struct DefinitionResolver {
    assets: Box<dyn AssetStore>,
    reader: Box<dyn DocumentReader>,
    env: Box<dyn Environment>,
}

impl DefinitionResolver {
    pub fn new(
        assets: Box<dyn AssetStore>,
        reader: Box<dyn DocumentReader>,
        env: Box<dyn Environment>,
    ) -> Self {
        Self {
            assets,
            reader,
            env,
        }
    }

    #[instrument(
        skip_all,
        fields(
            spec = request.spec_source.as_deref().unwrap_or("<default>"),
            override_file = ?request.override_path,
        )
    )]
    pub fn resolve(&self, request: &ResolveRequest) -> GantryResult<ResolvedDefinition> {
        let mut definition = self.load_baseline()?;

        let (swagger_yaml, spec_version) = match &request.spec_source {
            Some(source) => {
                let document = self.load_spec(source)?;
                definition = self.ingest_spec(definition, &document)?;
                (document.to_yaml()?, Some(document.version()))
            }
            None => (self.asset(AssetPath::DEFAULT_SWAGGER)?, None),
        };

        if let Some(path) = &request.override_path {
            definition = self.ingest_override(definition, path)?;
        }

        if let Some(state) = request.initial_state {
            debug!(status = %state.status(), "Applying initial state");
            definition.status = state.status();
        }

        validator::validate_definition(&definition)?;
        info!(
            context = %definition.context,
            status = %definition.status,
            "Definition resolved"
        );

        Ok(ResolvedDefinition {
            definition,
            swagger_yaml,
            spec_version,
        })
    }

    /// Load and parse an OpenAPI document without resolving anything.
    pub fn load_spec(&self, source: &str) -> GantryResult<OpenApiDocument> {
        let raw = self.reader.read(source)?;
        let document = OpenApiDocument::parse(raw, source)?;
        info!(version = %document.version(), source, "Loaded OpenAPI document");
        Ok(document)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn asset(&self, logical_path: &str) -> GantryResult<String> {
        self.assets.get(logical_path).ok_or_else(|| {
            DomainError::BaselineLoad {
                asset: logical_path.to_owned(),
                reason: "asset not found".into(),
            }
            .into()
        })
    }

    fn load_baseline(&self) -> GantryResult<ApiDefinition> {
        let text = self.asset(AssetPath::DEFAULT_DEFINITION)?;
        ApiDefinition::from_yaml(text.as_bytes(), AssetPath::DEFAULT_DEFINITION).map_err(|e| {
            DomainError::BaselineLoad {
                asset: AssetPath::DEFAULT_DEFINITION.into(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn ingest_spec(
        &self,
        definition: ApiDefinition,
        document: &OpenApiDocument,
    ) -> GantryResult<ApiDefinition> {
        let derived = document.derive_definition();
        debug!(
            fields = derived.as_object().map_or(0, |m| m.len()),
            "Derived definition fields from OpenAPI"
        );

        let merged = merge::merge(definition.to_tree()?, derived);
        let mut definition = ApiDefinition::from_tree(merged, document.origin())?;
        if definition.normalize_endpoints() {
            debug!("Endpoint config present, cleared endpoint URLs");
        }
        Ok(definition)
    }

    fn ingest_override(
        &self,
        definition: ApiDefinition,
        path: &std::path::Path,
    ) -> GantryResult<ApiDefinition> {
        let origin = path.display().to_string();
        let raw = self.reader.read(&origin)?;
        let text = String::from_utf8(raw).map_err(|e| DomainError::DefinitionParse {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;

        debug!(
            variables = ?env::referenced_names(&text),
            "Substituting environment variables"
        );
        let text = env::substitute(&text, |name| self.env.var(name))?;

        let overlay = tree::parse(text.as_bytes()).map_err(|reason| DomainError::DefinitionParse {
            origin: origin.clone(),
            reason,
        })?;
        if !matches!(overlay, Value::Object(_)) {
            return Err(DomainError::DefinitionParse {
                origin,
                reason: "expected a mapping at the top level".into(),
            }
            .into());
        }

        let merged = merge::merge(definition.to_tree()?, overlay);
        let definition = ApiDefinition::from_tree(merged, &origin)?;
        info!(%origin, "Applied override definition");
        Ok(definition)
    }
}
