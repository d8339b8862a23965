//! Scaffold Service - lays out a new gateway project on disk.
//!
//! This service coordinates the `init` workflow:
//! 1. Check the target location
//! 2. Plan the project structure from a resolved definition
//! 3. Write it through the filesystem port, rolling back on failure

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::{AssetStore, Filesystem}},
    domain::{
        ApiDefinition, AssetPath, DomainError, DomainValidator as validator, FsEntry,
        ProjectLayout, ProjectStructure, tree,
    },
    error::GantryResult,
};

/// Inputs for one scaffold run.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub root: PathBuf,
    pub definition: ApiDefinition,
    pub swagger_yaml: String,
    /// Gateway environment names written into the params file.
    pub environments: Vec<String>,
    /// Initialise into an existing directory.
    pub force: bool,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    assets: Box<dyn AssetStore>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    pub fn new(assets: Box<dyn AssetStore>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { assets, filesystem }
    }

    /// Check that `root` may be scaffolded into.
    ///
    /// Callers run this before resolving anything so a bad target fails
    /// before any work is done.
    pub fn check_target(&self, root: &Path, force: bool) -> GantryResult<()> {
        if !self.filesystem.exists(root) {
            return Ok(());
        }
        if !self.filesystem.is_dir(root) {
            return Err(ApplicationError::NotADirectory {
                path: root.to_path_buf(),
            }
            .into());
        }
        if !force {
            return Err(ApplicationError::ProjectExists {
                path: root.to_path_buf(),
            }
            .into());
        }
        warn!(path = %root.display(), "Initialising into existing directory");
        Ok(())
    }

    /// Scaffold a new project.
    #[instrument(skip_all, fields(root = %request.root.display(), force = request.force))]
    pub fn scaffold(&self, request: &ScaffoldRequest) -> GantryResult<ProjectStructure> {
        self.check_target(&request.root, request.force)?;

        let structure = self.plan(request)?;
        validator::validate_project_structure(&structure)?;
        info!(entries = structure.entry_count(), "Project planned");

        self.write_structure(&structure)?;

        info!("Scaffold completed successfully");
        Ok(structure)
    }

    /// Build the project structure without touching the filesystem.
    pub fn plan(&self, request: &ScaffoldRequest) -> GantryResult<ProjectStructure> {
        let mut structure = ProjectStructure::new(&request.root);

        for dir in ProjectLayout::DIRECTORIES {
            structure.add_directory(dir);
        }

        structure.add_file(ProjectLayout::DEFINITION_FILE, request.definition.to_yaml()?);
        structure.add_file(ProjectLayout::SWAGGER_FILE, request.swagger_yaml.clone());
        structure.add_file(
            ProjectLayout::PARAMS_FILE,
            self.render_params(&request.environments)?,
        );
        structure.add_file(ProjectLayout::README_FILE, self.asset(AssetPath::README)?);

        Ok(structure)
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

    /// `environments:` list with one copy of the entry template per name.
    fn render_params(&self, environments: &[String]) -> GantryResult<String> {
        let text = self.asset(AssetPath::PARAMS_ENTRY)?;
        let entry = tree::parse(text.as_bytes()).map_err(|reason| DomainError::BaselineLoad {
            asset: AssetPath::PARAMS_ENTRY.into(),
            reason,
        })?;

        let entries = environments
            .iter()
            .map(|name| {
                let mut env = entry.clone();
                if let Value::Object(map) = &mut env {
                    map.insert("name".into(), Value::from(name.as_str()));
                }
                env
            })
            .collect();

        let mut params = Map::new();
        params.insert("environments".into(), Value::Array(entries));
        tree::to_yaml(&Value::Object(params)).map_err(|reason| {
            DomainError::Serialization {
                what: "project params",
                reason,
            }
            .into()
        })
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(&self, structure: &ProjectStructure) -> GantryResult<()> {
        let root = structure.root();
        let created_root = !self.filesystem.exists(root);

        match self.write_all(structure) {
            Ok(()) => {
                info!("Successfully wrote all files");
                Ok(())
            }
            Err(e) if created_root => {
                warn!("Write failed, attempting rollback");
                self.rollback(root);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> GantryResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for entry in structure.entries() {
            let path = root.join(entry.path());
            match entry {
                FsEntry::Directory(_) => {
                    debug!(path = %path.display(), "Creating directory");
                    self.filesystem.create_dir_all(&path)?;
                }
                FsEntry::File(file) => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    debug!(path = %path.display(), "Writing file");
                    self.filesystem.write_file(&path, &file.content)?;
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}
