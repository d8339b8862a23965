//! Resource Synchronizer - pushes a project into the cluster.
//!
//! Order matters: every configuration object the custom resource refers to
//! is created first, and the resource is applied last. Everything that can
//! be checked locally (sources, object names) is checked before the first
//! cluster call. There is no rollback; objects created before a cluster
//! failure stay in place and a re-run is safe.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{AssetStore, ClusterExecutor, Filesystem},
    },
    domain::{
        ApiName, ApiResource, AssetPath, ConfigMode, DomainError, DomainValidator as validator,
        ProjectLayout,
    },
    error::GantryResult,
};

/// Inputs for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub name: ApiName,
    pub namespace: String,
    pub replicas: u32,
    /// Written to the manifest; tells the operator to replace existing state.
    pub override_existing: bool,
    /// Set on updates so the operator notices an otherwise identical spec.
    pub update_timestamp: Option<String>,
    pub mode: ConfigMode,
}

impl SyncRequest {
    pub fn new(name: ApiName, namespace: impl Into<String>) -> Self {
        Self {
            name,
            namespace: namespace.into(),
            replicas: 1,
            override_existing: false,
            update_timestamp: None,
            mode: ConfigMode::Create,
        }
    }
}

/// What a successful run created.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub swagger_config: String,
    pub interceptor_config: Option<String>,
    pub library_configs: Vec<String>,
    /// The applied manifest, as YAML.
    pub manifest: String,
}

impl SyncReport {
    /// Every configuration object written, in creation order.
    pub fn config_objects(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.swagger_config.as_str())
            .chain(self.interceptor_config.as_deref())
            .chain(self.library_configs.iter().map(String::as_str))
    }
}

/// A configuration object to create, and the file or directory it holds.
#[derive(Debug)]
struct PlannedObject {
    name: String,
    source: PathBuf,
}

pub struct ResourceSynchronizer {
    assets: Box<dyn AssetStore>,
    filesystem: Box<dyn Filesystem>,
    executor: Box<dyn ClusterExecutor>,
}

impl ResourceSynchronizer {
    pub fn new(
        assets: Box<dyn AssetStore>,
        filesystem: Box<dyn Filesystem>,
        executor: Box<dyn ClusterExecutor>,
    ) -> Self {
        Self {
            assets,
            filesystem,
            executor,
        }
    }

    /// Synchronize a project directory, or a single swagger file, into the
    /// cluster.
    #[instrument(
        skip_all,
        fields(
            api = %request.name,
            namespace = %request.namespace,
            mode = %request.mode,
            source = %source.display(),
        )
    )]
    pub fn synchronize(&self, request: &SyncRequest, source: &Path) -> GantryResult<SyncReport> {
        let template = self.load_template()?;
        let project_dir = self.project_dir(source)?;
        let swagger_path = match &project_dir {
            Some(dir) => dir.join(ProjectLayout::SWAGGER_FILE),
            None => source.to_path_buf(),
        };
        if !self.filesystem.is_file(&swagger_path) {
            return Err(ApplicationError::SourceNotFound {
                location: swagger_path.display().to_string(),
            }
            .into());
        }

        let mut interceptors = None;
        let mut libraries = Vec::new();
        if let Some(dir) = &project_dir {
            let interceptors_dir = dir.join(ProjectLayout::INTERCEPTORS_DIR);
            if self.filesystem.has_entries(&interceptors_dir)? {
                interceptors = Some(PlannedObject {
                    name: request.name.interceptors_config(),
                    source: interceptors_dir,
                });
            } else {
                debug!("No interceptors found");
            }
            libraries = self.plan_libraries(&request.name, &dir.join(ProjectLayout::LIBS_DIR))?;
        }

        let swagger_config = request.name.swagger_config();
        self.create_config(request, &swagger_config, &swagger_path)?;
        for object in interceptors.iter().chain(&libraries) {
            self.create_config(request, &object.name, &object.source)?;
        }

        let interceptor_config = interceptors.map(|object| object.name);
        let library_configs: Vec<String> = libraries.into_iter().map(|object| object.name).collect();

        let mut resource = template;
        resource.metadata.name = request.name.to_string();
        resource.metadata.namespace = request.namespace.clone();
        resource.spec.definition.swagger_configmap_name = swagger_config.clone();
        resource.spec.definition.interceptors.bundle = interceptor_config.clone();
        resource.spec.definition.interceptors.libraries = library_configs.clone();
        resource.spec.replicas = request.replicas;
        resource.spec.r#override = request.override_existing;
        resource.spec.update_time_stamp = request.update_timestamp.clone();
        validator::validate_resource(&resource)?;

        let manifest = resource.to_yaml()?;
        self.apply(request, &manifest)?;

        info!(
            objects = 1 + usize::from(interceptor_config.is_some()) + library_configs.len(),
            "API synchronized"
        );
        Ok(SyncReport {
            swagger_config,
            interceptor_config,
            library_configs,
            manifest,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn load_template(&self) -> GantryResult<ApiResource> {
        let text = self.assets.get(AssetPath::RESOURCE_TEMPLATE).ok_or_else(|| {
            DomainError::BaselineLoad {
                asset: AssetPath::RESOURCE_TEMPLATE.into(),
                reason: "asset not found".into(),
            }
        })?;
        Ok(ApiResource::from_template(&text, AssetPath::RESOURCE_TEMPLATE)?)
    }

    /// `Some(dir)` for a project directory, `None` for a single file.
    fn project_dir(&self, source: &Path) -> GantryResult<Option<PathBuf>> {
        if self.filesystem.is_dir(source) {
            Ok(Some(source.to_path_buf()))
        } else if self.filesystem.exists(source) {
            Ok(None)
        } else {
            Err(ApplicationError::SourceNotFound {
                location: source.display().to_string(),
            }
            .into())
        }
    }

    /// One object per binary library under `libs`, in walk order.
    ///
    /// Object names come from file names alone, so two libraries with the
    /// same file name in different subdirectories would collide.
    fn plan_libraries(&self, api: &ApiName, libs: &Path) -> GantryResult<Vec<PlannedObject>> {
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut planned = Vec::new();

        for path in self.filesystem.walk_files(libs)? {
            if !ProjectLayout::is_library(&path) {
                continue;
            }
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let relative = path.strip_prefix(libs).unwrap_or(&path).to_path_buf();

            let name = api.library_config(&file_name)?;
            if let Some(first) = seen.insert(name.clone(), relative.clone()) {
                return Err(DomainError::InvalidLibrary {
                    file: relative.display().to_string(),
                    reason: format!(
                        "'{}' already maps to object '{}'",
                        first.display(),
                        name
                    ),
                }
                .into());
            }
            planned.push(PlannedObject { name, source: path });
        }
        Ok(planned)
    }

    fn create_config(&self, request: &SyncRequest, name: &str, source: &Path) -> GantryResult<()> {
        debug!(name, source = %source.display(), "Writing config object");
        self.executor
            .create_or_update_config(name, &request.namespace, source, request.mode)
            .map_err(|e| {
                ApplicationError::ConfigObject {
                    name: name.to_owned(),
                    namespace: request.namespace.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Write the manifest to a scoped temp file and apply it. The file is
    /// removed when `manifest_file` drops, on every path out of here.
    fn apply(&self, request: &SyncRequest, manifest: &str) -> GantryResult<()> {
        let fs_error = |path: &Path, e: std::io::Error| ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut manifest_file = tempfile::Builder::new()
            .prefix("apicr-")
            .suffix(".yaml")
            .tempfile()
            .map_err(|e| fs_error(&std::env::temp_dir(), e))?;
        manifest_file
            .write_all(manifest.as_bytes())
            .and_then(|()| manifest_file.flush())
            .map_err(|e| fs_error(manifest_file.path(), e))?;

        debug!(manifest = %manifest_file.path().display(), "Applying API resource");
        self.executor
            .apply_resource(&request.namespace, manifest_file.path())
            .map_err(|e| {
                ApplicationError::ResourceApply {
                    name: request.name.to_string(),
                    namespace: request.namespace.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::GantryError;

    const TEMPLATE: &str = "apiVersion: gateway.gantry.dev/v1alpha1\nkind: API\nmetadata:\n  name: \"\"\nspec:\n  definition:\n    swaggerConfigmapName: \"\"\n  replicas: 1\n  override: false\n";

    struct Assets;

    impl AssetStore for Assets {
        fn get(&self, logical_path: &str) -> Option<String> {
            (logical_path == AssetPath::RESOURCE_TEMPLATE).then(|| TEMPLATE.into())
        }
    }

    /// Project tree: directories and file paths only, contents are never read.
    #[derive(Default)]
    struct Tree {
        dirs: BTreeSet<PathBuf>,
        files: BTreeSet<PathBuf>,
    }

    impl Tree {
        fn project() -> Self {
            Self::default().file(&format!("/pets/{}", ProjectLayout::SWAGGER_FILE))
        }

        fn dir(mut self, path: &str) -> Self {
            for dir in Path::new(path).ancestors() {
                self.dirs.insert(dir.to_path_buf());
            }
            self
        }

        fn file(mut self, path: &str) -> Self {
            let path = Path::new(path);
            if let Some(parent) = path.parent() {
                self = self.dir(&parent.to_string_lossy());
            }
            self.files.insert(path.to_path_buf());
            self
        }
    }

    impl Filesystem for Tree {
        fn create_dir_all(&self, _path: &Path) -> GantryResult<()> {
            unreachable!("synchronization never writes to the project")
        }

        fn write_file(&self, _path: &Path, _content: &str) -> GantryResult<()> {
            unreachable!("synchronization never writes to the project")
        }

        fn exists(&self, path: &Path) -> bool {
            self.dirs.contains(path) || self.files.contains(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }

        fn has_entries(&self, path: &Path) -> GantryResult<bool> {
            let is_child = |p: &PathBuf| p.parent() == Some(path);
            Ok(self.files.iter().any(is_child) || self.dirs.iter().any(is_child))
        }

        fn walk_files(&self, path: &Path) -> GantryResult<Vec<PathBuf>> {
            Ok(self
                .files
                .iter()
                .filter(|p| p.starts_with(path) && p.as_path() != path)
                .cloned()
                .collect())
        }

        fn remove_dir_all(&self, _path: &Path) -> GantryResult<()> {
            unreachable!("synchronization never writes to the project")
        }
    }

    #[derive(Default)]
    struct Calls {
        configs: Vec<String>,
        applied: Vec<String>,
        manifest_paths: Vec<PathBuf>,
    }

    #[derive(Default)]
    struct FakeExecutor {
        calls: Arc<Mutex<Calls>>,
        fail_config: Option<String>,
        fail_apply: bool,
    }

    impl ClusterExecutor for FakeExecutor {
        fn create_or_update_config(
            &self,
            name: &str,
            _namespace: &str,
            _source: &Path,
            _mode: ConfigMode,
        ) -> GantryResult<()> {
            if self.fail_config.as_deref() == Some(name) {
                return Err(ApplicationError::CommandFailed {
                    command: "kubectl create configmap".into(),
                    reason: "already exists".into(),
                }
                .into());
            }
            self.calls.lock().unwrap().configs.push(name.to_owned());
            Ok(())
        }

        fn apply_resource(&self, _namespace: &str, manifest: &Path) -> GantryResult<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.manifest_paths.push(manifest.to_path_buf());
            calls.applied.push(fs::read_to_string(manifest).unwrap());
            if self.fail_apply {
                return Err(ApplicationError::CommandFailed {
                    command: "kubectl apply".into(),
                    reason: "forbidden".into(),
                }
                .into());
            }
            Ok(())
        }
    }

    fn synchronizer(tree: Tree, executor: FakeExecutor) -> ResourceSynchronizer {
        ResourceSynchronizer::new(Box::new(Assets), Box::new(tree), Box::new(executor))
    }

    fn request() -> SyncRequest {
        SyncRequest::new(ApiName::new("pets").unwrap(), "gw")
    }

    #[test]
    fn swagger_only_project() {
        let executor = FakeExecutor::default();
        let calls = executor.calls.clone();
        let sync = synchronizer(Tree::project(), executor);

        let report = sync.synchronize(&request(), Path::new("/pets")).unwrap();

        assert_eq!(report.swagger_config, "pets-swagger");
        assert!(report.interceptor_config.is_none());
        assert!(report.library_configs.is_empty());
        assert_eq!(calls.lock().unwrap().configs, vec!["pets-swagger"]);
        assert!(report.manifest.contains("swaggerConfigmapName: pets-swagger"));
        assert!(report.manifest.contains("namespace: gw"));
    }

    #[test]
    fn empty_interceptors_dir_is_skipped() {
        let sync = synchronizer(
            Tree::project().dir("/pets/interceptors"),
            FakeExecutor::default(),
        );

        let report = sync.synchronize(&request(), Path::new("/pets")).unwrap();
        assert!(report.interceptor_config.is_none());
        assert!(!report.manifest.contains("bundle"));
    }

    #[test]
    fn interceptors_and_libraries_in_order() {
        let tree = Tree::project()
            .file("/pets/interceptors/check.xml")
            .file("/pets/libs/b.jar")
            .file("/pets/libs/a.jar")
            .file("/pets/libs/notes.txt");

        let executor = FakeExecutor::default();
        let calls = executor.calls.clone();
        let report = synchronizer(tree, executor)
            .synchronize(&request(), Path::new("/pets"))
            .unwrap();

        assert_eq!(report.interceptor_config.as_deref(), Some("pets-interceptors"));
        assert_eq!(report.library_configs, vec!["pets-a.jar", "pets-b.jar"]);
        assert_eq!(
            report.config_objects().collect::<Vec<_>>(),
            calls.lock().unwrap().configs
        );
    }

    #[test]
    fn duplicate_library_names_fail_before_any_call() {
        let tree = Tree::project()
            .file("/pets/libs/a/auth.jar")
            .file("/pets/libs/b/auth.jar");
        let executor = FakeExecutor::default();
        let calls = executor.calls.clone();

        let mut req = request();
        req.mode = ConfigMode::Update;
        let err = synchronizer(tree, executor)
            .synchronize(&req, Path::new("/pets"))
            .unwrap_err();

        match &err {
            GantryError::Domain(DomainError::InvalidLibrary { file, reason }) => {
                assert_eq!(file, "b/auth.jar");
                assert!(reason.contains("a/auth.jar"));
                assert!(reason.contains("pets-auth.jar"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.category(), crate::error::ErrorCategory::Validation);
        let calls = calls.lock().unwrap();
        assert!(calls.configs.is_empty());
        assert!(calls.applied.is_empty());
    }

    #[test]
    fn unusable_library_name_fails_before_any_call() {
        let tree = Tree::project()
            .file("/pets/libs/good.jar")
            .file("/pets/libs/Auth_Lib.jar");
        let executor = FakeExecutor::default();
        let calls = executor.calls.clone();

        let err = synchronizer(tree, executor)
            .synchronize(&request(), Path::new("/pets"))
            .unwrap_err();

        assert!(matches!(
            err,
            GantryError::Domain(DomainError::InvalidLibrary { ref file, .. }) if file == "Auth_Lib.jar"
        ));
        assert!(calls.lock().unwrap().configs.is_empty());
    }

    #[test]
    fn nested_libraries_are_included() {
        let tree = Tree::project()
            .file("/pets/libs/auth.jar")
            .file("/pets/libs/vendor/metrics.jar");

        let report = synchronizer(tree, FakeExecutor::default())
            .synchronize(&request(), Path::new("/pets"))
            .unwrap();
        assert_eq!(report.library_configs, vec!["pets-auth.jar", "pets-metrics.jar"]);
    }

    #[test]
    fn swagger_failure_stops_before_apply() {
        let executor = FakeExecutor {
            fail_config: Some("pets-swagger".into()),
            ..Default::default()
        };
        let calls = executor.calls.clone();
        let sync = synchronizer(Tree::project(), executor);

        let err = sync.synchronize(&request(), Path::new("/pets")).unwrap_err();
        match err {
            GantryError::Application(ApplicationError::ConfigObject { name, namespace, .. }) => {
                assert_eq!(name, "pets-swagger");
                assert_eq!(namespace, "gw");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(calls.lock().unwrap().applied.is_empty());
    }

    #[test]
    fn manifest_file_is_removed_after_failed_apply() {
        let executor = FakeExecutor {
            fail_apply: true,
            ..Default::default()
        };
        let calls = executor.calls.clone();
        let sync = synchronizer(Tree::project(), executor);

        let err = sync.synchronize(&request(), Path::new("/pets")).unwrap_err();
        assert!(matches!(
            err,
            GantryError::Application(ApplicationError::ResourceApply { .. })
        ));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.configs, vec!["pets-swagger"]);
        let path = &calls.manifest_paths[0];
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("apicr-"));
        assert!(!path.exists());
    }

    #[test]
    fn single_file_source_skips_project_dirs() {
        let tree = Tree::project().file("/pets/libs/auth.jar");
        let executor = FakeExecutor::default();
        let calls = executor.calls.clone();
        let sync = synchronizer(tree, executor);

        let mut req = request();
        req.mode = ConfigMode::Update;
        req.update_timestamp = Some("2026-10-18T00:00:00Z".into());
        let swagger = format!("/pets/{}", ProjectLayout::SWAGGER_FILE);
        let report = sync.synchronize(&req, Path::new(&swagger)).unwrap();

        assert_eq!(calls.lock().unwrap().configs, vec!["pets-swagger"]);
        assert!(report.manifest.contains("updateTimeStamp"));
    }

    #[test]
    fn missing_source_fails_before_any_call() {
        let executor = FakeExecutor::default();
        let calls = executor.calls.clone();
        let sync = synchronizer(Tree::default(), executor);

        let err = sync
            .synchronize(&request(), Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(
            err,
            GantryError::Application(ApplicationError::SourceNotFound { .. })
        ));
        assert!(calls.lock().unwrap().configs.is_empty());
    }
}
