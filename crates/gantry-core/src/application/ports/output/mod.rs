//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `gantry-adapters` crate provides implementations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::ConfigMode;
use crate::error::GantryResult;

/// Port for filesystem operations used by scaffolding and synchronization.
///
/// Implemented by:
/// - `gantry_adapters::filesystem::LocalFilesystem` (production)
/// - `gantry_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GantryResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> GantryResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether the directory at `path` contains anything. A missing
    /// directory is empty.
    fn has_entries(&self, path: &Path) -> GantryResult<bool>;

    /// Every regular file below `path`, recursively, visiting each
    /// directory's entries in file-name order. A missing directory yields
    /// nothing.
    fn walk_files(&self, path: &Path) -> GantryResult<Vec<PathBuf>>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> GantryResult<()>;
}

/// Port for the read-only assets shipped with the tool.
///
/// Assets are addressed by the logical paths in [`crate::domain::AssetPath`].
/// A missing asset is a packaging defect, so lookups return `Option` and the
/// caller turns `None` into a baseline error.
pub trait AssetStore: Send + Sync {
    fn get(&self, logical_path: &str) -> Option<String>;
}

/// Port for reading input documents (OpenAPI specs, override definitions).
///
/// `location` is a filesystem path or, when the adapter supports it, an
/// `http(s)://` URL.
pub trait DocumentReader: Send + Sync {
    fn read(&self, location: &str) -> GantryResult<Vec<u8>>;
}

/// Port for looking up environment variables during substitution.
pub trait Environment: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Port for the cluster orchestration subsystem.
///
/// Calls are synchronous and attempted once.
pub trait ClusterExecutor: Send + Sync {
    /// Create (or, in [`ConfigMode::Update`], create-or-replace) a named
    /// configuration object holding the file or directory at `source`.
    fn create_or_update_config(
        &self,
        name: &str,
        namespace: &str,
        source: &Path,
        mode: ConfigMode,
    ) -> GantryResult<()>;

    /// Apply the manifest at `manifest` to `namespace`.
    fn apply_resource(&self, namespace: &str, manifest: &Path) -> GantryResult<()>;
}
