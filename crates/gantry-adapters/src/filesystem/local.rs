//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use gantry_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{GantryError, GantryResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> GantryResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> GantryResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn has_entries(&self, path: &Path) -> GantryResult<bool> {
        if !path.is_dir() {
            return Ok(false);
        }
        let mut entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        Ok(entries.next().is_some())
    }

    fn walk_files(&self, path: &Path) -> GantryResult<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().map_or_else(|| path.to_path_buf(), Path::to_path_buf),
                reason: format!("Failed to walk directory: {}", e),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn remove_dir_all(&self, path: &Path) -> GantryResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GantryError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
