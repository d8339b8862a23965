//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use gantry_core::{
    application::{ApplicationError, ports::Filesystem},
    error::GantryResult,
};

/// In-memory filesystem for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut files: Vec<_> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GantryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GantryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }
        if inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Is a directory".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path))
    }

    fn has_entries(&self, path: &Path) -> GantryResult<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let is_child = |p: &PathBuf| p.parent() == Some(path);
        Ok(inner.files.keys().any(is_child) || inner.directories.iter().any(is_child))
    }

    fn walk_files(&self, path: &Path) -> GantryResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        // Component-wise ordering matches a depth-first walk sorted by name.
        let mut files: Vec<_> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(path) && p.as_path() != path)
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    fn remove_dir_all(&self, path: &Path) -> GantryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/a/b.txt")).as_deref(), Some("x"));
        assert!(fs.is_dir(Path::new("/a")));
        assert!(!fs.is_dir(Path::new("/a/b.txt")));
    }

    #[test]
    fn walk_lists_nested_files_in_name_order() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/libs/b")).unwrap();
        fs.create_dir_all(Path::new("/p/interceptors")).unwrap();
        fs.write_file(Path::new("/p/libs/c.jar"), "").unwrap();
        fs.write_file(Path::new("/p/libs/b/z.jar"), "").unwrap();
        fs.write_file(Path::new("/p/libs/a.jar"), "").unwrap();

        assert_eq!(
            fs.walk_files(Path::new("/p/libs")).unwrap(),
            vec![
                PathBuf::from("/p/libs/a.jar"),
                PathBuf::from("/p/libs/b/z.jar"),
                PathBuf::from("/p/libs/c.jar"),
            ]
        );
        assert!(fs.has_entries(Path::new("/p/libs")).unwrap());
        assert!(!fs.has_entries(Path::new("/p/interceptors")).unwrap());
        assert!(fs.is_file(Path::new("/p/libs/a.jar")));
    }

    #[test]
    fn remove_is_recursive_and_shared_by_clones() {
        let fs = MemoryFilesystem::new();
        let view = fs.clone();
        fs.create_dir_all(Path::new("/p/meta")).unwrap();
        fs.write_file(Path::new("/p/meta/api.yaml"), "").unwrap();

        view.remove_dir_all(Path::new("/p")).unwrap();
        assert!(!fs.exists(Path::new("/p/meta")));
        assert!(fs.list_files().is_empty());
    }
}
