use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::error::DomainError;

/// Final project structure ready for materialization.
///
/// This is the output of the scaffold planning step.
/// It contains no business logic, only data.
#[derive(Debug, Clone)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content,
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: String) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidStructure("structure is empty".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();
            let path_str = path.display().to_string();

            if path.is_absolute() {
                return Err(DomainError::InvalidStructure(format!(
                    "absolute path not allowed: {path_str}"
                )));
            }
            if !seen.insert(path_str.clone()) {
                return Err(DomainError::InvalidStructure(format!(
                    "duplicate path: {path_str}"
                )));
            }
        }

        Ok(())
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}
