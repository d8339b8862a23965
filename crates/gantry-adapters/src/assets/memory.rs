//! In-memory asset store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use gantry_core::{
    application::{ApplicationError, ports::AssetStore},
    domain::AssetPath,
    error::GantryResult,
};

use super::EmbeddedAssets;

/// Thread-safe, mutable asset store.
///
/// Starts empty or seeded from the embedded assets; tests replace or remove
/// entries to simulate packaging defects.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssets {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding a copy of every embedded asset.
    pub fn with_builtin() -> GantryResult<Self> {
        let store = Self::new();
        for path in AssetPath::ALL {
            if let Some(content) = EmbeddedAssets::content(path) {
                store.insert(path, content)?;
            }
        }
        Ok(store)
    }

    pub fn insert(&self, logical_path: &str, content: impl Into<String>) -> GantryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(logical_path.to_owned(), content.into());
        Ok(())
    }

    pub fn remove(&self, logical_path: &str) -> GantryResult<Option<String>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(logical_path))
    }

    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetStore for InMemoryAssets {
    fn get(&self, logical_path: &str) -> Option<String> {
        self.inner.read().ok()?.get(logical_path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_matches_embedded() {
        let store = InMemoryAssets::with_builtin().unwrap();
        assert_eq!(store.len(), AssetPath::ALL.len());
        assert_eq!(
            store.get(AssetPath::README),
            EmbeddedAssets.get(AssetPath::README)
        );
    }

    #[test]
    fn entries_can_be_replaced_and_removed() {
        let store = InMemoryAssets::new();
        assert!(store.is_empty());

        store.insert(AssetPath::README, "one").unwrap();
        store.insert(AssetPath::README, "two").unwrap();
        assert_eq!(store.get(AssetPath::README).as_deref(), Some("two"));

        assert_eq!(store.remove(AssetPath::README).unwrap().as_deref(), Some("two"));
        assert!(store.get(AssetPath::README).is_none());
    }
}
