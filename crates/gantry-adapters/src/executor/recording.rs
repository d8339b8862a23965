//! Recording cluster executor for tests and `--dry-run`.
//!
//! Records every call, snapshots the manifest content at apply time (the
//! file is gone once synchronization returns), and can be told to fail a
//! specific config object or the final apply.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use serde::Serialize;
use tracing::debug;

use gantry_core::{
    application::{ApplicationError, ports::ClusterExecutor},
    domain::ConfigMode,
    error::GantryResult,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ExecutorCall {
    Config {
        name: String,
        namespace: String,
        source: PathBuf,
        mode: ConfigMode,
    },
    Apply {
        namespace: String,
        manifest_path: PathBuf,
        manifest: String,
    },
}

#[derive(Debug, Default)]
struct RecordingInner {
    calls: Vec<ExecutorCall>,
    fail_config: Option<String>,
    fail_apply: bool,
}

/// Executor that records instead of talking to a cluster. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    inner: Arc<RwLock<RecordingInner>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the config object called `name`.
    pub fn failing_config(self, name: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_config = Some(name.into());
        }
        self
    }

    /// Fail the final apply.
    pub fn failing_apply(self) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_apply = true;
        }
        self
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.inner
            .read()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    /// Names of config objects written, in call order.
    pub fn config_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ExecutorCall::Config { name, .. } => Some(name),
                ExecutorCall::Apply { .. } => None,
            })
            .collect()
    }

    /// Manifests applied, in call order.
    pub fn applied_manifests(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ExecutorCall::Apply { manifest, .. } => Some(manifest),
                ExecutorCall::Config { .. } => None,
            })
            .collect()
    }
}

impl ClusterExecutor for RecordingExecutor {
    fn create_or_update_config(
        &self,
        name: &str,
        namespace: &str,
        source: &Path,
        mode: ConfigMode,
    ) -> GantryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.fail_config.as_deref() == Some(name) {
            return Err(ApplicationError::CommandFailed {
                command: format!("create configmap {name}"),
                reason: "injected failure".into(),
            }
            .into());
        }

        debug!(name, namespace, %mode, "Recorded config object");
        inner.calls.push(ExecutorCall::Config {
            name: name.to_owned(),
            namespace: namespace.to_owned(),
            source: source.to_path_buf(),
            mode,
        });
        Ok(())
    }

    fn apply_resource(&self, namespace: &str, manifest: &Path) -> GantryResult<()> {
        let content =
            std::fs::read_to_string(manifest).map_err(|e| ApplicationError::FilesystemError {
                path: manifest.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.calls.push(ExecutorCall::Apply {
            namespace: namespace.to_owned(),
            manifest_path: manifest.to_path_buf(),
            manifest: content,
        });

        if inner.fail_apply {
            return Err(ApplicationError::CommandFailed {
                command: "apply".into(),
                reason: "injected failure".into(),
            }
            .into());
        }
        Ok(())
    }
}
