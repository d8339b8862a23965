//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `GANTRY__CLUSTER__NAMESPACE=gateway`,
//!    `GANTRY__ENVIRONMENTS=dev,prod`
//! 3. Config file (`--config`, or [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

const ENV_PREFIX: &str = "GANTRY";
const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gateway environment names written into a new project's params file.
    pub environments: Vec<String>,
    /// Where and how resources are synchronized.
    pub cluster: ClusterConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Cluster client binary, looked up on `PATH` unless absolute.
    pub kubectl: PathBuf,
    pub namespace: String,
    pub replicas: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubectl: PathBuf::from("kubectl"),
            namespace: "default".into(),
            replicas: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// A file passed explicitly via `--config` must exist; the default
    /// location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialise default config")?;

        Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("environments"),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.gantry.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "gantry", "gantry")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".gantry.toml"))
    }
}
