//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gantry_core::domain::{ApiName, InitialState};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "gantry",
    bin_name = "gantry",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "API gateway projects, from OpenAPI to cluster",
    long_about = "gantry scaffolds API gateway projects from OpenAPI documents \
                  and synchronizes them into a Kubernetes cluster as \
                  configuration objects plus an API custom resource.",
    after_help = "EXAMPLES:\n\
        \x20 gantry init petstore --oas petstore.yaml\n\
        \x20 gantry init petstore --oas https://example.com/openapi.json -d overrides.yaml\n\
        \x20 gantry add api -n petstore -f ./petstore --namespace gateway\n\
        \x20 gantry update api -n petstore -f ./petstore --override\n\
        \x20 gantry completions bash > /usr/share/bash-completion/completions/gantry",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialise a new API project.
    #[command(
        about = "Initialise an API project",
        after_help = "EXAMPLES:\n\
            \x20 gantry init petstore\n\
            \x20 gantry init petstore --oas petstore.yaml --initial-state PUBLISHED\n\
            \x20 gantry init petstore -d api.yaml --force"
    )]
    Init(InitArgs),

    /// Add a resource to the cluster.
    #[command(
        about = "Add a resource to the cluster",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 gantry add api -n petstore -f ./petstore\n\
            \x20 gantry add api -n petstore -f swagger.yaml --replicas 2"
    )]
    Add(ResourceCommands),

    /// Update a resource in the cluster.
    #[command(
        about = "Update a resource in the cluster",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 gantry update api -n petstore -f ./petstore\n\
            \x20 gantry update api -n petstore -f ./petstore --override"
    )]
    Update(ResourceCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 gantry completions bash > ~/.local/share/bash-completion/completions/gantry\n\
            \x20 gantry completions zsh  > ~/.zfunc/_gantry\n\
            \x20 gantry completions fish > ~/.config/fish/completions/gantry.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the gantry configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 gantry config get cluster.namespace\n\
            \x20 gantry config list\n\
            \x20 gantry config path"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `gantry init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to create.
    #[arg(value_name = "PATH", help = "Project directory to create")]
    pub path: PathBuf,

    /// OpenAPI document to start from.
    #[arg(
        long = "oas",
        value_name = "PATH|URL",
        help = "OpenAPI 2.0/3.0 document (local path or http(s) URL)"
    )]
    pub oas: Option<String>,

    /// Definition overrides, merged last.  `${VAR}` references are
    /// substituted from the environment.
    #[arg(
        short = 'd',
        long = "definition",
        value_name = "FILE",
        help = "API definition overrides (YAML)"
    )]
    pub definition: Option<PathBuf>,

    /// Lifecycle state of the new API.
    #[arg(
        long = "initial-state",
        value_name = "STATE",
        value_parser = parse_initial_state,
        help = "Initial lifecycle state (CREATED, PROTOTYPED, PUBLISHED)"
    )]
    pub initial_state: Option<InitialState>,

    /// Initialise into an existing directory.
    #[arg(short = 'f', long = "force", help = "Initialise into an existing directory")]
    pub force: bool,
}

// ── add / update ──────────────────────────────────────────────────────────────

/// Resources `add` and `update` operate on.
#[derive(Debug, Subcommand)]
pub enum ResourceCommands {
    /// An API project or a single swagger file.
    Api(ApiArgs),
}

/// Arguments for `gantry add api` and `gantry update api`.
#[derive(Debug, Args)]
pub struct ApiArgs {
    /// Name of the API in the cluster.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        value_parser = parse_api_name,
        help = "API name (lowercase letters, digits, '-' and '.')"
    )]
    pub name: ApiName,

    /// Project directory or swagger file.
    #[arg(
        short = 'f',
        long = "from-file",
        value_name = "PATH",
        help = "Project directory or swagger file"
    )]
    pub from_file: PathBuf,

    /// Gateway replicas (defaults to `cluster.replicas`).
    #[arg(
        long = "replicas",
        value_name = "COUNT",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of gateway replicas"
    )]
    pub replicas: Option<u32>,

    /// Target namespace (defaults to `cluster.namespace`).
    #[arg(long = "namespace", value_name = "NAMESPACE", help = "Kubernetes namespace")]
    pub namespace: Option<String>,

    /// Ask the operator to replace any existing state for this API.
    #[arg(long = "override", help = "Override existing gateway state")]
    pub override_existing: bool,

    /// Print what would be created without touching the cluster.
    #[arg(long = "dry-run", help = "Show what would be applied without applying")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `gantry completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `gantry config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `cluster.namespace`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

fn parse_initial_state(s: &str) -> Result<InitialState, String> {
    s.parse::<InitialState>().map_err(|_| {
        format!(
            "'{s}' is not a valid initial state (expected one of: {})",
            InitialState::VALID.join(", ")
        )
    })
}

fn parse_api_name(s: &str) -> Result<ApiName, String> {
    ApiName::new(s).map_err(|e| e.to_string())
}

// ── tests ─────────────────────────────────────────────────────────────────────
