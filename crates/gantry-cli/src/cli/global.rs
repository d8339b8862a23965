//! Flags shared by every subcommand, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::Args;
use clap::builder::FalseyValueParser;
use serde::{Deserialize, Serialize};

/// Global arguments for all commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (pipeline steps, cluster calls)
    -vv     - Debug level (merged documents, kubectl arguments)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Honoured automatically when `NO_COLOR` is set to any non-falsey value
    /// (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "GANTRY_CONFIG",
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        help = "Output format (defaults to output.format from config)"
    )]
    pub output_format: Option<OutputFormat>,
}

/// How the CLI should render its output.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    /// Human-readable with colors.
    Human,
    /// Plain text without colors.
    Plain,
    /// JSON documents on stdout.
    Json,
}
