//! Output management and formatting.
//!
//! Human-facing lines go through [`OutputManager::success`] and friends and
//! are dropped in quiet and JSON mode; documents (manifests, JSON reports)
//! go through [`OutputManager::document`] / [`OutputManager::json`] and are
//! only dropped in quiet mode.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = args.output_format.unwrap_or(config.output.format);
        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.suppress_messages() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.decorated("\u{2713}", msg, |s| s.green().bold().to_string(), |s| {
            s.green().to_string()
        })
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.decorated("\u{26a0}", msg, |s| s.yellow().bold().to_string(), |s| {
            s.yellow().to_string()
        })
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.decorated("\u{2139}", msg, |s| s.blue().bold().to_string(), |s| {
            s.blue().to_string()
        })
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.suppress_messages() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// `  • <item>` list entry.
    pub fn bullet(&self, item: &str) -> io::Result<()> {
        self.print(&format!("  \u{2022} {item}"))
    }

    /// Raw document (YAML manifest, config dump), verbatim.
    pub fn document(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_str(text)?;
        if !text.ends_with('\n') {
            self.term.write_line("")?;
        }
        Ok(())
    }

    /// Pretty-printed JSON value.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.document(&text)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    fn suppress_messages(&self) -> bool {
        self.quiet || self.is_json()
    }

    fn decorated(
        &self,
        icon: &str,
        msg: &str,
        paint_icon: impl Fn(&str) -> String,
        paint_msg: impl Fn(&str) -> String,
    ) -> io::Result<()> {
        if self.suppress_messages() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{icon} {msg}")
        } else {
            format!("{} {}", paint_icon(icon), paint_msg(msg))
        };
        self.term.write_line(&line)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
