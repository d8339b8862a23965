//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core requests, wire adapters into
//! services and render results. No business logic lives here.

pub mod api;
pub mod completions;
pub mod config;
pub mod init;
