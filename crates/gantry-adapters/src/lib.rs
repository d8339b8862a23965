//! Infrastructure adapters for gantry.
//!
//! This crate implements the ports defined in `gantry-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod assets;
pub mod environment;
pub mod executor;
pub mod filesystem;
pub mod reader;

// Re-export commonly used adapters
pub use assets::{EmbeddedAssets, InMemoryAssets};
pub use environment::ProcessEnvironment;
pub use executor::{ExecutorCall, KubectlExecutor, RecordingExecutor};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use reader::{DocumentLoader, LocalDocumentReader};
