//! Application layer for gantry.
//!
//! This layer contains:
//! - **Services**: use case orchestration (resolve, scaffold, synchronize)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! document logic itself. Merge, substitution and translation live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    DefinitionResolver, ResolveRequest, ResolvedDefinition, ResourceSynchronizer,
    ScaffoldRequest, ScaffoldService, SyncReport, SyncRequest,
};

pub use ports::{AssetStore, ClusterExecutor, DocumentReader, Environment, Filesystem};

pub use error::ApplicationError;
