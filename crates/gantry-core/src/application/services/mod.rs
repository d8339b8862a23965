//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use cases: resolve a definition, scaffold a project,
//! synchronize a project into the cluster.

pub mod definition_resolver;
pub mod resource_sync;
pub mod scaffold_service;

pub use definition_resolver::{DefinitionResolver, ResolveRequest, ResolvedDefinition};
pub use resource_sync::{ResourceSynchronizer, SyncReport, SyncRequest};
pub use scaffold_service::{ScaffoldRequest, ScaffoldService};
