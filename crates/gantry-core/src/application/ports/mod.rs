//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `gantry-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: project scaffolding writes
//!   - `AssetStore`: embedded baseline documents and templates
//!   - `DocumentReader`: OpenAPI and override documents, local or remote
//!   - `Environment`: variable lookup for `${NAME}` substitution
//!   - `ClusterExecutor`: config objects and custom resource apply
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{AssetStore, ClusterExecutor, DocumentReader, Environment, Filesystem};
