//! gantry core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers for the gantry
//! API-gateway tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           gantry-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (DefinitionResolver, ScaffoldService,  │
//! │        ResourceSynchronizer)            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, AssetStore, DocumentReader,│
//! │   Environment, ClusterExecutor)         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     gantry-adapters (Infrastructure)    │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ApiDefinition, merge, env, OpenAPI,    │
//! │   ApiResource, ProjectStructure)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gantry_core::prelude::*;
//!
//! let resolver = DefinitionResolver::new(assets, reader, env);
//! let resolved = resolver.resolve(&ResolveRequest {
//!     spec_source: Some("petstore.yaml".into()),
//!     ..Default::default()
//! })?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        ApplicationError, DefinitionResolver, ResolveRequest, ResolvedDefinition,
        ResourceSynchronizer, ScaffoldRequest, ScaffoldService, SyncReport, SyncRequest,
        ports::{AssetStore, ClusterExecutor, DocumentReader, Environment, Filesystem},
    };
    pub use crate::domain::{
        ApiDefinition, ApiName, AssetPath, ConfigMode, DomainError, InitialState,
        LifecycleStatus, OpenApiDocument, OpenApiVersion, ProjectLayout, ProjectStructure,
    };
    pub use crate::error::{ErrorCategory, GantryError, GantryResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
