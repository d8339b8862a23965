//! Core domain layer for gantry.
//!
//! Pure data and transformations: definition trees, deep merge, variable
//! substitution, OpenAPI translation and the custom resource model.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network or process calls
//! - Everything that touches the outside world goes through the ports in
//!   [`crate::application::ports`].

pub mod entities;
pub mod env;
pub mod error;
pub mod merge;
pub mod tree;
pub mod value_objects;

mod validation;

pub use entities::{
    definition::{ApiDefinition, InitialState, LifecycleStatus},
    openapi::{OpenApiDocument, OpenApiVersion},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    resource::{ApiResource, ApiResourceSpec, DefinitionSource, InterceptorRefs, ResourceMetadata},
};

pub use error::{DomainError, ErrorCategory};
pub use validation::DomainValidator;
pub use value_objects::{ApiName, AssetPath, ConfigMode, ProjectLayout};
