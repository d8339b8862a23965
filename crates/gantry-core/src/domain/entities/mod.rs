pub mod definition;
pub mod openapi;
pub mod project_structure;
pub mod resource;

pub use definition::*;
pub use openapi::*;
pub use project_structure::*;
pub use resource::*;
