//! Asset store adapters.

mod embedded;
mod memory;

pub use embedded::EmbeddedAssets;
pub use memory::InMemoryAssets;
