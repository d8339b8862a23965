//! Document reader adapters.
//!
//! [`DocumentLoader`] is the one the CLI uses: it sends `http(s)://`
//! locations to the remote reader and everything else to the local one.

mod local;
#[cfg(feature = "remote")]
mod remote;

pub use local::LocalDocumentReader;
#[cfg(feature = "remote")]
pub use remote::RemoteDocumentReader;

use gantry_core::{application::ports::DocumentReader, error::GantryResult};
use tracing::debug;

/// Whether `location` should be fetched over the network.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads local paths and, with the `remote` feature, URLs.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    local: LocalDocumentReader,
    #[cfg(feature = "remote")]
    remote: RemoteDocumentReader,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentReader for DocumentLoader {
    fn read(&self, location: &str) -> GantryResult<Vec<u8>> {
        if !is_remote(location) {
            return self.local.read(location);
        }

        debug!(location, "Fetching remote document");
        #[cfg(feature = "remote")]
        {
            self.remote.read(location)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(gantry_core::application::ApplicationError::SourceUnavailable {
                location: location.to_owned(),
                reason: "remote documents need the `remote` feature".into(),
            }
            .into())
        }
    }
}
