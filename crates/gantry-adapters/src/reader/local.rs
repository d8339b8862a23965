use std::io::ErrorKind;

use gantry_core::{
    application::{ApplicationError, ports::DocumentReader},
    error::GantryResult,
};

/// Reads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDocumentReader;

impl DocumentReader for LocalDocumentReader {
    fn read(&self, location: &str) -> GantryResult<Vec<u8>> {
        std::fs::read(location).map_err(|e| {
            let error = if e.kind() == ErrorKind::NotFound {
                ApplicationError::SourceNotFound {
                    location: location.to_owned(),
                }
            } else {
                ApplicationError::SourceUnavailable {
                    location: location.to_owned(),
                    reason: e.to_string(),
                }
            };
            error.into()
        })
    }
}
