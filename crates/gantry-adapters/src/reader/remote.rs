use gantry_core::{
    application::{ApplicationError, ports::DocumentReader},
    error::GantryResult,
};

/// Fetches documents over HTTP(S) with a blocking `ureq` request.
///
/// One attempt, no retries. Non-2xx statuses are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteDocumentReader;

impl DocumentReader for RemoteDocumentReader {
    fn read(&self, location: &str) -> GantryResult<Vec<u8>> {
        let unavailable = |e: ureq::Error| ApplicationError::SourceUnavailable {
            location: location.to_owned(),
            reason: e.to_string(),
        };

        let response = ureq::get(location).call().map_err(|e| match e {
            ureq::Error::StatusCode(404) => ApplicationError::SourceNotFound {
                location: location.to_owned(),
            },
            other => unavailable(other),
        })?;

        Ok(response.into_body().read_to_vec().map_err(unavailable)?)
    }
}
