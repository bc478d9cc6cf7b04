use crate::retrieval::protocol::JobState;
use crate::types::error::RequestError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("Invalid retrieve request")]
    InvalidRequest(#[from] RequestError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {message}")]
    Api {
        url: String,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to decode response from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("Job {job_id} ended as {state}: {message}")]
    JobFailed {
        job_id: String,
        state: JobState,
        message: String,
    },

    #[error("Job {0} finished without a downloadable result")]
    MissingAsset(String),

    #[error("Failed to create temporary file next to '{0}'")]
    TempFile(PathBuf, #[source] std::io::Error),

    #[error("Failed to write downloaded data to '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),

    #[error("Downloaded {found} bytes for '{path}', expected {expected}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },
}
