use crate::config::ConfigError;
use crate::field::error::FieldError;
use crate::map::error::MapError;
use crate::retrieval::error::RetrieveError;
use crate::types::error::RequestError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Retrieve(#[from] RetrieveError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("Failed to create temporary directory for '{0}'")]
    TempDir(PathBuf, #[source] std::io::Error),

    #[error("No '{variable}' data in retrieved file '{path}'")]
    EmptyRetrieval { path: PathBuf, variable: String },
}
