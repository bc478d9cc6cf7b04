use crate::field::error::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Invalid colour scale bounds [{vmin}, {vmax}]")]
    InvalidScale { vmin: f64, vmax: f64 },

    #[error("Unknown colour map '{0}'")]
    UnknownColorMap(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}
