use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Field has {found} values, expected {expected} ({lat} latitudes x {lon} longitudes)")]
    ShapeMismatch {
        lat: usize,
        lon: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid time units '{0}'")]
    TimeUnits(String),

    #[error("Variable '{variable}' not found in '{path}'")]
    MissingVariable { path: PathBuf, variable: String },

    #[error("No {axis} coordinate found in '{path}'")]
    MissingCoordinate { path: PathBuf, axis: &'static str },

    #[error("Variable '{variable}' has unsupported dimensions {dims:?}")]
    UnsupportedDimensions { variable: String, dims: Vec<String> },

    #[error("No fields to write")]
    Empty,

    #[error("None of the {steps} time steps falls in {year:04}-{month:02}")]
    MonthNotFound { year: i32, month: u32, steps: usize },

    #[error("File holds {0} time steps; choose a month")]
    AmbiguousTimeStep(usize),

    #[error("Failed to write '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[cfg(feature = "netcdf")]
    #[error("Failed to read NetCDF file '{0}'")]
    NetCdf(PathBuf, #[source] netcdf::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
