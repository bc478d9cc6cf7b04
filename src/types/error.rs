use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Request field '{0}' must contain at least one value")]
    EmptyField(&'static str),

    #[error("Request field '{field}' contains '{value}' more than once")]
    DuplicateValue { field: &'static str, value: String },

    #[error("Year {0} is outside the range covered by the reanalysis")]
    YearOutOfRange(i32),

    #[error("Month {0} is not in 1..=12")]
    InvalidMonth(u32),

    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid grid [{lat}, {lon}]: {reason}")]
    InvalidGrid {
        lat: f64,
        lon: f64,
        reason: &'static str,
    },

    #[error("Invalid area [{north}, {west}, {south}, {east}]: {reason}")]
    InvalidArea {
        north: f64,
        west: f64,
        south: f64,
        east: f64,
        reason: &'static str,
    },

    #[error("Unknown data format '{0}'")]
    UnknownFormat(String),
}
