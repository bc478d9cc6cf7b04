pub mod calendar;
pub mod data_format;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod request;
pub mod variable;
