pub mod error;
pub mod gridded_field;
#[cfg(feature = "netcdf")]
pub mod netcdf_reader;
pub mod time_axis;
