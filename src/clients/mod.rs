#[cfg(feature = "netcdf")]
pub mod map_client;
pub mod temperature_client;
