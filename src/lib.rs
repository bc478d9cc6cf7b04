mod cds;
mod clients;
mod config;
mod error;
mod field;
mod map;
mod retrieval;
mod types;
mod utils;

pub use cds::*;
pub use error::CdsError;

pub use clients::temperature_client::*;
#[cfg(feature = "netcdf")]
pub use clients::map_client::*;

pub use config::{ClientConfig, ConfigError, PollSettings, RcFile, DEFAULT_API_URL};

pub use types::calendar::{Month, Year};
pub use types::data_format::DataFormat;
pub use types::dataset::{Dataset, ProductType};
pub use types::error::RequestError;
pub use types::grid::{Area, Grid};
pub use types::request::{parse_time, RetrieveRequest};
pub use types::variable::Variable;

pub use retrieval::error::RetrieveError;
pub use retrieval::job_runner::{JobRunner, RetrievedFile};
pub use retrieval::protocol::{Asset, JobState, JobStatus};

pub use field::error::FieldError;
pub use field::gridded_field::{select_time_step, write_csv, FieldSummary, GriddedField};
#[cfg(feature = "netcdf")]
pub use field::netcdf_reader::read_fields;
pub use field::time_axis::TimeUnits;

pub use map::color_map::{ColorMap, ColorRamp, ColorScale, Rgb};
pub use map::error::MapError;
pub use map::geo_map::{GeoMap, DEFAULT_TITLE};
