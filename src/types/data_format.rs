use crate::types::error::RequestError;
use std::fmt;
use std::str::FromStr;

/// File format of the retrieved data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataFormat {
    #[default]
    NetCdf,
    Grib,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::NetCdf => "netcdf",
            DataFormat::Grib => "grib",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            DataFormat::NetCdf => "nc",
            DataFormat::Grib => "grib",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "netcdf" | "nc" | "netcdf4" => Ok(DataFormat::NetCdf),
            "grib" | "grib2" => Ok(DataFormat::Grib),
            _ => Err(RequestError::UnknownFormat(s.to_string())),
        }
    }
}
