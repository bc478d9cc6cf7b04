use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A variable of the ERA5 single-level datasets.
///
/// The API name is what goes into the `variable` request field; the short name
/// is what the variable is called inside the retrieved NetCDF file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Air temperature at 2 m above the surface, in Kelvin.
    TwoMetreTemperature,
    /// Dew point temperature at 2 m, in Kelvin.
    TwoMetreDewpointTemperature,
    SkinTemperature,
    SeaSurfaceTemperature,
    TotalPrecipitation,
    MeanSeaLevelPressure,
    Other(String),
}

impl Variable {
    pub fn as_str(&self) -> &str {
        match self {
            Variable::TwoMetreTemperature => "2m_temperature",
            Variable::TwoMetreDewpointTemperature => "2m_dewpoint_temperature",
            Variable::SkinTemperature => "skin_temperature",
            Variable::SeaSurfaceTemperature => "sea_surface_temperature",
            Variable::TotalPrecipitation => "total_precipitation",
            Variable::MeanSeaLevelPressure => "mean_sea_level_pressure",
            Variable::Other(name) => name,
        }
    }

    /// Name of the variable in retrieved NetCDF files.
    ///
    /// Unknown variables fall back to their API name.
    pub fn short_name(&self) -> &str {
        match self {
            Variable::TwoMetreTemperature => "t2m",
            Variable::TwoMetreDewpointTemperature => "d2m",
            Variable::SkinTemperature => "skt",
            Variable::SeaSurfaceTemperature => "sst",
            Variable::TotalPrecipitation => "tp",
            Variable::MeanSeaLevelPressure => "msl",
            Variable::Other(name) => name,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "2m_temperature" | "t2m" => Variable::TwoMetreTemperature,
            "2m_dewpoint_temperature" | "d2m" => Variable::TwoMetreDewpointTemperature,
            "skin_temperature" | "skt" => Variable::SkinTemperature,
            "sea_surface_temperature" | "sst" => Variable::SeaSurfaceTemperature,
            "total_precipitation" | "tp" => Variable::TotalPrecipitation,
            "mean_sea_level_pressure" | "msl" => Variable::MeanSeaLevelPressure,
            other => Variable::Other(other.to_string()),
        })
    }
}
