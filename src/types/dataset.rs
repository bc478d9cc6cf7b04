//! Identifiers of the Climate Data Store catalogue entries and product types
//! this crate knows how to request.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A dataset (catalogue entry) of the Climate Data Store.
///
/// The identifier becomes part of the request URL, so any catalogue entry can
/// be addressed through [`Dataset::Other`].
///
/// # Examples
///
/// ```
/// use cdsfetch::Dataset;
///
/// assert_eq!(
///     Dataset::Era5SingleLevelsMonthlyMeans.as_str(),
///     "reanalysis-era5-single-levels-monthly-means"
/// );
/// assert_eq!(
///     "reanalysis-era5-land".parse::<Dataset>().unwrap(),
///     Dataset::Other("reanalysis-era5-land".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// ERA5 monthly averaged data on single levels.
    Era5SingleLevelsMonthlyMeans,
    /// ERA5 hourly data on single levels.
    Era5SingleLevels,
    /// Any other catalogue entry, by identifier.
    Other(String),
}

impl Dataset {
    pub fn as_str(&self) -> &str {
        match self {
            Dataset::Era5SingleLevelsMonthlyMeans => "reanalysis-era5-single-levels-monthly-means",
            Dataset::Era5SingleLevels => "reanalysis-era5-single-levels",
            Dataset::Other(id) => id,
        }
    }

    /// ERA5 products: hourly fields from 1940 onwards.
    pub fn is_era5(&self) -> bool {
        !matches!(self, Dataset::Other(_))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "reanalysis-era5-single-levels-monthly-means" => Dataset::Era5SingleLevelsMonthlyMeans,
            "reanalysis-era5-single-levels" => Dataset::Era5SingleLevels,
            other => Dataset::Other(other.to_string()),
        })
    }
}

/// The `product_type` request field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductType {
    /// Monthly means of daily means.
    MonthlyAveragedReanalysis,
    /// Monthly means for each hour of the day.
    MonthlyAveragedReanalysisByHourOfDay,
    /// Hourly reanalysis.
    Reanalysis,
    Other(String),
}

impl ProductType {
    pub fn as_str(&self) -> &str {
        match self {
            ProductType::MonthlyAveragedReanalysis => "monthly_averaged_reanalysis",
            ProductType::MonthlyAveragedReanalysisByHourOfDay => {
                "monthly_averaged_reanalysis_by_hour_of_day"
            }
            ProductType::Reanalysis => "reanalysis",
            ProductType::Other(name) => name,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "monthly_averaged_reanalysis" => ProductType::MonthlyAveragedReanalysis,
            "monthly_averaged_reanalysis_by_hour_of_day" => {
                ProductType::MonthlyAveragedReanalysisByHourOfDay
            }
            "reanalysis" => ProductType::Reanalysis,
            other => ProductType::Other(other.to_string()),
        })
    }
}
