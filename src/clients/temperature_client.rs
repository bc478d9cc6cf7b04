//! Provides the `TemperatureClient` for downloading a year of ERA5 monthly mean
//! near-surface air temperature.
//!
//! This client acts as an intermediate builder, obtained via [`Cds::temperature()`].

use crate::retrieval::job_runner::RetrievedFile;
use crate::types::calendar::{Month, Year};
use crate::types::grid::Grid;
use crate::types::request::RetrieveRequest;
use crate::{Cds, CdsError};
use bon::bon;
use std::path::PathBuf;

/// File name the temperature data is written to unless told otherwise.
pub const DEFAULT_TEMPERATURE_TARGET: &str = "temperature-data.nc";

/// A client builder for yearly monthly-mean temperature downloads.
///
/// Calling `.year(..)` starts the request; `.call().await` executes it and returns
/// a [`Result<RetrievedFile, CdsError>`].
pub struct TemperatureClient<'a> {
    client: &'a Cds,
}

#[bon]
impl<'a> TemperatureClient<'a> {
    pub(crate) fn new(client: &'a Cds) -> Self {
        Self { client }
    }

    /// Initiates a download of monthly mean 2 m temperature for one year.
    ///
    /// # Optional Builder Methods
    ///
    /// * `.grid(Grid)`: Output resolution. Defaults to 2° x 2°.
    /// * `.months(Vec<Month>)`: Months to include. Defaults to all twelve.
    /// * `.target(PathBuf)`: Output file. Defaults to `temperature-data.nc`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cdsfetch::{Cds, CdsError, Grid};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), CdsError> {
    /// let client = Cds::new().await?;
    /// let file = client
    ///     .temperature()
    ///     .year(2018)
    ///     .grid(Grid(2.0, 2.0))
    ///     .call()
    ///     .await?;
    /// println!("Saved job {} to {}", file.job_id, file.path.display());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = year)]
    #[doc(hidden)]
    pub async fn build_year(
        &self,
        #[builder(start_fn)] year: i32,
        grid: Option<Grid>,
        months: Option<Vec<Month>>,
        target: Option<PathBuf>,
    ) -> Result<RetrievedFile, CdsError> {
        let request = temperature_request(Year(year), grid, months);
        let target = target.unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPERATURE_TARGET));
        self.client
            .retrieve()
            .request(&request)
            .target(&target)
            .call()
            .await
    }
}

pub(crate) fn temperature_request(
    year: Year,
    grid: Option<Grid>,
    months: Option<Vec<Month>>,
) -> RetrieveRequest {
    let mut request = RetrieveRequest::monthly_mean_temperature(year);
    if let Some(grid) = grid {
        request.grid = Some(grid);
    }
    if let Some(months) = months {
        request.months = months;
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_request_defaults() {
        let request = temperature_request(Year(2018), None, None);
        assert_eq!(request, RetrieveRequest::monthly_mean_temperature(Year(2018)));
    }

    #[test]
    fn test_temperature_request_overrides() {
        let request = temperature_request(Year(2019), Some(Grid(1.0, 1.0)), Some(vec![Month(6)]));
        assert_eq!(request.grid, Some(Grid(1.0, 1.0)));
        assert_eq!(request.months, vec![Month(6)]);
        assert_eq!(request.years, vec![Year(2019)]);
    }
}
