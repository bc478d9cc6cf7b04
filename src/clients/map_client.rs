//! Provides the `MapClient` for producing near-surface temperature maps of a
//! single month, obtained via [`Cds::map()`].

use crate::field::gridded_field::select_time_step;
use crate::field::netcdf_reader::read_fields;
use crate::map::color_map::ColorScale;
use crate::map::geo_map::GeoMap;
use crate::types::calendar::{Month, Year};
use crate::types::request::RetrieveRequest;
use crate::types::variable::Variable;
use crate::{Cds, CdsError};
use bon::bon;
use log::info;
use std::path::Path;

pub struct MapClient<'a> {
    client: &'a Cds,
}

#[bon]
impl<'a> MapClient<'a> {
    pub(crate) fn new(client: &'a Cds) -> Self {
        Self { client }
    }

    /// Retrieves one month of monthly mean 2 m temperature at native resolution
    /// and turns it into a [`GeoMap`].
    ///
    /// * `.month(u32)`: **Required.** Month of the year, `1..=12`.
    /// * `.title(String)`: Optional. Defaults to "Near-surface air temperature".
    /// * `.scale(ColorScale)`: Optional. Defaults to -60 °C..50 °C on `RdYlBu_r`.
    ///
    /// The retrieved file is kept in a temporary directory only while it is read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cdsfetch::{Cds, CdsError};
    /// # use std::path::Path;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), CdsError> {
    /// let client = Cds::new().await?;
    /// let map = client.map().year(2018).month(1).call().await?;
    /// map.write_color_table(Path::new("map-2018-01.csv"))?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = year)]
    #[doc(hidden)]
    pub async fn build_year(
        &self,
        #[builder(start_fn)] year: i32,
        month: u32,
        title: Option<String>,
        scale: Option<ColorScale>,
    ) -> Result<GeoMap, CdsError> {
        let request = RetrieveRequest::monthly_mean_temperature_map(Year(year), Month(month));
        let work_dir = tempfile::tempdir()
            .map_err(|e| CdsError::TempDir(std::env::temp_dir(), e))?;
        let target = work_dir.path().join("map-data.nc");

        self.client
            .retrieve()
            .request(&request)
            .target(&target)
            .call()
            .await?;
        let map =
            load_temperature_map(&target, Some((Year(year), Month(month))), title, scale).await?;
        info!("Built map '{}' for {}-{}", map.title(), Year(year), Month(month));
        Ok(map)
    }
}

/// Builds a temperature map from an already retrieved file.
///
/// `period` selects the time step; without it the file must hold a single step.
pub async fn load_temperature_map(
    path: &Path,
    period: Option<(Year, Month)>,
    title: Option<String>,
    scale: Option<ColorScale>,
) -> Result<GeoMap, CdsError> {
    let owned_path = path.to_path_buf();
    let variable = Variable::TwoMetreTemperature.short_name().to_string();
    let fields = {
        let variable = variable.clone();
        tokio::task::spawn_blocking(move || read_fields(&owned_path, &variable))
            .await
            .map_err(crate::field::error::FieldError::from)??
    };
    if fields.is_empty() {
        return Err(CdsError::EmptyRetrieval {
            path: path.to_path_buf(),
            variable,
        });
    }
    let field = select_time_step(fields, period)?;

    Ok(GeoMap::builder()
        .field(field.to_celsius().normalize_longitudes())
        .maybe_title(title)
        .maybe_scale(scale)
        .build())
}
