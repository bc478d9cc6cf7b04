//! The request-parameter mapping sent to the retrieve API.

use crate::types::calendar::{Month, Year, FIRST_REANALYSIS_YEAR};
use crate::types::data_format::DataFormat;
use crate::types::dataset::{Dataset, ProductType};
use crate::types::error::RequestError;
use crate::types::grid::{Area, Grid};
use crate::types::variable::Variable;
use bon::Builder;
use chrono::{NaiveTime, Timelike};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt::Display;

/// A single retrieve request: which dataset, and which slice of it.
///
/// A request is built once per call, validated, serialized to the parameter
/// mapping the Climate Data Store expects and then discarded.
///
/// # Examples
///
/// ```
/// use cdsfetch::{Grid, Month, RetrieveRequest, Variable, Year};
///
/// let request = RetrieveRequest::builder()
///     .variables(vec![Variable::TwoMetreTemperature])
///     .years(vec![Year(2018)])
///     .months(vec![Month(1), Month(2)])
///     .grid(Grid(2.0, 2.0))
///     .build();
///
/// let params = request.to_parameters();
/// assert_eq!(params["variable"], "2m_temperature");
/// assert_eq!(params["year"], "2018");
/// assert_eq!(params["month"], serde_json::json!(["01", "02"]));
/// assert_eq!(params["time"], "00:00");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RetrieveRequest {
    #[builder(default = Dataset::Era5SingleLevelsMonthlyMeans)]
    pub dataset: Dataset,
    #[builder(default = ProductType::MonthlyAveragedReanalysis)]
    pub product_type: ProductType,
    pub variables: Vec<Variable>,
    pub years: Vec<Year>,
    pub months: Vec<Month>,
    /// Times of day. ERA5 fields are hourly, so only whole hours are valid.
    #[builder(default = vec![NaiveTime::MIN])]
    pub times: Vec<NaiveTime>,
    pub grid: Option<Grid>,
    pub area: Option<Area>,
    #[builder(default)]
    pub format: DataFormat,
}

impl RetrieveRequest {
    /// Twelve monthly means of 2 m temperature for one year on a 2° grid.
    pub fn monthly_mean_temperature(year: Year) -> Self {
        Self::builder()
            .variables(vec![Variable::TwoMetreTemperature])
            .years(vec![year])
            .months(Month::all())
            .grid(Grid::uniform(2.0))
            .build()
    }

    /// One monthly mean of 2 m temperature at native resolution, for mapping.
    pub fn monthly_mean_temperature_map(year: Year, month: Month) -> Self {
        Self::builder()
            .variables(vec![Variable::TwoMetreTemperature])
            .years(vec![year])
            .months(vec![month])
            .build()
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        check_values("variable", &self.variables)?;
        check_values("year", &self.years)?;
        check_values("month", &self.months)?;
        check_values(
            "time",
            &self.times.iter().map(format_time).collect::<Vec<_>>(),
        )?;

        if let Some(month) = self.months.iter().find(|m| !m.is_valid()) {
            return Err(RequestError::InvalidMonth(month.get()));
        }
        if self.dataset.is_era5() {
            if let Some(year) = self
                .years
                .iter()
                .find(|y| y.get() < FIRST_REANALYSIS_YEAR || y.get() > 9999)
            {
                return Err(RequestError::YearOutOfRange(year.get()));
            }
            if let Some(time) = self
                .times
                .iter()
                .find(|t| t.minute() != 0 || t.second() != 0 || t.nanosecond() != 0)
            {
                return Err(RequestError::InvalidTime(time.to_string()));
            }
        }
        if let Some(grid) = &self.grid {
            grid.validate()?;
        }
        if let Some(area) = &self.area {
            area.validate()?;
        }
        Ok(())
    }

    /// The parameter mapping, keyed the way the retrieve API names its fields.
    ///
    /// Single-valued fields are sent as plain strings, multi-valued ones as lists.
    pub fn to_parameters(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("product_type".into(), json!(self.product_type.as_str()));
        params.insert("variable".into(), scalar_or_list(&self.variables));
        params.insert("year".into(), scalar_or_list(&self.years));
        params.insert("month".into(), scalar_or_list(&self.months));
        params.insert(
            "time".into(),
            scalar_or_list(&self.times.iter().map(format_time).collect::<Vec<_>>()),
        );
        if let Some(grid) = self.grid {
            params.insert("grid".into(), json!(grid.to_array()));
        }
        if let Some(area) = self.area {
            params.insert("area".into(), json!(area.to_array()));
        }
        // Current API reads `data_format`, the legacy one `format`.
        params.insert("data_format".into(), json!(self.format.as_str()));
        params.insert("format".into(), json!(self.format.as_str()));
        params
    }

    /// Request body of the process execution endpoint.
    pub fn to_inputs(&self) -> Value {
        json!({ "inputs": self.to_parameters() })
    }
}

/// Parses a time of day in `HH:MM` form.
pub fn parse_time(s: &str) -> Result<NaiveTime, RequestError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| RequestError::InvalidTime(s.to_string()))
}

fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn scalar_or_list<T: Display>(values: &[T]) -> Value {
    match values {
        [single] => Value::String(single.to_string()),
        many => Value::Array(
            many.iter()
                .map(|v| Value::String(v.to_string()))
                .collect(),
        ),
    }
}

fn check_values<T: Display>(field: &'static str, values: &[T]) -> Result<(), RequestError> {
    if values.is_empty() {
        return Err(RequestError::EmptyField(field));
    }
    let mut seen = HashSet::new();
    for value in values {
        let value = value.to_string();
        if !seen.insert(value.clone()) {
            return Err(RequestError::DuplicateValue { field, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_mean_temperature_matches_download_parameters() {
        let request = RetrieveRequest::monthly_mean_temperature(Year(2018));
        assert_eq!(request.dataset.as_str(), "reanalysis-era5-single-levels-monthly-means");

        let params = Value::Object(request.to_parameters());
        assert_eq!(
            params,
            json!({
                "product_type": "monthly_averaged_reanalysis",
                "variable": "2m_temperature",
                "grid": [2.0, 2.0],
                "year": "2018",
                "month": ["01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12"],
                "time": "00:00",
                "data_format": "netcdf",
                "format": "netcdf"
            })
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_map_request_has_single_month_and_no_grid() {
        let request = RetrieveRequest::monthly_mean_temperature_map(Year(2018), Month(1));
        let params = request.to_parameters();
        assert_eq!(params["month"], "01");
        assert_eq!(params["year"], "2018");
        assert!(!params.contains_key("grid"));
        assert!(!params.contains_key("area"));
    }

    #[test]
    fn test_inputs_wraps_parameters() {
        let request = RetrieveRequest::monthly_mean_temperature_map(Year(2020), Month(7));
        let body = request.to_inputs();
        assert_eq!(body["inputs"]["month"], "07");
        assert_eq!(body["inputs"]["product_type"], "monthly_averaged_reanalysis");
    }

    #[test]
    fn test_area_is_serialized_north_west_south_east() {
        let request = RetrieveRequest::builder()
            .variables(vec![Variable::TwoMetreTemperature])
            .years(vec![Year(2018)])
            .months(vec![Month(3)])
            .area(Area::new(60.0, -10.0, 35.0, 30.0))
            .format(DataFormat::Grib)
            .build();
        let params = request.to_parameters();
        assert_eq!(params["area"], json!([60.0, -10.0, 35.0, 30.0]));
        assert_eq!(params["data_format"], "grib");
    }

    #[test]
    fn test_validation_rejects_empty_and_duplicate_fields() {
        let mut request = RetrieveRequest::monthly_mean_temperature(Year(2018));
        request.variables.clear();
        assert_eq!(request.validate(), Err(RequestError::EmptyField("variable")));

        let mut request = RetrieveRequest::monthly_mean_temperature(Year(2018));
        request.months.push(Month(1));
        assert_eq!(
            request.validate(),
            Err(RequestError::DuplicateValue {
                field: "month",
                value: "01".into()
            })
        );
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let request = RetrieveRequest::monthly_mean_temperature(Year(1900));
        assert_eq!(request.validate(), Err(RequestError::YearOutOfRange(1900)));

        let request = RetrieveRequest::monthly_mean_temperature_map(Year(2018), Month(13));
        assert_eq!(request.validate(), Err(RequestError::InvalidMonth(13)));

        let mut request = RetrieveRequest::monthly_mean_temperature(Year(2018));
        request.times = vec![parse_time("06:30").unwrap()];
        assert!(matches!(request.validate(), Err(RequestError::InvalidTime(_))));

        let mut request = RetrieveRequest::monthly_mean_temperature(Year(2018));
        request.grid = Some(Grid(0.0, 2.0));
        assert!(matches!(request.validate(), Err(RequestError::InvalidGrid { .. })));
    }

    #[test]
    fn test_reanalysis_limits_only_apply_to_era5() {
        let mut request = RetrieveRequest::monthly_mean_temperature(Year(1900));
        request.dataset = Dataset::Other("derived-near-surface-meteorological-variables".into());
        request.times = vec![parse_time("06:30").unwrap()];
        assert_eq!(request.validate(), Ok(()));

        request.months = vec![Month(0)];
        assert_eq!(request.validate(), Err(RequestError::InvalidMonth(0)));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("00:00"), Ok(NaiveTime::MIN));
        assert_eq!(
            parse_time("18:00"),
            Ok(NaiveTime::from_hms_opt(18, 0, 0).unwrap())
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }
}
