#![cfg(feature = "netcdf")]

use cdsfetch::{load_temperature_map, Cds, CdsError, ClientConfig, FieldError, Month, PollSettings, Year};
use httpmock::prelude::*;
use serde_json::json;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const EXECUTE_PATH: &str =
    "/retrieve/v1/processes/reanalysis-era5-single-levels-monthly-means/execution";

/// Hours since 1900-01-01 of the first day of each 2018 month.
fn hours_2018(month: u32) -> f64 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let days: u32 = DAYS.iter().take(month as usize - 1).sum();
    1_034_376.0 + f64::from(days * 24)
}

/// Monthly mean 2 m temperature in Kelvin; month `m` has the value `270 + m` everywhere.
fn write_monthly_file(path: &Path, months: &[u32]) -> Result<(), Box<dyn Error>> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("valid_time", months.len())?;
    file.add_dimension("latitude", 2)?;
    file.add_dimension("longitude", 2)?;
    {
        let mut time = file.add_variable::<f64>("valid_time", &["valid_time"])?;
        time.put_attribute("units", "hours since 1900-01-01")?;
        let hours: Vec<f64> = months.iter().map(|&m| hours_2018(m)).collect();
        time.put_values(&hours, ..)?;
    }
    {
        let mut lat = file.add_variable::<f64>("latitude", &["latitude"])?;
        lat.put_values(&[45.0, -45.0], ..)?;
    }
    {
        let mut lon = file.add_variable::<f64>("longitude", &["longitude"])?;
        lon.put_values(&[0.0, 180.0], ..)?;
    }
    let mut t2m = file.add_variable::<f64>("t2m", &["valid_time", "latitude", "longitude"])?;
    t2m.put_attribute("units", "K")?;
    let values: Vec<f64> = months
        .iter()
        .flat_map(|&m| std::iter::repeat(270.0 + f64::from(m)).take(4))
        .collect();
    t2m.put_values(&values, ..)?;
    Ok(())
}

#[tokio::test]
async fn test_map_client_retrieves_and_builds_map() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let source = dir.path().join("july.nc");
    write_monthly_file(&source, &[7])?;
    let payload = std::fs::read(&source)?;

    let server = MockServer::start();
    let submit = server.mock(|when, then| {
        when.method(POST).path(EXECUTE_PATH).json_body_partial(
            json!({ "inputs": { "year": "2018", "month": "07" } }).to_string(),
        );
        then.status(201)
            .json_body(json!({ "jobID": "job-map", "status": "successful" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/retrieve/v1/jobs/job-map/results");
        then.status(200).json_body(json!({
            "asset": { "value": { "href": "/download/july.nc", "file:size": payload.len() } }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/download/july.nc");
        then.status(200).body(&payload);
    });

    let config = ClientConfig::new(&server.base_url(), "test-key")?.with_poll(PollSettings {
        initial: Duration::from_millis(10),
        max: Duration::from_millis(20),
        factor: 1.5,
    });
    let client = Cds::with_config(config);
    let map = client.map().year(2018).month(7).call().await?;

    submit.assert();
    assert_eq!(map.title(), "Near-surface air temperature");
    assert_eq!(map.field().units.as_deref(), Some("°C"));
    assert_eq!(map.field().longitudes, vec![-180.0, 0.0]);
    assert!(map
        .field()
        .values
        .iter()
        .all(|v| (v - (277.0 - 273.15)).abs() < 1e-9));
    Ok(())
}

#[tokio::test]
async fn test_local_file_map_uses_requested_month() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("temperature-data.nc");
    write_monthly_file(&path, &(1..=12).collect::<Vec<_>>())?;

    let map = load_temperature_map(&path, Some((Year(2018), Month(7))), None, None).await?;
    assert!((map.field().values[0] - (277.0 - 273.15)).abs() < 1e-9);

    let missing = load_temperature_map(&path, Some((Year(2019), Month(7))), None, None).await;
    assert!(matches!(
        missing,
        Err(CdsError::Field(FieldError::MonthNotFound { .. }))
    ));

    let ambiguous = load_temperature_map(&path, None, None, None).await;
    assert!(matches!(
        ambiguous,
        Err(CdsError::Field(FieldError::AmbiguousTimeStep(12)))
    ));
    Ok(())
}
