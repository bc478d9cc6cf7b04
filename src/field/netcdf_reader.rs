//! Loads gridded fields from NetCDF files as delivered by the retrieve API.

use crate::field::error::FieldError;
use crate::field::gridded_field::GriddedField;
use crate::field::time_axis::TimeUnits;
use log::{debug, warn};
use netcdf::AttributeValue;
use std::path::Path;

const LATITUDE_NAMES: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_NAMES: [&str; 2] = ["longitude", "lon"];
const TIME_NAMES: [&str; 2] = ["valid_time", "time"];

/// Reads every time step of `variable` from a NetCDF file.
///
/// Packed values are unpacked with `scale_factor` / `add_offset`, and fill values
/// become NaN. A variable without a time dimension yields a single field.
pub fn read_fields(path: &Path, variable: &str) -> Result<Vec<GriddedField>, FieldError> {
    let nc_error = |e| FieldError::NetCdf(path.to_path_buf(), e);
    let file = netcdf::open(path).map_err(nc_error)?;

    let latitudes = read_coordinate(&file, path, &LATITUDE_NAMES, "latitude")?;
    let longitudes = read_coordinate(&file, path, &LONGITUDE_NAMES, "longitude")?;

    let var = file
        .variable(variable)
        .ok_or_else(|| FieldError::MissingVariable {
            path: path.to_path_buf(),
            variable: variable.to_string(),
        })?;
    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();
    let unsupported = || FieldError::UnsupportedDimensions {
        variable: variable.to_string(),
        dims: dims.iter().map(|(name, _)| name.clone()).collect(),
    };
    let steps = match dims.as_slice() {
        [(_, lat), (_, lon)] if *lat == latitudes.len() && *lon == longitudes.len() => 1,
        [(_, steps), (_, lat), (_, lon)]
            if *lat == latitudes.len() && *lon == longitudes.len() =>
        {
            *steps
        }
        _ => return Err(unsupported()),
    };
    debug!(
        "Reading {} x {} x {} values of '{}' from {}",
        steps,
        latitudes.len(),
        longitudes.len(),
        variable,
        path.display()
    );

    let scale = numeric_attribute(&var, "scale_factor").unwrap_or(1.0);
    let offset = numeric_attribute(&var, "add_offset").unwrap_or(0.0);
    let fill = numeric_attribute(&var, "_FillValue")
        .or_else(|| numeric_attribute(&var, "missing_value"));
    let units = string_attribute(&var, "units");

    let raw = var.get_values::<f64, _>(..).map_err(nc_error)?;
    let values: Vec<f64> = raw
        .into_iter()
        .map(|v| match fill {
            Some(fill) if v == fill => f64::NAN,
            _ => v * scale + offset,
        })
        .collect();

    let times = read_times(&file, steps);
    let points = latitudes.len() * longitudes.len();
    let mut fields = Vec::with_capacity(steps);
    for (step, chunk) in values.chunks(points.max(1)).take(steps).enumerate() {
        let mut field = GriddedField::new(
            variable,
            latitudes.clone(),
            longitudes.clone(),
            chunk.to_vec(),
        )?;
        field.units = units.clone();
        field.valid_time = times.get(step).copied().flatten();
        fields.push(field);
    }
    Ok(fields)
}

fn read_coordinate(
    file: &netcdf::File,
    path: &Path,
    names: &[&str],
    axis: &'static str,
) -> Result<Vec<f64>, FieldError> {
    let var = names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| FieldError::MissingCoordinate {
            path: path.to_path_buf(),
            axis,
        })?;
    var.get_values::<f64, _>(..)
        .map_err(|e| FieldError::NetCdf(path.to_path_buf(), e))
}

/// Valid times of each step; `None` where the file has no usable time axis.
fn read_times(file: &netcdf::File, steps: usize) -> Vec<Option<chrono::NaiveDateTime>> {
    let Some(var) = TIME_NAMES.iter().find_map(|name| file.variable(name)) else {
        return vec![None; steps];
    };
    let units = string_attribute(&var, "units").and_then(|u| match TimeUnits::parse(&u) {
        Ok(units) => Some(units),
        Err(e) => {
            warn!("Ignoring time axis: {}", e);
            None
        }
    });
    match (units, var.get_values::<f64, _>(..)) {
        (Some(units), Ok(values)) => {
            let mut times: Vec<_> = values.into_iter().map(|v| units.decode(v)).collect();
            times.resize(steps, None);
            times
        }
        _ => vec![None; steps],
    }
}

fn numeric_attribute(var: &netcdf::Variable, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Short(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Schar(v) => Some(v as f64),
        AttributeValue::Uchar(v) => Some(v as f64),
        AttributeValue::Ushort(v) => Some(v as f64),
        AttributeValue::Uint(v) => Some(v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&f| f as f64),
        _ => None,
    }
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::error::Error;

    const FILL: i16 = -32767;

    /// Two monthly steps of packed 2 m temperature on a 2 x 3 grid.
    fn write_packed_monthly(path: &Path) -> Result<(), Box<dyn Error>> {
        let mut file = netcdf::create(path)?;
        file.add_dimension("valid_time", 2)?;
        file.add_dimension("latitude", 2)?;
        file.add_dimension("longitude", 3)?;

        {
            let mut time = file.add_variable::<f64>("valid_time", &["valid_time"])?;
            time.put_attribute("units", "hours since 1900-01-01 00:00:00.0")?;
            time.put_values(&[1_034_376.0, 1_035_120.0], ..)?;
        }
        {
            let mut lat = file.add_variable::<f64>("latitude", &["latitude"])?;
            lat.put_values(&[10.0, -10.0], ..)?;
        }
        {
            let mut lon = file.add_variable::<f64>("longitude", &["longitude"])?;
            lon.put_values(&[0.0, 120.0, 240.0], ..)?;
        }
        let mut t2m = file.add_variable::<i16>("t2m", &["valid_time", "latitude", "longitude"])?;
        t2m.set_fill_value(FILL)?;
        t2m.put_attribute("scale_factor", 0.5f64)?;
        t2m.put_attribute("add_offset", 250.0f64)?;
        t2m.put_attribute("units", "K")?;
        t2m.put_values(&[0i16, 2, 4, 6, FILL, 10, 20, 22, 24, 26, 28, 30], ..)?;
        Ok(())
    }

    #[test]
    fn test_reads_packed_steps_with_time_axis() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("t2m.nc");
        write_packed_monthly(&path)?;

        let fields = read_fields(&path, "t2m")?;
        assert_eq!(fields.len(), 2);

        let january = &fields[0];
        assert_eq!(january.latitudes, vec![10.0, -10.0]);
        assert_eq!(january.longitudes, vec![0.0, 120.0, 240.0]);
        assert_eq!(january.units.as_deref(), Some("K"));
        assert_eq!(&january.values[..4], &[250.0, 251.0, 252.0, 253.0]);
        assert!(january.values[4].is_nan());
        assert_eq!(january.values[5], 255.0);
        assert_eq!(
            january.valid_time,
            NaiveDate::from_ymd_opt(2018, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );

        let february = &fields[1];
        assert_eq!(february.values[0], 260.0);
        assert_eq!(
            february.valid_time,
            NaiveDate::from_ymd_opt(2018, 2, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        Ok(())
    }

    #[test]
    fn test_reads_single_step_with_short_coordinate_names() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sst.nc");
        {
            let mut file = netcdf::create(&path)?;
            file.add_dimension("lat", 1)?;
            file.add_dimension("lon", 2)?;
            {
                let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
                lat.put_values(&[0.0], ..)?;
            }
            {
                let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
                lon.put_values(&[0.0, 180.0], ..)?;
            }
            let mut sst = file.add_variable::<f32>("sst", &["lat", "lon"])?;
            sst.put_attribute("missing_value", -999.0f32)?;
            sst.put_values(&[290.5f32, -999.0], ..)?;
        }

        let fields = read_fields(&path, "sst")?;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].values[0], 290.5);
        assert!(fields[0].values[1].is_nan());
        assert_eq!(fields[0].valid_time, None);
        assert_eq!(fields[0].units, None);
        Ok(())
    }

    #[test]
    fn test_missing_variable() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("t2m.nc");
        write_packed_monthly(&path)?;

        let result = read_fields(&path, "d2m");
        assert!(matches!(result, Err(FieldError::MissingVariable { .. })));
        Ok(())
    }
}
