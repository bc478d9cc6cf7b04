//! An in-memory regular latitude/longitude field, as retrieved for one time step.

use crate::field::error::FieldError;
use crate::types::calendar::{Month, Year};
use chrono::{Datelike, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;

const KELVIN_OFFSET: f64 = 273.15;

/// Values of one variable on a regular grid, stored row-major
/// (`values[lat_index * longitudes.len() + lon_index]`). Missing values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedField {
    pub variable: String,
    pub units: Option<String>,
    pub valid_time: Option<NaiveDateTime>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub values: Vec<f64>,
}

/// Statistics over the non-missing values of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_points: usize,
}

impl GriddedField {
    pub fn new(
        variable: impl Into<String>,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, FieldError> {
        let expected = latitudes.len() * longitudes.len();
        if values.len() != expected {
            return Err(FieldError::ShapeMismatch {
                lat: latitudes.len(),
                lon: longitudes.len(),
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            variable: variable.into(),
            units: None,
            valid_time: None,
            latitudes,
            longitudes,
            values,
        })
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_valid_time(mut self, valid_time: NaiveDateTime) -> Self {
        self.valid_time = Some(valid_time);
        self
    }

    pub fn value(&self, lat_index: usize, lon_index: usize) -> Option<f64> {
        if lat_index >= self.latitudes.len() || lon_index >= self.longitudes.len() {
            return None;
        }
        Some(self.values[lat_index * self.longitudes.len() + lon_index])
    }

    /// Converts Kelvin values to degrees Celsius. Fields in other units are returned unchanged.
    pub fn to_celsius(mut self) -> Self {
        if matches!(self.units.as_deref(), Some("K") | Some("kelvin") | Some("Kelvin")) {
            self.values.iter_mut().for_each(|v| *v -= KELVIN_OFFSET);
            self.units = Some("°C".to_string());
        }
        self
    }

    /// Moves longitudes from `[0, 360)` to `[-180, 180)`, reordering columns so
    /// longitudes stay ascending.
    pub fn normalize_longitudes(mut self) -> Self {
        let wrapped: Vec<f64> = self
            .longitudes
            .iter()
            .map(|&lon| {
                let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
                if lon == -0.0 {
                    0.0
                } else {
                    lon
                }
            })
            .collect();
        let mut order: Vec<usize> = (0..wrapped.len()).collect();
        order.sort_by(|&a, &b| wrapped[a].total_cmp(&wrapped[b]));

        let width = self.longitudes.len();
        let mut values = Vec::with_capacity(self.values.len());
        for row in self.values.chunks(width.max(1)) {
            values.extend(order.iter().map(|&i| row[i]));
        }
        self.longitudes = order.iter().map(|&i| wrapped[i]).collect();
        self.values = values;
        self
    }

    /// One row per grid point with columns `valid_time`, `latitude`, `longitude`, `value`.
    pub fn to_frame(&self) -> Result<DataFrame, FieldError> {
        let points = self.values.len();
        let time = self
            .valid_time
            .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string());
        let mut latitudes = Vec::with_capacity(points);
        let mut longitudes = Vec::with_capacity(points);
        for &lat in &self.latitudes {
            for &lon in &self.longitudes {
                latitudes.push(lat);
                longitudes.push(lon);
            }
        }
        let values: Vec<Option<f64>> = self
            .values
            .iter()
            .map(|&v| if v.is_nan() { None } else { Some(v) })
            .collect();

        let df = df!(
            "valid_time" => vec![time; points],
            "latitude" => latitudes,
            "longitude" => longitudes,
            "value" => values,
        )?;
        Ok(df)
    }

    pub fn summary(&self) -> Result<FieldSummary, FieldError> {
        let stats = self
            .to_frame()?
            .lazy()
            .select([
                col("value").min().alias("min"),
                col("value").max().alias("max"),
                col("value").mean().alias("mean"),
            ])
            .collect()?;
        let stat = |name: &str| -> Result<Option<f64>, PolarsError> {
            Ok(stats.column(name)?.f64()?.get(0))
        };
        Ok(FieldSummary {
            min: stat("min")?,
            max: stat("max")?,
            mean: stat("mean")?,
            valid_points: self.values.iter().filter(|v| !v.is_nan()).count(),
        })
    }
}

/// Picks one time step out of `fields`.
///
/// With a period, the step whose valid time falls in that month is returned; a
/// single step without a time axis is accepted as is. Without a period the file
/// must hold exactly one step.
pub fn select_time_step(
    fields: Vec<GriddedField>,
    period: Option<(Year, Month)>,
) -> Result<GriddedField, FieldError> {
    let steps = fields.len();
    match period {
        Some((year, month)) => {
            let single_untimed = steps == 1 && fields[0].valid_time.is_none();
            let mut fields = fields.into_iter();
            if single_untimed {
                return fields.next().ok_or(FieldError::Empty);
            }
            fields
                .find(|field| {
                    field.valid_time.is_some_and(|t| {
                        t.year() == year.get() && t.month() == month.get()
                    })
                })
                .ok_or(FieldError::MonthNotFound {
                    year: year.get(),
                    month: month.get(),
                    steps,
                })
        }
        None => match steps {
            0 => Err(FieldError::Empty),
            1 => fields.into_iter().next().ok_or(FieldError::Empty),
            _ => Err(FieldError::AmbiguousTimeStep(steps)),
        },
    }
}

/// Writes all fields into a single CSV file, one row per grid point and time step.
pub fn write_csv(fields: &[GriddedField], path: &Path) -> Result<(), FieldError> {
    let (first, rest) = fields.split_first().ok_or(FieldError::Empty)?;
    let mut df = first.to_frame()?;
    for field in rest {
        df.vstack_mut(&field.to_frame()?)?;
    }

    let mut file =
        std::fs::File::create(path).map_err(|e| FieldError::Write(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}
