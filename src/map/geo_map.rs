//! A map figure of one gridded field: title, colour scale and the field itself.

use crate::field::gridded_field::GriddedField;
use crate::field::error::FieldError;
use crate::map::color_map::ColorScale;
use crate::map::error::MapError;
use bon::Builder;
use polars::prelude::*;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Near-surface air temperature";

#[cfg(feature = "plotting")]
const COLOR_STOPS: usize = 21;
#[cfg(feature = "plotting")]
const COLOR_BAR_STEP: f64 = 10.0;

/// A renderable map of a [`GriddedField`].
///
/// # Examples
///
/// ```
/// use cdsfetch::{GeoMap, GriddedField};
///
/// let field = GriddedField::new("t2m", vec![0.0], vec![0.0, 180.0], vec![300.0, 250.0])
///     .unwrap()
///     .with_units("K");
/// let map = GeoMap::temperature(field);
/// assert_eq!(map.title(), "Near-surface air temperature");
/// assert_eq!(map.field().units.as_deref(), Some("°C"));
/// assert_eq!(map.field().longitudes, vec![-180.0, 0.0]);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct GeoMap {
    field: GriddedField,
    #[builder(into, default = DEFAULT_TITLE.to_string())]
    title: String,
    #[builder(default)]
    scale: ColorScale,
}

impl GeoMap {
    /// The near-surface temperature map: values in °C, longitudes centred on
    /// Greenwich, default title and colour scale.
    pub fn temperature(field: GriddedField) -> Self {
        GeoMap::builder()
            .field(field.to_celsius().normalize_longitudes())
            .build()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn field(&self) -> &GriddedField {
        &self.field
    }

    /// One row per grid point with `latitude`, `longitude`, the value clamped to
    /// the colour scale and the cell colour as `#rrggbb`. Missing values are null.
    pub fn frame(&self) -> Result<DataFrame, MapError> {
        let field = &self.field;
        let points = field.values.len();
        let mut latitudes = Vec::with_capacity(points);
        let mut longitudes = Vec::with_capacity(points);
        for &lat in &field.latitudes {
            for &lon in &field.longitudes {
                latitudes.push(lat);
                longitudes.push(lon);
            }
        }
        let values: Vec<Option<f64>> = field
            .values
            .iter()
            .map(|&v| (!v.is_nan()).then(|| self.scale.clamp(v)))
            .collect();
        let colors: Vec<Option<String>> = field
            .values
            .iter()
            .map(|&v| self.scale.color_of(v).map(|c| c.to_hex()))
            .collect();

        let df = df!(
            "latitude" => latitudes,
            "longitude" => longitudes,
            "value" => values,
            "color" => colors,
        )
        .map_err(FieldError::from)?;
        Ok(df)
    }

    /// Writes the per-cell colour table as CSV.
    pub fn write_color_table(&self, path: &Path) -> Result<(), MapError> {
        let mut df = self.frame()?;
        let mut file = std::fs::File::create(path)
            .map_err(|e| FieldError::Write(path.to_path_buf(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(FieldError::from)?;
        Ok(())
    }

    /// Renders the map as an interactive heat map in a self-contained HTML file.
    ///
    /// The colour range is pinned to the scale bounds, so a field that spans only
    /// part of `[vmin, vmax]` uses only that part of the colour map.
    #[cfg(feature = "plotting")]
    pub fn write_html(&self, path: &Path) -> Result<(), MapError> {
        std::fs::write(path, self.plot().to_html())
            .map_err(|e| FieldError::Write(path.to_path_buf(), e))?;
        Ok(())
    }

    #[cfg(feature = "plotting")]
    fn plot(&self) -> plotly::Plot {
        use plotly::common::{ColorBar, ColorScale as PlotlyColorScale, ColorScaleElement};
        use plotly::layout::Axis;
        use plotly::{HeatMap, Layout, Plot};

        let field = &self.field;
        let width = field.longitudes.len().max(1);
        let rows: Vec<Vec<Option<f64>>> = field
            .values
            .chunks(width)
            .map(|row| row.iter().map(|&v| (!v.is_nan()).then_some(v)).collect())
            .collect();
        let colorscale = self
            .scale
            .gradient(COLOR_STOPS)
            .into_iter()
            .map(|(t, color)| ColorScaleElement(t, color.to_hex()))
            .collect();
        let mut color_bar = ColorBar::new().tick_vals(self.scale.ticks(COLOR_BAR_STEP));
        if let Some(units) = &field.units {
            color_bar = color_bar.title(units.as_str());
        }

        let trace = HeatMap::new(field.longitudes.clone(), field.latitudes.clone(), rows)
            .zmin(self.scale.vmin())
            .zmax(self.scale.vmax())
            .color_scale(PlotlyColorScale::Vector(colorscale))
            .color_bar(color_bar)
            .name(field.variable.as_str());

        let mut plot = Plot::new();
        plot.add_trace(trace);
        plot.set_layout(
            Layout::new()
                .title(self.title.as_str())
                .x_axis(Axis::new().title("Longitude"))
                .y_axis(Axis::new().title("Latitude")),
        );
        plot
    }
}
