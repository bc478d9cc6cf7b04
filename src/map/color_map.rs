//! Colour maps and the bounded colour scale that maps data values onto them.

use crate::map::error::MapError;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VMIN: f64 = -60.0;
pub const DEFAULT_VMAX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Base colour ramps, ordered from the low end to the high end as in matplotlib.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRamp {
    /// Red - yellow - blue (ColorBrewer, 11 classes).
    RdYlBu,
    /// Red - white - blue (ColorBrewer, 11 classes).
    RdBu,
    Viridis,
    Jet,
}

impl ColorRamp {
    fn stops(self) -> &'static [Rgb] {
        match self {
            ColorRamp::RdYlBu => &[
                Rgb(0xa5, 0x00, 0x26),
                Rgb(0xd7, 0x30, 0x27),
                Rgb(0xf4, 0x6d, 0x43),
                Rgb(0xfd, 0xae, 0x61),
                Rgb(0xfe, 0xe0, 0x90),
                Rgb(0xff, 0xff, 0xbf),
                Rgb(0xe0, 0xf3, 0xf8),
                Rgb(0xab, 0xd9, 0xe9),
                Rgb(0x74, 0xad, 0xd1),
                Rgb(0x45, 0x75, 0xb4),
                Rgb(0x31, 0x36, 0x95),
            ],
            ColorRamp::RdBu => &[
                Rgb(0x67, 0x00, 0x1f),
                Rgb(0xb2, 0x18, 0x2b),
                Rgb(0xd6, 0x60, 0x4d),
                Rgb(0xf4, 0xa5, 0x82),
                Rgb(0xfd, 0xdb, 0xc7),
                Rgb(0xf7, 0xf7, 0xf7),
                Rgb(0xd1, 0xe5, 0xf0),
                Rgb(0x92, 0xc5, 0xde),
                Rgb(0x43, 0x93, 0xc3),
                Rgb(0x21, 0x66, 0xac),
                Rgb(0x05, 0x30, 0x61),
            ],
            ColorRamp::Viridis => &[
                Rgb(0x44, 0x01, 0x54),
                Rgb(0x48, 0x28, 0x78),
                Rgb(0x3e, 0x4a, 0x89),
                Rgb(0x31, 0x68, 0x8e),
                Rgb(0x26, 0x82, 0x8e),
                Rgb(0x1f, 0x9e, 0x89),
                Rgb(0x35, 0xb7, 0x79),
                Rgb(0x6d, 0xcd, 0x59),
                Rgb(0xb4, 0xde, 0x2c),
                Rgb(0xfd, 0xe7, 0x25),
            ],
            ColorRamp::Jet => &[
                Rgb(0x00, 0x00, 0x7f),
                Rgb(0x00, 0x00, 0xff),
                Rgb(0x00, 0x7f, 0xff),
                Rgb(0x00, 0xff, 0xff),
                Rgb(0x7f, 0xff, 0x7f),
                Rgb(0xff, 0xff, 0x00),
                Rgb(0xff, 0x7f, 0x00),
                Rgb(0xff, 0x00, 0x00),
                Rgb(0x7f, 0x00, 0x00),
            ],
        }
    }

    fn name(self) -> &'static str {
        match self {
            ColorRamp::RdYlBu => "RdYlBu",
            ColorRamp::RdBu => "RdBu",
            ColorRamp::Viridis => "viridis",
            ColorRamp::Jet => "jet",
        }
    }
}

/// A colour ramp, optionally reversed. Parsed from matplotlib names such as `RdYlBu_r`.
///
/// # Examples
///
/// ```
/// use cdsfetch::{ColorMap, Rgb};
///
/// let cmap: ColorMap = "RdYlBu_r".parse().unwrap();
/// assert!(cmap.reversed);
/// // Reversed: cold values are blue, warm values red
/// assert_eq!(cmap.color_at(0.0), Rgb(0x31, 0x36, 0x95));
/// assert_eq!(cmap.color_at(1.0), Rgb(0xa5, 0x00, 0x26));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMap {
    pub ramp: ColorRamp,
    pub reversed: bool,
}

impl ColorMap {
    pub fn new(ramp: ColorRamp, reversed: bool) -> Self {
        Self { ramp, reversed }
    }

    /// Colour at position `t` in `[0, 1]`, interpolated linearly between stops.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        let stops = self.ramp.stops();
        let position = t * (stops.len() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let fraction = position - lower as f64;
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * fraction).round() as u8;
        let (a, b) = (stops[lower], stops[upper]);
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(ColorRamp::RdYlBu, true)
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.ramp.name(),
            if self.reversed { "_r" } else { "" }
        )
    }
}

impl FromStr for ColorMap {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, reversed) = match s.strip_suffix("_r") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let ramp = match name.to_ascii_lowercase().as_str() {
            "rdylbu" => ColorRamp::RdYlBu,
            "rdbu" => ColorRamp::RdBu,
            "viridis" => ColorRamp::Viridis,
            "jet" => ColorRamp::Jet,
            _ => return Err(MapError::UnknownColorMap(s.to_string())),
        };
        Ok(Self::new(ramp, reversed))
    }
}

/// Upper bound on the number of colour bar ticks.
pub const MAX_TICKS: usize = 50;

/// Maps data values in `[vmin, vmax]` onto a colour map. Values outside the
/// bounds take the colour of the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    vmin: f64,
    vmax: f64,
    cmap: ColorMap,
}

impl ColorScale {
    pub fn new(vmin: f64, vmax: f64, cmap: ColorMap) -> Result<Self, MapError> {
        if !vmin.is_finite() || !vmax.is_finite() || vmin >= vmax {
            return Err(MapError::InvalidScale { vmin, vmax });
        }
        Ok(Self { vmin, vmax, cmap })
    }

    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    pub fn cmap(&self) -> ColorMap {
        self.cmap
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.vmin, self.vmax)
    }

    pub fn normalize(&self, value: f64) -> f64 {
        (self.clamp(value) - self.vmin) / (self.vmax - self.vmin)
    }

    /// `None` for missing (NaN) values.
    pub fn color_of(&self, value: f64) -> Option<Rgb> {
        if value.is_nan() {
            return None;
        }
        Some(self.cmap.color_at(self.normalize(value)))
    }

    /// Colour bar ticks: multiples of `step` within the bounds, at most
    /// [`MAX_TICKS`]. A step too fine for that is widened.
    pub fn ticks(&self, step: f64) -> Vec<f64> {
        if !step.is_finite() || step <= 0.0 {
            return vec![self.vmin, self.vmax];
        }
        let step = step.max((self.vmax - self.vmin) / (MAX_TICKS - 1) as f64);
        let first = (self.vmin / step).ceil() as i64;
        let last = (self.vmax / step).floor() as i64;
        (first..=last)
            .take(MAX_TICKS)
            .map(|i| i as f64 * step)
            .collect()
    }

    /// `stops` evenly spaced `(position, colour)` pairs over `[0, 1]`, the way
    /// plotting libraries describe a continuous colour scale.
    pub fn gradient(&self, stops: usize) -> Vec<(f64, Rgb)> {
        let stops = stops.max(2);
        (0..stops)
            .map(|i| {
                let t = i as f64 / (stops - 1) as f64;
                (t, self.cmap.color_at(t))
            })
            .collect()
    }
}

/// The near-surface temperature scale: -60 °C to 50 °C on `RdYlBu_r`.
impl Default for ColorScale {
    fn default() -> Self {
        Self {
            vmin: DEFAULT_VMIN,
            vmax: DEFAULT_VMAX,
            cmap: ColorMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_maps() {
        let cmap: ColorMap = "RdYlBu_r".parse().unwrap();
        assert_eq!(cmap, ColorMap::default());
        assert_eq!(cmap.to_string(), "RdYlBu_r");
        assert_eq!(
            "viridis".parse::<ColorMap>().unwrap(),
            ColorMap::new(ColorRamp::Viridis, false)
        );
        assert!(matches!(
            "magma".parse::<ColorMap>(),
            Err(MapError::UnknownColorMap(_))
        ));
    }

    #[test]
    fn test_color_at_interpolates_between_stops() {
        let cmap = ColorMap::new(ColorRamp::RdYlBu, false);
        assert_eq!(cmap.color_at(0.0), Rgb(0xa5, 0x00, 0x26));
        assert_eq!(cmap.color_at(0.5), Rgb(0xff, 0xff, 0xbf));
        assert_eq!(cmap.color_at(1.0), Rgb(0x31, 0x36, 0x95));
        assert_eq!(cmap.color_at(2.0), cmap.color_at(1.0));
        // Halfway between the first two stops
        assert_eq!(cmap.color_at(0.05), Rgb(0xbe, 0x18, 0x27));
    }

    #[test]
    fn test_color_scale_clamps_and_normalizes() {
        let scale = ColorScale::new(-60.0, 50.0, ColorMap::default()).unwrap();
        assert_eq!(scale.clamp(-75.0), -60.0);
        assert_eq!(scale.clamp(12.5), 12.5);
        assert_eq!(scale.normalize(-60.0), 0.0);
        assert_eq!(scale.normalize(50.0), 1.0);
        assert!((scale.normalize(-5.0) - 0.5).abs() < 1e-12);
        assert_eq!(scale.color_of(f64::NAN), None);
        assert_eq!(scale.color_of(80.0), scale.color_of(50.0));
    }

    #[test]
    fn test_color_scale_rejects_empty_range() {
        assert!(ColorScale::new(10.0, 10.0, ColorMap::default()).is_err());
        assert!(ColorScale::new(50.0, -60.0, ColorMap::default()).is_err());
        assert!(ColorScale::new(f64::NAN, 1.0, ColorMap::default()).is_err());
    }

    #[test]
    fn test_ticks() {
        let scale = ColorScale::new(-60.0, 50.0, ColorMap::default()).unwrap();
        let ticks = scale.ticks(20.0);
        assert_eq!(ticks, vec![-60.0, -40.0, -20.0, 0.0, 20.0, 40.0]);
        assert_eq!(scale.ticks(0.0), vec![-60.0, 50.0]);
        assert_eq!(scale.ticks(f64::INFINITY), vec![-60.0, 50.0]);
    }

    #[test]
    fn test_tiny_tick_step_is_capped() {
        let scale = ColorScale::default();
        let ticks = scale.ticks(1e-12);
        assert!(ticks.len() <= MAX_TICKS);
        assert!(ticks.len() > 2);
        assert!(ticks.iter().all(|t| (-60.0..=50.0).contains(t)));
    }

    #[test]
    fn test_gradient_follows_color_map() {
        let scale = ColorScale::default();
        let gradient = scale.gradient(11);
        assert_eq!(gradient.len(), 11);
        assert_eq!(gradient[0], (0.0, Rgb(0x31, 0x36, 0x95)));
        assert_eq!(gradient[10], (1.0, Rgb(0xa5, 0x00, 0x26)));
        assert_eq!(scale.gradient(0).len(), 2);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(0xa5, 0x00, 0x26).to_hex(), "#a50026");
    }
}
