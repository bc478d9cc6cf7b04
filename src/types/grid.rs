//! Spatial selection parameters of a retrieve request.

use crate::types::error::RequestError;
use std::str::FromStr;

/// Output grid resolution in degrees, `[latitude step, longitude step]`.
///
/// When a grid is given the service interpolates the native 0.25° field onto it.
///
/// # Examples
///
/// ```
/// use cdsfetch::Grid;
///
/// let grid: Grid = "2.0,2.0".parse().unwrap();
/// assert_eq!(grid, Grid(2.0, 2.0));
/// assert!(Grid(0.0, 2.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid(pub f64, pub f64);

impl Grid {
    /// Same step in both directions.
    pub fn uniform(step: f64) -> Self {
        Self(step, step)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        let invalid = |reason| RequestError::InvalidGrid {
            lat: self.0,
            lon: self.1,
            reason,
        };
        if !self.0.is_finite() || !self.1.is_finite() {
            return Err(invalid("steps must be finite"));
        }
        if self.0 <= 0.0 || self.1 <= 0.0 {
            return Err(invalid("steps must be positive"));
        }
        if self.0 > 90.0 {
            return Err(invalid("latitude step must not exceed 90 degrees"));
        }
        if self.1 > 360.0 {
            return Err(invalid("longitude step must not exceed 360 degrees"));
        }
        Ok(())
    }

    pub(crate) fn to_array(self) -> [f64; 2] {
        [self.0, self.1]
    }
}

impl FromStr for Grid {
    type Err = RequestError;

    /// Parses `"2.0"` or `"2.0,1.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim().parse::<f64>().map_err(|_| RequestError::InvalidGrid {
                lat: f64::NAN,
                lon: f64::NAN,
                reason: "steps must be numbers",
            })
        };
        let grid = match s.split_once(',') {
            Some((lat, lon)) => Grid(parse(lat)?, parse(lon)?),
            None => Grid::uniform(parse(s)?),
        };
        grid.validate()?;
        Ok(grid)
    }
}

/// Geographical sub-area, `[north, west, south, east]` in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl Area {
    pub fn new(north: f64, west: f64, south: f64, east: f64) -> Self {
        Self {
            north,
            west,
            south,
            east,
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        let invalid = |reason| RequestError::InvalidArea {
            north: self.north,
            west: self.west,
            south: self.south,
            east: self.east,
            reason,
        };
        let values = [self.north, self.west, self.south, self.east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("bounds must be finite"));
        }
        if !(-90.0..=90.0).contains(&self.north) || !(-90.0..=90.0).contains(&self.south) {
            return Err(invalid("latitudes must be within -90..=90"));
        }
        if self.south > self.north {
            return Err(invalid("south must not be north of north"));
        }
        if !(-180.0..=360.0).contains(&self.west) || !(-180.0..=360.0).contains(&self.east) {
            return Err(invalid("longitudes must be within -180..=360"));
        }
        Ok(())
    }

    pub(crate) fn to_array(self) -> [f64; 4] {
        [self.north, self.west, self.south, self.east]
    }
}
