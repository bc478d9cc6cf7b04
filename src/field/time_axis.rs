//! Decoding of CF-convention time coordinates such as
//! `"hours since 1900-01-01 00:00:00.0"` or `"seconds since 1970-01-01"`.

use crate::field::error::FieldError;
use chrono::{Duration, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    seconds_per_unit: f64,
    epoch: NaiveDateTime,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self, FieldError> {
        let invalid = || FieldError::TimeUnits(units.to_string());
        let (unit, epoch) = units.trim().split_once(" since ").ok_or_else(invalid)?;
        let seconds_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "s" => 1.0,
            "minutes" | "minute" | "mins" => 60.0,
            "hours" | "hour" | "h" => 3_600.0,
            "days" | "day" | "d" => 86_400.0,
            _ => return Err(invalid()),
        };
        let epoch = parse_epoch(epoch).ok_or_else(invalid)?;
        Ok(Self {
            seconds_per_unit,
            epoch,
        })
    }

    pub fn decode(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.seconds_per_unit * 1_000.0).round() as i64;
        self.epoch.checked_add_signed(Duration::milliseconds(millis))
    }
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_end_matches("UTC").trim().trim_end_matches('Z');
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
