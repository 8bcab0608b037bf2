//! Solar ephemeris wrapper
//!
//! Sunset timing is delegated to the SPA solar-position crate; this module
//! only adapts its output into the three-way outcome the series generator
//! consumes. Polar day and polar night are values, not errors.

use chrono::{DateTime, NaiveDate, Utc};
use spa::{StdFloatOps, SunriseAndSet, sunrise_and_set};

use crate::Result;
use crate::error::SunfallError;

/// Outcome of a sunset computation for a single calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolarOutcome {
    /// The sun sets on this day at the given instant
    Sets(DateTime<Utc>),
    /// The sun never sets on this day
    PolarDay,
    /// The sun never rises on this day
    PolarNight,
}

/// Compute the sunset instant for the given coordinates and calendar date.
///
/// The date is interpreted as a UTC calendar day; the returned instant is
/// timezone-aware (UTC). Out-of-range coordinates are fatal.
pub fn sunset_instant(latitude: f64, longitude: f64, date: NaiveDate) -> Result<SolarOutcome> {
    let noon_utc = date.and_hms_opt(12, 0, 0).unwrap().and_utc();

    let result = sunrise_and_set::<StdFloatOps>(noon_utc.into(), latitude, longitude)
        .map_err(|e| {
            SunfallError::ephemeris(format!(
                "lat={latitude}, lng={longitude}, date={date}: {e:?}"
            ))
        })?;

    Ok(match result {
        SunriseAndSet::Daylight(_, set) => {
            let set: DateTime<Utc> = DateTime::from(set);
            SolarOutcome::Sets(set)
        }
        SunriseAndSet::PolarDay => SolarOutcome::PolarDay,
        SunriseAndSet::PolarNight => SolarOutcome::PolarNight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamburg_winter_sunset_window() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 13).unwrap();
        match sunset_instant(53.5511, 9.9937, date).unwrap() {
            SolarOutcome::Sets(utc) => {
                // Mid-December sunset in Hamburg is just before 15:00 UTC
                let hours = crate::models::series::decimal_hours(utc.time());
                assert!((14.0..16.0).contains(&hours), "sunset at {hours} UTC");
            }
            other => panic!("expected a sunset, got {other:?}"),
        }
    }

    #[test]
    fn test_polar_day_is_signaled() {
        // Longyearbyen, Svalbard in midsummer
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let outcome = sunset_instant(78.2232, 15.6267, date).unwrap();
        assert_eq!(outcome, SolarOutcome::PolarDay);
    }

    #[test]
    fn test_polar_night_is_signaled() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let outcome = sunset_instant(78.2232, 15.6267, date).unwrap();
        assert_eq!(outcome, SolarOutcome::PolarNight);
    }

    #[test]
    fn test_out_of_range_latitude_is_fatal() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let err = sunset_instant(95.0, 0.0, date).unwrap_err();
        assert!(matches!(err, SunfallError::Ephemeris { .. }));
    }
}
