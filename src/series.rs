//! Sunset series generation: one ephemeris call per calendar day

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::Result;
use crate::ephemeris::{self, SolarOutcome};
use crate::error::SunfallError;
use crate::models::{Location, SunsetSample, SunsetSeries};

/// Compute the sunset series for every calendar day of `year` at `location`.
///
/// Days without a sunset at polar latitudes are flagged, not dropped, so the
/// series always covers the full year. Pure: identical inputs yield an
/// identical series.
pub fn generate(location: &Location, year: i32) -> Result<SunsetSeries> {
    location.validate()?;
    let tz = location.tz()?;

    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| SunfallError::series(format!("invalid year {year}")))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| SunfallError::series(format!("invalid year {year}")))?;

    info!(
        "Computing sunset series for {} ({}) in {year}",
        location.city,
        location.format_coordinates()
    );

    let mut samples = Vec::with_capacity(end.ordinal() as usize);
    let mut polar_days = 0usize;
    for date in start.iter_days().take_while(|d| *d <= end) {
        let sample = match ephemeris::sunset_instant(location.latitude, location.longitude, date)? {
            SolarOutcome::Sets(utc) => SunsetSample::setting(date, utc, tz),
            SolarOutcome::PolarDay => {
                polar_days += 1;
                SunsetSample::polar_day(date)
            }
            SolarOutcome::PolarNight => {
                polar_days += 1;
                SunsetSample::polar_night(date)
            }
        };
        samples.push(sample);
    }

    if polar_days > 0 {
        warn!(
            "{polar_days} days without a sunset at latitude {}",
            location.latitude
        );
    }
    debug!("Generated {} daily samples", samples.len());

    SunsetSeries::from_samples(location.clone(), year, samples)
}
