//! Seasonal extrema reporting
//!
//! Scans the sunset series and its derivative for the seasonal turning
//! points and renders the human-readable summary block.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::Result;
use crate::derivative::{DerivativePoint, DerivativeSeries};
use crate::error::SunfallError;
use crate::models::{SunsetObservation, SunsetSeries};

/// One sunset extremum: the date plus both clock representations
#[derive(Debug, Clone)]
pub struct SunsetExtreme {
    pub date: NaiveDate,
    pub local: DateTime<Tz>,
    pub utc: DateTime<Utc>,
}

/// One rate-of-change extremum
#[derive(Debug, Clone, Copy)]
pub struct RateExtreme {
    pub date: NaiveDate,
    pub minutes_per_day: f64,
}

impl From<&DerivativePoint> for RateExtreme {
    fn from(point: &DerivativePoint) -> Self {
        Self {
            date: point.date,
            minutes_per_day: point.minutes_per_day,
        }
    }
}

/// Read-only seasonal summary derived from a sunset series and its
/// derivative. Computed once, never mutated.
#[derive(Debug, Clone)]
pub struct SeasonalReport {
    pub city: String,
    pub year: i32,
    /// Earliest sunset of the year; its date is the winter solstice
    pub earliest: SunsetExtreme,
    /// Latest sunset of the year; its date is the summer solstice
    pub latest: SunsetExtreme,
    pub max_increase: RateExtreme,
    pub max_decrease: RateExtreme,
}

impl SeasonalReport {
    /// Scan series and derivative for the seasonal turning points.
    ///
    /// Extrema are located on the UTC decimal-hour column so a
    /// daylight-saving jump cannot displace them; ties break to the earliest
    /// date of the year.
    pub fn analyze(series: &SunsetSeries, derivative: &DerivativeSeries) -> Result<Self> {
        let hours = series.hours_utc()?;

        let mut earliest_idx = 0;
        let mut latest_idx = 0;
        for (i, h) in hours.iter().enumerate() {
            if *h < hours[earliest_idx] {
                earliest_idx = i;
            }
            if *h > hours[latest_idx] {
                latest_idx = i;
            }
        }

        let max_increase = derivative
            .max_increase()
            .ok_or_else(|| SunfallError::series("derivative series is empty"))?;
        let max_decrease = derivative
            .max_decrease()
            .ok_or_else(|| SunfallError::series("derivative series is empty"))?;

        Ok(Self {
            city: series.location().city.clone(),
            year: series.year(),
            earliest: extreme_at(series, earliest_idx)?,
            latest: extreme_at(series, latest_idx)?,
            max_increase: max_increase.into(),
            max_decrease: max_decrease.into(),
        })
    }

    /// Winter solstice: the date of the earliest sunset
    #[must_use]
    pub fn winter_solstice(&self) -> NaiveDate {
        self.earliest.date
    }

    /// Summer solstice: the date of the latest sunset
    #[must_use]
    pub fn summer_solstice(&self) -> NaiveDate {
        self.latest.date
    }
}

fn extreme_at(series: &SunsetSeries, idx: usize) -> Result<SunsetExtreme> {
    let sample = &series.samples()[idx];
    match &sample.observation {
        SunsetObservation::Sets { utc, local, .. } => Ok(SunsetExtreme {
            date: sample.date,
            local: local.clone(),
            utc: *utc,
        }),
        _ => Err(SunfallError::series(format!("no sunset on {}", sample.date))),
    }
}

impl fmt::Display for SeasonalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Sunset Time Statistics for {} {} ===",
            self.city, self.year
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Earliest sunset: {} (local) / {} UTC on {}",
            self.earliest.local.format("%H:%M"),
            self.earliest.utc.format("%H:%M"),
            self.earliest.date.format("%B %d")
        )?;
        writeln!(
            f,
            "Latest sunset: {} (local) / {} UTC on {}",
            self.latest.local.format("%H:%M"),
            self.latest.utc.format("%H:%M"),
            self.latest.date.format("%B %d")
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Maximum rate of increase: {:.2} minutes/day on {}",
            self.max_increase.minutes_per_day,
            self.max_increase.date.format("%B %d")
        )?;
        writeln!(
            f,
            "Maximum rate of decrease: {:.2} minutes/day on {}",
            self.max_decrease.minutes_per_day,
            self.max_decrease.date.format("%B %d")
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "*** Winter Solstice (shorter -> longer days): {} ***",
            self.winter_solstice().format("%B %d, %Y")
        )?;
        writeln!(f, "    This is the shortest day of the year")?;
        writeln!(f)?;
        writeln!(
            f,
            "*** Summer Solstice (longer -> shorter days): {} ***",
            self.summer_solstice().format("%B %d, %Y")
        )?;
        write!(f, "    This is the longest day of the year")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, SunsetSample};

    fn test_location() -> Location {
        Location::new("Testville", "Nowhere", "UTC", 50.0, 10.0)
    }

    /// A year of sunsets at 18:00 UTC except for a dip and a peak
    fn synthetic_series(year: i32) -> SunsetSeries {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
        let samples: Vec<SunsetSample> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                let minute = match date.format("%m-%d").to_string().as_str() {
                    // Two identical minima; the first must win
                    "02-10" | "02-20" => 15,
                    "06-21" => 45,
                    _ => 30,
                };
                let utc = date.and_hms_opt(18, minute, 0).unwrap().and_utc();
                SunsetSample::setting(date, utc, chrono_tz::UTC)
            })
            .collect();
        SunsetSeries::from_samples(test_location(), year, samples).unwrap()
    }

    #[test]
    fn test_extrema_and_tie_break() {
        let series = synthetic_series(2025);
        let derivative = DerivativeSeries::from_series(&series, &[]).unwrap();
        let report = SeasonalReport::analyze(&series, &derivative).unwrap();

        assert_eq!(
            report.winter_solstice(),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
        );
        assert_eq!(
            report.summer_solstice(),
            NaiveDate::from_ymd_opt(2025, 6, 21).unwrap()
        );
        assert_eq!(report.city, "Testville");
        assert_eq!(report.year, 2025);
    }

    #[test]
    fn test_rate_extrema_line_up_with_the_steps() {
        let series = synthetic_series(2025);
        let derivative = DerivativeSeries::from_series(&series, &[]).unwrap();
        let report = SeasonalReport::analyze(&series, &derivative).unwrap();

        // The largest increase is the recovery out of the first dip
        assert_eq!(
            report.max_increase.date,
            NaiveDate::from_ymd_opt(2025, 2, 11).unwrap()
        );
        assert!((report.max_increase.minutes_per_day - 15.0).abs() < 1e-9);
        // The largest decrease is the drop into the first dip
        assert_eq!(
            report.max_decrease.date,
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
        );
        assert!((report.max_decrease.minutes_per_day + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_field_order() {
        let series = synthetic_series(2025);
        let derivative = DerivativeSeries::from_series(&series, &[]).unwrap();
        let report = SeasonalReport::analyze(&series, &derivative).unwrap();
        let text = report.to_string();

        let order = [
            "Earliest sunset:",
            "Latest sunset:",
            "Maximum rate of increase:",
            "Maximum rate of decrease:",
            "Winter Solstice",
            "Summer Solstice",
        ];
        let positions: Vec<usize> = order.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "summary:\n{text}");
        assert!(text.contains("Earliest sunset: 18:15 (local) / 18:15 UTC on February 10"));
    }
}
