//! Sunset series: one sample per calendar day of a target year

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::Result;
use crate::error::SunfallError;
use crate::models::Location;

/// Sunset observation for a single calendar day
#[derive(Debug, Clone, PartialEq)]
pub enum SunsetObservation {
    /// The sun sets on this day
    Sets {
        /// Sunset instant in UTC, retained for reporting
        utc: DateTime<Utc>,
        /// Sunset instant on the local wall clock, respecting DST
        local: DateTime<Tz>,
        /// Decimal hours of the UTC instant (continuous across DST)
        hours_utc: f64,
        /// Decimal hours of the local wall clock (jumps at DST transitions)
        hours_local: f64,
    },
    /// Polar day: the sun never sets on this date
    PolarDay,
    /// Polar night: the sun never rises on this date
    PolarNight,
}

/// A date and its sunset observation
#[derive(Debug, Clone, PartialEq)]
pub struct SunsetSample {
    pub date: NaiveDate,
    pub observation: SunsetObservation,
}

impl SunsetSample {
    /// Build a setting-sun sample from the UTC instant, localized to `tz`
    #[must_use]
    pub fn setting(date: NaiveDate, utc: DateTime<Utc>, tz: Tz) -> Self {
        let local = utc.with_timezone(&tz);
        Self {
            date,
            observation: SunsetObservation::Sets {
                utc,
                hours_utc: decimal_hours(utc.time()),
                hours_local: decimal_hours(local.time()),
                local,
            },
        }
    }

    /// Flag a polar-day date (no sunset exists)
    #[must_use]
    pub fn polar_day(date: NaiveDate) -> Self {
        Self {
            date,
            observation: SunsetObservation::PolarDay,
        }
    }

    /// Flag a polar-night date (no sunrise exists)
    #[must_use]
    pub fn polar_night(date: NaiveDate) -> Self {
        Self {
            date,
            observation: SunsetObservation::PolarNight,
        }
    }

    /// Whether this date has no sunset
    #[must_use]
    pub fn is_polar(&self) -> bool {
        !matches!(self.observation, SunsetObservation::Sets { .. })
    }
}

/// Decimal hours of a wall-clock time, e.g. 15:30:00 becomes 15.5
#[must_use]
pub fn decimal_hours(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0 + f64::from(time.second()) / 3600.0
}

/// Ordered sunset samples covering every calendar day of one year.
///
/// Invariants enforced at construction: exactly 365 or 366 entries, strictly
/// increasing dates, no gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct SunsetSeries {
    location: Location,
    year: i32,
    samples: Vec<SunsetSample>,
}

impl SunsetSeries {
    /// Build a series from raw samples, enforcing the coverage invariants
    pub fn from_samples(
        location: Location,
        year: i32,
        samples: Vec<SunsetSample>,
    ) -> Result<Self> {
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| SunfallError::series(format!("invalid year {year}")))?;
        let expected = last.ordinal() as usize;
        if samples.len() != expected {
            return Err(SunfallError::series(format!(
                "expected {expected} samples for {year}, got {}",
                samples.len()
            )));
        }

        let mut day = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| SunfallError::series(format!("invalid year {year}")))?;
        for sample in &samples {
            if sample.date != day {
                return Err(SunfallError::series(format!(
                    "gap in series: expected {day}, found {}",
                    sample.date
                )));
            }
            day = day
                .succ_opt()
                .ok_or_else(|| SunfallError::series("date overflow".to_string()))?;
        }

        Ok(Self {
            location,
            year,
            samples,
        })
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[SunsetSample] {
        &self.samples
    }

    /// Date column of the tabular output
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.samples.iter().map(|s| s.date).collect()
    }

    /// Whether every day of the year has a sunset
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.samples.iter().all(|s| !s.is_polar())
    }

    /// Decimal-hour column in the continuous UTC reference.
    ///
    /// Fails when the series contains polar gaps, since no complete column
    /// (and therefore no report) can be produced from it.
    pub fn hours_utc(&self) -> Result<Vec<f64>> {
        self.hours_column(|o| match o {
            SunsetObservation::Sets { hours_utc, .. } => Some(*hours_utc),
            _ => None,
        })
    }

    /// Decimal-hour column on the local wall clock
    pub fn hours_local(&self) -> Result<Vec<f64>> {
        self.hours_column(|o| match o {
            SunsetObservation::Sets { hours_local, .. } => Some(*hours_local),
            _ => None,
        })
    }

    /// Local sunset timestamp column
    pub fn sunset_times_local(&self) -> Result<Vec<DateTime<Tz>>> {
        self.samples
            .iter()
            .map(|s| match &s.observation {
                SunsetObservation::Sets { local, .. } => Ok(local.clone()),
                _ => Err(self.polar_gap_error(s.date)),
            })
            .collect()
    }

    /// UTC sunset timestamp column
    pub fn sunset_times_utc(&self) -> Result<Vec<DateTime<Utc>>> {
        self.samples
            .iter()
            .map(|s| match &s.observation {
                SunsetObservation::Sets { utc, .. } => Ok(*utc),
                _ => Err(self.polar_gap_error(s.date)),
            })
            .collect()
    }

    fn hours_column(&self, pick: impl Fn(&SunsetObservation) -> Option<f64>) -> Result<Vec<f64>> {
        self.samples
            .iter()
            .map(|s| pick(&s.observation).ok_or_else(|| self.polar_gap_error(s.date)))
            .collect()
    }

    fn polar_gap_error(&self, date: NaiveDate) -> SunfallError {
        SunfallError::series(format!(
            "no sunset on {date} (polar day/night at {})",
            self.location.format_coordinates()
        ))
    }
}
