//! Day-over-day rate of change of sunset time
//!
//! Finite differences scaled to minutes per day. A wall-clock jump caused by
//! a daylight-saving transition is removed before a difference is reported,
//! so the rate reflects the solar trend rather than the clock shift.

use chrono::{NaiveDate, Offset, TimeZone};
use chrono_tz::Tz;
use tracing::debug;

use crate::Result;
use crate::error::SunfallError;
use crate::models::SunsetSeries;

/// Finite differences above this magnitude on a pair straddling a known
/// transition are treated as clock artifacts, in minutes
pub const DST_JUMP_THRESHOLD_MINUTES: f64 = 30.0;

/// A daylight-saving transition supplied to the derivative computer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstTransition {
    /// Calendar date on which local clocks shift
    pub date: NaiveDate,
    /// Signed clock shift in minutes (+60 = spring forward)
    pub shift_minutes: i32,
}

impl DstTransition {
    /// Transition with the standard one-hour spring-forward shift
    #[must_use]
    pub fn spring_forward(date: NaiveDate) -> Self {
        Self {
            date,
            shift_minutes: 60,
        }
    }

    /// Transition with the standard one-hour fall-back shift
    #[must_use]
    pub fn fall_back(date: NaiveDate) -> Self {
        Self {
            date,
            shift_minutes: -60,
        }
    }

    /// Read the actual clock shift around `date` from the timezone database.
    ///
    /// Returns `None` when the UTC offset does not change between the
    /// previous day and `date`, e.g. when the supplied marker date is wrong.
    /// Regions with 30- or 45-minute shifts are handled without any special
    /// casing.
    #[must_use]
    pub fn from_timezone(date: NaiveDate, tz: Tz) -> Option<Self> {
        let before = utc_offset_minutes(tz, date.pred_opt()?);
        let after = utc_offset_minutes(tz, date);
        let shift_minutes = after - before;
        if shift_minutes == 0 {
            None
        } else {
            Some(Self {
                date,
                shift_minutes,
            })
        }
    }
}

/// UTC offset of `tz` at noon UTC on `date`, in minutes. Noon keeps the
/// probe clear of the transition window itself.
fn utc_offset_minutes(tz: Tz, date: NaiveDate) -> i32 {
    let at = date.and_hms_opt(12, 0, 0).unwrap();
    tz.offset_from_utc_datetime(&at).fix().local_minus_utc() / 60
}

/// Resolve configured transition markers against the timezone database,
/// falling back to the standard one-hour shifts.
#[must_use]
pub fn resolve_transitions(
    tz: Tz,
    spring: Option<NaiveDate>,
    fall: Option<NaiveDate>,
) -> Vec<DstTransition> {
    let mut transitions = Vec::new();
    if let Some(date) = spring {
        transitions.push(
            DstTransition::from_timezone(date, tz)
                .unwrap_or_else(|| DstTransition::spring_forward(date)),
        );
    }
    if let Some(date) = fall {
        transitions.push(
            DstTransition::from_timezone(date, tz).unwrap_or_else(|| DstTransition::fall_back(date)),
        );
    }
    transitions
}

/// Rate of change observed on `date` relative to the previous day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativePoint {
    pub date: NaiveDate,
    /// Change in sunset time, minutes per day
    pub minutes_per_day: f64,
}

/// Ordered finite differences of a sunset series, one point per adjacent
/// pair of samples
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeSeries {
    points: Vec<DerivativePoint>,
}

impl DerivativeSeries {
    /// Differentiate a decimal-hour sunset sequence.
    ///
    /// `dates` and `hours` run in parallel; the result has exactly one point
    /// per adjacent pair, dated at the later day. A difference exceeding
    /// [`DST_JUMP_THRESHOLD_MINUTES`] on a pair touching a supplied
    /// transition date is corrected by that transition's clock shift.
    pub fn from_hours(
        dates: &[NaiveDate],
        hours: &[f64],
        transitions: &[DstTransition],
    ) -> Result<Self> {
        if dates.len() != hours.len() {
            return Err(SunfallError::series(format!(
                "date/hour column length mismatch: {} dates vs {} hours",
                dates.len(),
                hours.len()
            )));
        }
        if hours.is_empty() {
            return Err(SunfallError::series(
                "cannot differentiate an empty sunset series",
            ));
        }
        if hours.len() < 2 {
            return Err(SunfallError::series(
                "cannot differentiate a single-sample sunset series",
            ));
        }

        let mut points = Vec::with_capacity(hours.len() - 1);
        for i in 0..hours.len() - 1 {
            let date = dates[i + 1];
            let raw = (hours[i + 1] - hours[i]) * 60.0;
            let straddled = transitions
                .iter()
                .find(|t| t.date == date || t.date == dates[i]);
            let minutes_per_day = match straddled {
                Some(transition) if raw.abs() > DST_JUMP_THRESHOLD_MINUTES => {
                    debug!(
                        "Removing {} minute clock shift from the {date} difference",
                        transition.shift_minutes
                    );
                    raw - f64::from(transition.shift_minutes)
                }
                _ => raw,
            };
            points.push(DerivativePoint {
                date,
                minutes_per_day,
            });
        }
        Ok(Self { points })
    }

    /// Differentiate the local wall-clock hours of a full-year series
    pub fn from_series(series: &SunsetSeries, transitions: &[DstTransition]) -> Result<Self> {
        Self::from_hours(&series.dates(), &series.hours_local()?, transitions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[DerivativePoint] {
        &self.points
    }

    /// Largest increase in sunset time; ties break to the earliest date
    #[must_use]
    pub fn max_increase(&self) -> Option<&DerivativePoint> {
        self.points.iter().reduce(|best, p| {
            if p.minutes_per_day > best.minutes_per_day {
                p
            } else {
                best
            }
        })
    }

    /// Largest decrease in sunset time; ties break to the earliest date
    #[must_use]
    pub fn max_decrease(&self) -> Option<&DerivativePoint> {
        self.points.iter().reduce(|best, p| {
            if p.minutes_per_day < best.minutes_per_day {
                p
            } else {
                best
            }
        })
    }
}
