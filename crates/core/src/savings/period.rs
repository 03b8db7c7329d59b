//! Period calendar: recurring deposit dates for savings plans.
//!
//! Every date of a schedule is anchored on the plan's start date
//! (`start + k periods`) rather than stepped from the previous date, so a
//! plan starting on the 31st keeps landing on the last day of short months
//! without drifting to the 28th.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DATE_FORMAT;
use crate::errors::{Error, Result, ValidationError};

/// Recurrence granularity of a savings plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Week,
    Fortnight,
    Month,
    Quarter,
    Year,
}

impl PeriodUnit {
    pub const ALL: [PeriodUnit; 5] = [
        PeriodUnit::Week,
        PeriodUnit::Fortnight,
        PeriodUnit::Month,
        PeriodUnit::Quarter,
        PeriodUnit::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodUnit::Week => "week",
            PeriodUnit::Fortnight => "fortnight",
            PeriodUnit::Month => "month",
            PeriodUnit::Quarter => "quarter",
            PeriodUnit::Year => "year",
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(PeriodUnit::Week),
            "fortnight" => Ok(PeriodUnit::Fortnight),
            "month" => Ok(PeriodUnit::Month),
            "quarter" => Ok(PeriodUnit::Quarter),
            "year" => Ok(PeriodUnit::Year),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown period unit '{}'",
                other
            )))),
        }
    }
}

/// Moves `date` forward by `count` periods.
///
/// Month based units clamp to the last day of the target month
/// (Jan 31 + 1 month = Feb 28 or 29). Returns `None` when the result falls
/// outside chrono's supported range.
pub fn advance(date: NaiveDate, unit: PeriodUnit, count: u32) -> Option<NaiveDate> {
    match unit {
        PeriodUnit::Week => date.checked_add_days(Days::new(7 * u64::from(count))),
        PeriodUnit::Fortnight => date.checked_add_days(Days::new(14 * u64::from(count))),
        PeriodUnit::Month => date.checked_add_months(Months::new(count)),
        PeriodUnit::Quarter => date.checked_add_months(Months::new(count.checked_mul(3)?)),
        PeriodUnit::Year => date.checked_add_months(Months::new(count.checked_mul(12)?)),
    }
}

/// Produces up to `total_periods` dates starting at `start`, one period
/// apart, stopping before the first date strictly after `end`.
pub fn generate_schedule(
    start: NaiveDate,
    end: NaiveDate,
    unit: PeriodUnit,
    total_periods: u32,
) -> Vec<NaiveDate> {
    (0..total_periods)
        .map_while(|k| advance(start, unit, k))
        .take_while(|date| *date <= end)
        .collect()
}

/// Why a raw schedule request produced no dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleWarning {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("{field} '{value}' is not a valid YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },

    #[error("unknown period unit '{0}', expected one of week, fortnight, month, quarter, year")]
    UnknownPeriodUnit(String),

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("total periods must be at least 1")]
    ZeroPeriods,
}

/// Outcome of resolving a schedule from raw request values.
///
/// Invalid input never fails hard here: it yields an empty schedule and a
/// warning, and the caller decides whether that is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub dates: Vec<NaiveDate>,
    pub warning: Option<ScheduleWarning>,
}

impl Schedule {
    fn rejected(warning: ScheduleWarning) -> Self {
        warn!("Schedule request rejected: {}", warning);
        Schedule {
            dates: Vec::new(),
            warning: Some(warning),
        }
    }

    /// Resolves a schedule from optional raw request values.
    pub fn resolve(
        start_date: Option<&str>,
        end_date: Option<&str>,
        period: Option<&str>,
        total_periods: Option<u32>,
    ) -> Schedule {
        let Some(start_raw) = start_date.filter(|s| !s.trim().is_empty()) else {
            return Self::rejected(ScheduleWarning::MissingParameter("start_date"));
        };
        let Some(end_raw) = end_date.filter(|s| !s.trim().is_empty()) else {
            return Self::rejected(ScheduleWarning::MissingParameter("end_date"));
        };
        let Some(period_raw) = period.filter(|s| !s.trim().is_empty()) else {
            return Self::rejected(ScheduleWarning::MissingParameter("period"));
        };
        let Some(total) = total_periods else {
            return Self::rejected(ScheduleWarning::MissingParameter("totalPeriods"));
        };

        let Ok(start) = NaiveDate::parse_from_str(start_raw.trim(), DATE_FORMAT) else {
            return Self::rejected(ScheduleWarning::InvalidDate {
                field: "start_date",
                value: start_raw.to_string(),
            });
        };
        let Ok(end) = NaiveDate::parse_from_str(end_raw.trim(), DATE_FORMAT) else {
            return Self::rejected(ScheduleWarning::InvalidDate {
                field: "end_date",
                value: end_raw.to_string(),
            });
        };
        let Ok(unit) = period_raw.parse::<PeriodUnit>() else {
            return Self::rejected(ScheduleWarning::UnknownPeriodUnit(period_raw.to_string()));
        };

        Self::from_parts(start, end, unit, total)
    }

    /// Resolves a schedule from already typed values.
    pub fn from_parts(start: NaiveDate, end: NaiveDate, unit: PeriodUnit, total: u32) -> Schedule {
        if total == 0 {
            return Self::rejected(ScheduleWarning::ZeroPeriods);
        }
        if end < start {
            return Self::rejected(ScheduleWarning::EndBeforeStart { start, end });
        }
        Schedule {
            dates: generate_schedule(start, end, unit, total),
            warning: None,
        }
    }

    /// Returns the dates, turning a warning or a short schedule into a
    /// validation error.
    pub fn require(self, expected: u32) -> Result<Vec<NaiveDate>> {
        if let Some(warning) = self.warning {
            return Err(Error::Validation(ValidationError::Schedule(
                warning.to_string(),
            )));
        }
        if self.dates.len() < expected as usize {
            return Err(Error::Validation(ValidationError::Schedule(format!(
                "the date range only fits {} of {} periods",
                self.dates.len(),
                expected
            ))));
        }
        Ok(self.dates)
    }
}
