//! Half-year reporting periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a reporting period.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    /// Start date falls after end date.
    #[error("Reporting period start {start} is after end {end}")]
    StartAfterEnd {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// The year is outside the supported calendar range.
    #[error("Year {0} is out of range")]
    YearOutOfRange(i32),
}

/// Inclusive date window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingPeriod {
    /// Creates a period from explicit bounds.
    ///
    /// # Errors
    /// * `PeriodError::StartAfterEnd` if `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1 to June 30 of `year`.
    pub fn first_half(year: i32) -> Result<Self, PeriodError> {
        Self::from_month_days(year, (1, 1), (6, 30))
    }

    /// July 1 to December 31 of `year`.
    pub fn second_half(year: i32) -> Result<Self, PeriodError> {
        Self::from_month_days(year, (7, 1), (12, 31))
    }

    /// The half-year that contains `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, PeriodError> {
        if date.month() <= 6 {
            Self::first_half(date.year())
        } else {
            Self::second_half(date.year())
        }
    }

    fn from_month_days(
        year: i32,
        (start_month, start_day): (u32, u32),
        (end_month, end_day): (u32, u32),
    ) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, start_month, start_day)
            .ok_or(PeriodError::YearOutOfRange(year))?;
        let end = NaiveDate::from_ymd_opt(year, end_month, end_day)
            .ok_or(PeriodError::YearOutOfRange(year))?;
        Self::new(start, end)
    }

    /// First day of the period.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls within the period, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Display label, e.g. "January 1 - June 30, 2025".
    #[must_use]
    pub fn label(&self) -> String {
        if self.start.year() == self.end.year() {
            format!(
                "{} - {}",
                self.start.format("%B %-d"),
                self.end.format("%B %-d, %Y")
            )
        } else {
            format!(
                "{} - {}",
                self.start.format("%B %-d, %Y"),
                self.end.format("%B %-d, %Y")
            )
        }
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
