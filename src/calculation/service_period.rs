//! Service period (tenure) calculation.
//!
//! Tenure is decomposed with a fixed 365-day year and 30-day month, the
//! convention labour-law settlements are computed with. It deliberately does
//! not follow the calendar; leap days simply count as days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Days in a service year.
pub const DAYS_PER_SERVICE_YEAR: i64 = 365;

/// Days in a service month.
pub const DAYS_PER_SERVICE_MONTH: i64 = 30;

/// Elapsed tenure between two dates.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::ServiceSpan;
/// use chrono::NaiveDate;
///
/// let span = ServiceSpan::between(
///     NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(span.total_days, 2922);
/// assert_eq!((span.years, span.months, span.days), (8, 0, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpan {
    /// First day of the span.
    pub start_date: NaiveDate,
    /// Last day of the span.
    pub end_date: NaiveDate,
    /// Whole 365-day years.
    pub years: i64,
    /// Whole 30-day months left after the years.
    pub months: i64,
    /// Days left after the months.
    pub days: i64,
    /// Whole-day difference between the dates.
    pub total_days: i64,
}

impl ServiceSpan {
    /// Computes the span between `start_date` and `end_date`.
    ///
    /// Fails with `InvalidRange` if `end_date` is before `start_date`.
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidRange {
                field: "service_period".to_string(),
                start: start_date,
                end: end_date,
            });
        }

        let total_days = (end_date - start_date).num_days();
        let years = total_days / DAYS_PER_SERVICE_YEAR;
        let remainder = total_days % DAYS_PER_SERVICE_YEAR;

        Ok(Self {
            start_date,
            end_date,
            years,
            months: remainder / DAYS_PER_SERVICE_MONTH,
            days: remainder % DAYS_PER_SERVICE_MONTH,
            total_days,
        })
    }

    /// Days beyond the whole years (months × 30 + days).
    pub fn remainder_days(&self) -> i64 {
        self.months * DAYS_PER_SERVICE_MONTH + self.days
    }

    /// Human-readable summary, e.g. "8 years, 0 months, 2 days (2922 days)".
    pub fn describe(&self) -> String {
        format!(
            "{} years, {} months, {} days ({} days)",
            self.years, self.months, self.days, self.total_days
        )
    }
}
