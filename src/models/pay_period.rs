//! Pay period and payroll facts models.
//!
//! This module contains the [`PayPeriod`] a payroll run covers and the
//! [`PayrollFacts`] aggregate the accrual engine consumes. Time-log scanning
//! happens in the record layer; the engine only sees the totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CompensationProfile;
use crate::error::{EngineError, EngineResult};

/// Nationality class of an employee, which selects the GOSI rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NationalityClass {
    /// A national of the jurisdiction.
    Domestic,
    /// An expatriate employee.
    Foreign,
}

/// The date range a payroll run covers (inclusive on both ends).
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
/// assert_eq!(period.calendar_days(), 31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the period, counting both ends.
    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Fails with `InvalidRange` if the period ends before it starts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidRange {
                field: "pay_period".to_string(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Everything the accrual engine needs to pay one employee for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFacts {
    /// Reference to the employee record.
    pub employee_ref: String,
    /// The period being paid.
    pub period: PayPeriod,
    /// Monthly compensation in effect for the period.
    pub compensation: CompensationProfile,
    /// Drives the GOSI contribution rates.
    pub nationality_class: NationalityClass,
    /// Payable days in the period.
    pub days_in_period: u32,
    /// Unpaid absence days, aggregated from time logs.
    #[serde(default)]
    pub days_absent: Decimal,
    /// Approved overtime hours, aggregated from time logs.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Deductions supplied by the caller (e.g. loan installments).
    #[serde(default)]
    pub other_deductions: Decimal,
}
