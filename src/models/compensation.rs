//! Compensation profile model.
//!
//! This module defines the monthly pay components of an employee. All
//! amounts are in a single currency and must be non-negative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The monthly compensation components of an employee.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::CompensationProfile;
/// use rust_decimal::Decimal;
///
/// let profile = CompensationProfile {
///     basic_salary: Decimal::from(5000),
///     housing_allowance: Decimal::from(2000),
///     transportation_allowance: Decimal::from(500),
///     ..CompensationProfile::default()
/// };
/// assert_eq!(profile.eosb_base_wage(), Decimal::from(7000));
/// assert_eq!(profile.monthly_total(), Decimal::from(7500));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationProfile {
    /// Basic monthly salary.
    pub basic_salary: Decimal,
    /// Monthly housing allowance.
    #[serde(default)]
    pub housing_allowance: Decimal,
    /// Monthly transportation allowance.
    #[serde(default)]
    pub transportation_allowance: Decimal,
    /// Monthly food allowance.
    #[serde(default)]
    pub food_allowance: Decimal,
    /// Monthly telecom allowance.
    #[serde(default)]
    pub telecom_allowance: Decimal,
    /// Monthly fuel allowance.
    #[serde(default)]
    pub fuel_allowance: Decimal,
    /// Variable pay for the month.
    #[serde(default)]
    pub variable_pay: Decimal,
    /// Shift allowance for the month.
    #[serde(default)]
    pub shift_allowance: Decimal,
}

impl CompensationProfile {
    /// The wage EOSB entitlements are based on: basic salary plus housing.
    ///
    /// Other allowances never count towards it.
    pub fn eosb_base_wage(&self) -> Decimal {
        self.basic_salary + self.housing_allowance
    }

    /// The wage GOSI contributions are assessed on (basic plus housing).
    pub fn gosi_base(&self) -> Decimal {
        self.basic_salary + self.housing_allowance
    }

    /// Sum of every monthly component.
    pub fn monthly_total(&self) -> Decimal {
        self.components().iter().map(|(_, amount)| *amount).sum()
    }

    /// Every component paired with its field name, in declaration order.
    pub fn components(&self) -> [(&'static str, Decimal); 8] {
        [
            ("basic_salary", self.basic_salary),
            ("housing_allowance", self.housing_allowance),
            ("transportation_allowance", self.transportation_allowance),
            ("food_allowance", self.food_allowance),
            ("telecom_allowance", self.telecom_allowance),
            ("fuel_allowance", self.fuel_allowance),
            ("variable_pay", self.variable_pay),
            ("shift_allowance", self.shift_allowance),
        ]
    }

    /// Rejects negative components.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, amount) in self.components() {
            ensure_non_negative(field, amount)?;
        }
        Ok(())
    }
}

/// Returns `InvalidInput` if `amount` is negative.
pub(crate) fn ensure_non_negative(field: &str, amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative (got {})", amount),
        ));
    }
    Ok(())
}
