//! Loan product, application and eligibility context models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Interest-accrual convention of a loan product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Annuity on the outstanding balance.
    ReducingBalance,
    /// Interest on the original principal for the whole term.
    FlatRate,
    /// No interest; principal split evenly.
    InterestFree,
}

impl CalculationMethod {
    /// Stable snake_case name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMethod::ReducingBalance => "reducing_balance",
            CalculationMethod::FlatRate => "flat_rate",
            CalculationMethod::InterestFree => "interest_free",
        }
    }
}

/// An employee loan product.
///
/// Products are immutable configuration, loaded once and looked up by code
/// (see [`crate::config::ConfigLoader::get_loan_product`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProduct {
    /// Unique product code (e.g. "personal").
    pub code: String,
    /// Display name.
    pub name: String,
    /// How interest accrues.
    pub calculation_method: CalculationMethod,
    /// Annual interest rate in percent.
    #[serde(default)]
    pub annual_rate: Decimal,
    /// One-off administration fee.
    #[serde(default)]
    pub admin_fee: Decimal,
    /// Smallest principal allowed.
    pub min_amount: Decimal,
    /// Largest principal allowed.
    pub max_amount: Decimal,
    /// Shortest term allowed, in months.
    pub min_term_months: u32,
    /// Longest term allowed, in months.
    pub max_term_months: u32,
    /// How many loans of any product an employee may hold at once.
    pub max_concurrent_per_employee: u32,
    /// Whether employees on probation are excluded.
    #[serde(default)]
    pub exclude_probation: bool,
    /// Maximum debt-to-income ratio in percent.
    pub dti_cap_percent: Decimal,
}

/// A request to borrow under a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Reference to the borrowing employee.
    pub employee_ref: String,
    /// Code of the requested product.
    pub product_code: String,
    /// Amount requested.
    pub principal_amount: Decimal,
    /// Requested term in months.
    pub term_months: u32,
}

/// Aggregates about the applicant supplied by the caller.
///
/// The engine never fetches these; the record layer sums the employee's
/// active loans and advances before calling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityContext {
    /// Monthly net salary.
    pub net_salary: Decimal,
    /// Installments and advances already deducted each month.
    #[serde(default)]
    pub existing_monthly_deductions: Decimal,
    /// Number of loans the employee currently holds.
    #[serde(default)]
    pub active_loan_count: u32,
    /// Whether the employee is still on probation.
    #[serde(default)]
    pub on_probation: bool,
}
