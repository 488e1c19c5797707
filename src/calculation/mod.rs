//! Calculation logic for the payroll engine.
//!
//! This module contains the derivation engines: service period measurement,
//! end-of-service benefit settlement, loan amortization and eligibility, and
//! periodic payroll accrual. All of them are pure functions over their
//! inputs and a loaded rule set.

mod amortization;
mod eligibility;
mod eosb;
mod monetary;
mod payroll_accrual;
mod service_period;

pub use amortization::{
    Installment, LoanQuote, amortization_schedule, calculate_loan_quote, quote_for_product,
};
pub use eligibility::{CheckOutcome, EligibilityCheck, EligibilityResult, evaluate_eligibility};
pub use eosb::{EosbSettlement, calculate_eosb, eosb_entitlement};
pub use monetary::{DAYS_PER_MONTH, HOURS_PER_DAY, daily_rate, hourly_rate, percent_of, round2};
pub use payroll_accrual::{PayrollPeriodResult, calculate_payroll};
pub use service_period::{DAYS_PER_SERVICE_MONTH, DAYS_PER_SERVICE_YEAR, ServiceSpan};
