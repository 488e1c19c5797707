//! Domain models for the payroll engine.
//!
//! Inputs handed to the calculation engines, the loan account lifecycle and
//! the audit breakdown attached to every result.

mod breakdown;
mod compensation;
mod loan;
mod loan_account;
mod pay_period;
mod termination;

pub use breakdown::{Breakdown, BreakdownBuilder, BreakdownStep};
pub use compensation::CompensationProfile;
pub use loan::{CalculationMethod, EligibilityContext, LoanApplication, LoanProduct};
pub use loan_account::{LoanAccount, LoanEvent, LoanStatus, StatusChange};
pub use pay_period::{NationalityClass, PayPeriod, PayrollFacts};
pub use termination::{TerminationCase, TerminationType};
