//! Termination case model for end-of-service settlements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::compensation::ensure_non_negative;
use crate::error::EngineResult;

/// How the employment relationship ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationType {
    /// The employee resigned.
    Resignation,
    /// The employer ended the contract.
    TerminationByEmployer,
    /// A fixed-term contract ran out.
    ContractExpiry,
    /// Both parties agreed to end the contract.
    MutualAgreement,
    /// The employee died in service.
    Death,
    /// The employee can no longer work due to disability.
    Disability,
}

impl TerminationType {
    /// Stable snake_case name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationType::Resignation => "resignation",
            TerminationType::TerminationByEmployer => "termination_by_employer",
            TerminationType::ContractExpiry => "contract_expiry",
            TerminationType::MutualAgreement => "mutual_agreement",
            TerminationType::Death => "death",
            TerminationType::Disability => "disability",
        }
    }
}

/// A settlement request for one departing employee.
///
/// Built from a snapshot when the settlement is requested and consumed by
/// reference; a changed case is a new computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationCase {
    /// Reference to the employee record.
    pub employee_ref: String,
    /// First day of service.
    pub join_date: Option<NaiveDate>,
    /// Last day worked.
    pub last_working_day: Option<NaiveDate>,
    /// How the employment ended.
    pub termination_type: TerminationType,
    /// Accrued leave days still owed.
    #[serde(default)]
    pub unused_leave_days: Decimal,
    /// Outstanding loan balance to recover.
    #[serde(default)]
    pub pending_loans: Decimal,
    /// Outstanding salary advances to recover.
    #[serde(default)]
    pub pending_advances: Decimal,
    /// Any other amount to withhold.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Any other amount owed to the employee.
    #[serde(default)]
    pub other_payments: Decimal,
    /// Unpaid overtime.
    #[serde(default)]
    pub overtime_due: Decimal,
    /// Unpaid bonus.
    #[serde(default)]
    pub bonus_due: Decimal,
}

impl TerminationCase {
    /// Rejects negative day counts and amounts.
    pub fn validate_amounts(&self) -> EngineResult<()> {
        ensure_non_negative("unused_leave_days", self.unused_leave_days)?;
        ensure_non_negative("pending_loans", self.pending_loans)?;
        ensure_non_negative("pending_advances", self.pending_advances)?;
        ensure_non_negative("other_deductions", self.other_deductions)?;
        ensure_non_negative("other_payments", self.other_payments)?;
        ensure_non_negative("overtime_due", self.overtime_due)?;
        ensure_non_negative("bonus_due", self.bonus_due)
    }
}
