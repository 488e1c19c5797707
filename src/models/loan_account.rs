//! Loan account lifecycle.
//!
//! Status changes go through an explicit transition table. Disbursement moves
//! an approved loan to `Disbursed` and then `Active` in the same call; there
//! is no delayed activation.
//!
//! ```text
//! Draft ──submit──▶ Submitted ──approve──▶ Approved ──disburse──▶ Disbursed ──activate──▶ Active ──close──▶ Closed
//!   │                  │  └──reject──▶ Rejected           │
//!   └──cancel──────────┴───────────────────────cancel─────┴──▶ Cancelled
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::LoanApplication;
use crate::calculation::{round2, EligibilityResult, LoanQuote};
use crate::error::{EngineError, EngineResult};

/// Status of a loan account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Being prepared by the employee.
    Draft,
    /// Waiting for a decision.
    Submitted,
    /// Approved, not yet paid out.
    Approved,
    /// Declined.
    Rejected,
    /// Paid out.
    Disbursed,
    /// Being repaid.
    Active,
    /// Fully repaid.
    Closed,
    /// Withdrawn before disbursement.
    Cancelled,
}

/// Something that happens to a loan account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanEvent {
    /// Employee submits the application.
    Submit,
    /// Approver accepts it.
    Approve,
    /// Approver declines it.
    Reject,
    /// Funds are paid out.
    Disburse,
    /// Repayment starts.
    Activate,
    /// Balance reaches zero.
    Close,
    /// Application is withdrawn.
    Cancel,
}

impl LoanStatus {
    /// Returns the status `event` leads to, or `None` if it is not allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{LoanEvent, LoanStatus};
    ///
    /// assert_eq!(LoanStatus::Approved.transition(LoanEvent::Disburse), Some(LoanStatus::Disbursed));
    /// assert_eq!(LoanStatus::Draft.transition(LoanEvent::Disburse), None);
    /// ```
    pub fn transition(self, event: LoanEvent) -> Option<LoanStatus> {
        use LoanEvent as E;
        use LoanStatus as S;

        match (self, event) {
            (S::Draft, E::Submit) => Some(S::Submitted),
            (S::Submitted, E::Approve) => Some(S::Approved),
            (S::Submitted, E::Reject) => Some(S::Rejected),
            (S::Approved, E::Disburse) => Some(S::Disbursed),
            (S::Disbursed, E::Activate) => Some(S::Active),
            (S::Active, E::Close) => Some(S::Closed),
            (S::Draft | S::Submitted | S::Approved, E::Cancel) => Some(S::Cancelled),
            _ => None,
        }
    }

    /// True for statuses no event can leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoanStatus::Rejected | LoanStatus::Closed | LoanStatus::Cancelled)
    }

    /// Stable snake_case name, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Draft => "draft",
            LoanStatus::Submitted => "submitted",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Disbursed => "disbursed",
            LoanStatus::Active => "active",
            LoanStatus::Closed => "closed",
            LoanStatus::Cancelled => "cancelled",
        }
    }
}

impl LoanEvent {
    /// Stable snake_case name, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            LoanEvent::Submit => "submit",
            LoanEvent::Approve => "approve",
            LoanEvent::Reject => "reject",
            LoanEvent::Disburse => "disburse",
            LoanEvent::Activate => "activate",
            LoanEvent::Close => "close",
            LoanEvent::Cancel => "cancel",
        }
    }
}

/// A recorded status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status before the event.
    pub from: LoanStatus,
    /// Status after the event.
    pub to: LoanStatus,
    /// The event applied.
    pub event: LoanEvent,
    /// Business date of the change.
    pub on: NaiveDate,
    /// Optional note (e.g. a rejection reason).
    pub note: Option<String>,
}

/// A loan held by an employee, from draft to closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAccount {
    /// Identifier assigned by the record store.
    pub account_ref: Uuid,
    /// The application the account was opened from.
    pub application: LoanApplication,
    /// Current status.
    pub status: LoanStatus,
    /// Amount still to be repaid (principal plus interest).
    pub outstanding_balance: Decimal,
    /// Every status change, oldest first.
    pub history: Vec<StatusChange>,
    /// The quote the approval was based on.
    #[serde(default)]
    pub approved_quote: Option<LoanQuote>,
}

impl LoanAccount {
    /// Opens a draft account for an application.
    pub fn draft(account_ref: Uuid, application: LoanApplication) -> Self {
        Self {
            account_ref,
            application,
            status: LoanStatus::Draft,
            outstanding_balance: Decimal::ZERO,
            history: Vec::new(),
            approved_quote: None,
        }
    }

    /// Submits the application for approval.
    pub fn submit(&mut self, on: NaiveDate) -> EngineResult<LoanStatus> {
        self.apply(LoanEvent::Submit, on, None)
    }

    /// Approves the application.
    ///
    /// The eligibility result must be for this employee and product and must
    /// be eligible; otherwise the approval is refused as an invalid
    /// transition.
    pub fn approve(
        &mut self,
        eligibility: &EligibilityResult,
        on: NaiveDate,
    ) -> EngineResult<LoanStatus> {
        let matches_application = eligibility.employee_ref == self.application.employee_ref
            && eligibility.product_code == self.application.product_code;
        if !matches_application || !eligibility.eligible {
            warn!(
                account_ref = %self.account_ref,
                eligible = eligibility.eligible,
                matches_application,
                "Refused loan approval"
            );
            return Err(self.refuse(LoanEvent::Approve));
        }
        let status = self.apply(LoanEvent::Approve, on, None)?;
        self.approved_quote = Some(eligibility.quote.clone());
        Ok(status)
    }

    /// Rejects the application.
    pub fn reject(&mut self, reason: &str, on: NaiveDate) -> EngineResult<LoanStatus> {
        self.apply(LoanEvent::Reject, on, Some(reason.to_string()))
    }

    /// Withdraws the application before disbursement.
    pub fn cancel(&mut self, on: NaiveDate) -> EngineResult<LoanStatus> {
        self.apply(LoanEvent::Cancel, on, None)
    }

    /// Pays out an approved loan and starts repayment.
    ///
    /// The quote must price this account's principal (to the cent) and term
    /// with the method and rate of the quote the approval was based on. On
    /// success the account passes through `Disbursed` to `Active` and the
    /// outstanding balance becomes principal plus interest; the admin fee is
    /// settled at payout.
    pub fn disburse(&mut self, quote: &LoanQuote, on: NaiveDate) -> EngineResult<LoanStatus> {
        let approved = match (self.status, self.approved_quote.as_ref()) {
            (LoanStatus::Approved, Some(approved)) => approved,
            _ => return Err(self.refuse(LoanEvent::Disburse)),
        };

        if round2(quote.principal) != round2(self.application.principal_amount)
            || quote.term_months != self.application.term_months
        {
            return Err(EngineError::invalid_input(
                "quote",
                format!(
                    "quote for {} over {} months does not match application for {} over {} months",
                    quote.principal,
                    quote.term_months,
                    self.application.principal_amount,
                    self.application.term_months
                ),
            ));
        }
        if quote.method != approved.method || quote.annual_rate != approved.annual_rate {
            return Err(EngineError::invalid_input(
                "quote",
                format!(
                    "quote priced {:?} at {}% but the loan was approved {:?} at {}%",
                    quote.method, quote.annual_rate, approved.method, approved.annual_rate
                ),
            ));
        }

        self.apply(LoanEvent::Disburse, on, None)?;
        self.outstanding_balance = quote.principal + quote.total_interest;
        self.apply(LoanEvent::Activate, on, None)
    }

    /// Records a repayment against an active loan.
    ///
    /// Closes the account when the balance reaches zero. Payments must be
    /// positive and may not exceed the outstanding balance.
    pub fn record_repayment(&mut self, amount: Decimal, on: NaiveDate) -> EngineResult<LoanStatus> {
        if self.status != LoanStatus::Active {
            return Err(self.refuse(LoanEvent::Close));
        }
        if amount <= Decimal::ZERO || amount > self.outstanding_balance {
            return Err(EngineError::invalid_input(
                "repayment_amount",
                format!(
                    "{} must be positive and at most the outstanding {}",
                    amount, self.outstanding_balance
                ),
            ));
        }

        self.outstanding_balance -= amount;
        if self.outstanding_balance.is_zero() {
            return self.apply(LoanEvent::Close, on, None);
        }
        Ok(self.status)
    }

    fn apply(
        &mut self,
        event: LoanEvent,
        on: NaiveDate,
        note: Option<String>,
    ) -> EngineResult<LoanStatus> {
        let from = self.status;
        let to = from.transition(event).ok_or_else(|| self.refuse(event))?;

        info!(
            account_ref = %self.account_ref,
            from = from.as_str(),
            to = to.as_str(),
            event = event.as_str(),
            "Loan status changed"
        );

        self.status = to;
        self.history.push(StatusChange {
            from,
            to,
            event,
            on,
            note,
        });
        Ok(to)
    }

    fn refuse(&self, event: LoanEvent) -> EngineError {
        EngineError::InvalidTransition {
            from: self.status.as_str().to_string(),
            event: event.as_str().to_string(),
        }
    }
}
