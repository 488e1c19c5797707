//! Loan eligibility evaluation.
//!
//! An application is checked against its product's limits and the
//! employee's debt-to-income (DTI) ratio. A failed check is a normal answer:
//! the result says which checks failed and why. Only malformed input (a
//! non-positive salary, a zero term) is an error.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::amortization::{quote_for_product, LoanQuote};
use super::monetary::{percent_of, round2, ONE_HUNDRED};
use crate::error::{EngineError, EngineResult};
use crate::models::{Breakdown, BreakdownBuilder, EligibilityContext, LoanApplication, LoanProduct};

/// The checks an application goes through, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityCheck {
    /// Principal within the product's amount limits.
    Amount,
    /// Term within the product's term limits.
    Term,
    /// Employee below the product's concurrent-loan limit.
    ConcurrentLoans,
    /// Probation status allowed by the product.
    Probation,
    /// Debt-to-income ratio within the product's cap.
    Dti,
}

impl EligibilityCheck {
    /// Stable snake_case name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityCheck::Amount => "amount",
            EligibilityCheck::Term => "term",
            EligibilityCheck::ConcurrentLoans => "concurrent_loans",
            EligibilityCheck::Probation => "probation",
            EligibilityCheck::Dti => "dti",
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the check passed.
    pub passed: bool,
    /// Explanation shown to the applicant.
    pub message: String,
}

/// The result of an eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// Reference to the applicant.
    pub employee_ref: String,
    /// Code of the product applied for.
    pub product_code: String,
    /// True when every check passed.
    pub eligible: bool,
    /// Outcome of each check.
    pub checks: BTreeMap<EligibilityCheck, CheckOutcome>,
    /// Existing deductions plus the proposed installment.
    pub total_monthly_deductions: Decimal,
    /// Total monthly deductions as a percentage of net salary.
    pub dti_percent: Decimal,
    /// Largest installment that would still fit under the DTI cap.
    pub max_affordable_emi: Decimal,
    /// Pricing of the requested loan.
    pub quote: LoanQuote,
    /// Ordered evaluation steps; the last one is the DTI ratio.
    pub breakdown: Breakdown,
}

impl EligibilityResult {
    /// The checks that failed, in evaluation order.
    pub fn failed_checks(&self) -> Vec<EligibilityCheck> {
        self.checks
            .iter()
            .filter(|(_, outcome)| !outcome.passed)
            .map(|(check, _)| *check)
            .collect()
    }

    /// Whether a specific check passed.
    pub fn passed(&self, check: EligibilityCheck) -> bool {
        self.checks.get(&check).is_some_and(|o| o.passed)
    }
}

/// Evaluates a loan application.
///
/// # Errors
///
/// `InvalidInput` if the net salary is below 0.01, existing deductions are
/// negative, the principal is not positive, the term is zero, or the
/// application names a different product.
///
/// A term above the product maximum is a failed `Term` check, not an error;
/// the quote is then priced at the maximum term.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::evaluate_eligibility;
/// use payroll_engine::models::{
///     CalculationMethod, EligibilityContext, LoanApplication, LoanProduct,
/// };
/// use rust_decimal::Decimal;
///
/// let product = LoanProduct {
///     code: "advance".to_string(),
///     name: "Salary Advance".to_string(),
///     calculation_method: CalculationMethod::InterestFree,
///     annual_rate: Decimal::ZERO,
///     admin_fee: Decimal::ZERO,
///     min_amount: Decimal::from(1000),
///     max_amount: Decimal::from(30000),
///     min_term_months: 1,
///     max_term_months: 12,
///     max_concurrent_per_employee: 1,
///     exclude_probation: false,
///     dti_cap_percent: Decimal::from(33),
/// };
/// let application = LoanApplication {
///     employee_ref: "emp_001".to_string(),
///     product_code: "advance".to_string(),
///     principal_amount: Decimal::from(26400),
///     term_months: 12,
/// };
/// let context = EligibilityContext {
///     net_salary: Decimal::from(10000),
///     existing_monthly_deductions: Decimal::from(1000),
///     active_loan_count: 0,
///     on_probation: false,
/// };
///
/// let result = evaluate_eligibility(&application, &product, &context).unwrap();
/// assert_eq!(result.dti_percent, Decimal::from(32));
/// assert!(result.eligible);
/// ```
pub fn evaluate_eligibility(
    application: &LoanApplication,
    product: &LoanProduct,
    context: &EligibilityContext,
) -> EngineResult<EligibilityResult> {
    validate_input(application, context)?;

    let mut checks = BTreeMap::new();
    let mut breakdown = BreakdownBuilder::new();
    let principal = application.principal_amount;

    let amount_ok = principal >= product.min_amount && principal <= product.max_amount;
    checks.insert(
        EligibilityCheck::Amount,
        outcome(
            amount_ok,
            if amount_ok {
                format!(
                    "{} is within {} to {}",
                    principal, product.min_amount, product.max_amount
                )
            } else {
                format!(
                    "{} is outside the allowed range {} to {}",
                    principal, product.min_amount, product.max_amount
                )
            },
        ),
    );

    let term = application.term_months;
    let term_ok = term >= product.min_term_months && term <= product.max_term_months;
    checks.insert(
        EligibilityCheck::Term,
        outcome(
            term_ok,
            if term_ok {
                format!(
                    "{} months is within {} to {} months",
                    term, product.min_term_months, product.max_term_months
                )
            } else {
                format!(
                    "{} months is outside the allowed range {} to {} months",
                    term, product.min_term_months, product.max_term_months
                )
            },
        ),
    );

    let concurrent_ok = context.active_loan_count < product.max_concurrent_per_employee;
    checks.insert(
        EligibilityCheck::ConcurrentLoans,
        outcome(
            concurrent_ok,
            format!(
                "{} active loans, limit {}",
                context.active_loan_count, product.max_concurrent_per_employee
            ),
        ),
    );

    let probation_ok = !(context.on_probation && product.exclude_probation);
    checks.insert(
        EligibilityCheck::Probation,
        outcome(
            probation_ok,
            if probation_ok {
                "Probation status does not restrict this product".to_string()
            } else {
                "Employees on probation are not eligible for this product".to_string()
            },
        ),
    );

    // An over-long term has already failed; price at the product maximum so
    // the affordability figures stay meaningful and the annuity cannot overflow.
    let quote = if term > product.max_term_months {
        let capped = LoanApplication {
            term_months: product.max_term_months.max(1),
            ..application.clone()
        };
        quote_for_product(&capped, product)?
    } else {
        quote_for_product(application, product)?
    };
    breakdown.step(
        "proposed_emi",
        "Proposed installment",
        if quote.term_months == term {
            format!(
                "{} over {} months ({})",
                quote.principal,
                quote.term_months,
                quote.method.as_str()
            )
        } else {
            format!(
                "{} over {} months ({}), priced at the {}-month product maximum",
                quote.principal,
                term,
                quote.method.as_str(),
                quote.term_months
            )
        },
        quote.emi,
    );

    let existing = round2(context.existing_monthly_deductions);
    breakdown.step(
        "existing_deductions",
        "Existing monthly deductions",
        "Active loans and advances",
        existing,
    );

    let total_monthly_deductions = existing + quote.emi;
    breakdown.step(
        "total_monthly_deductions",
        "Total monthly deductions",
        format!("{} + {}", existing, quote.emi),
        total_monthly_deductions,
    );

    let net_salary = round2(context.net_salary);
    breakdown.step("net_salary", "Net salary", "Monthly net salary", net_salary);

    let max_affordable_emi =
        round2((percent_of(net_salary, product.dti_cap_percent) - existing).max(Decimal::ZERO));
    breakdown.step(
        "max_affordable_emi",
        "Largest affordable installment",
        format!(
            "{} x {}% - {}",
            net_salary, product.dti_cap_percent, existing
        ),
        max_affordable_emi,
    );

    let dti_ratio = total_monthly_deductions
        .checked_div(net_salary)
        .ok_or_else(|| EngineError::DivisionByZero {
            operation: "debt-to-income ratio".to_string(),
        })?;
    let dti_percent = round2(dti_ratio * ONE_HUNDRED);
    let dti_ok = dti_percent <= product.dti_cap_percent;
    checks.insert(
        EligibilityCheck::Dti,
        outcome(
            dti_ok,
            format!(
                "DTI {}% {} cap {}%",
                dti_percent,
                if dti_ok { "within" } else { "exceeds" },
                product.dti_cap_percent
            ),
        ),
    );
    breakdown.final_step(
        "dti_percent",
        "Debt-to-income (%)",
        format!("{} / {} x 100", total_monthly_deductions, net_salary),
        dti_percent,
    );

    let eligible = checks.values().all(|o| o.passed);

    debug!(
        employee_ref = %application.employee_ref,
        product_code = %product.code,
        eligible,
        dti_percent = %dti_percent,
        "Evaluated loan eligibility"
    );

    Ok(EligibilityResult {
        employee_ref: application.employee_ref.clone(),
        product_code: product.code.clone(),
        eligible,
        checks,
        total_monthly_deductions,
        dti_percent,
        max_affordable_emi,
        quote,
        breakdown: breakdown.build(),
    })
}

fn outcome(passed: bool, message: String) -> CheckOutcome {
    CheckOutcome { passed, message }
}

fn validate_input(application: &LoanApplication, context: &EligibilityContext) -> EngineResult<()> {
    let error = if round2(context.net_salary) <= Decimal::ZERO {
        Some(EngineError::invalid_input(
            "net_salary",
            format!("must be at least 0.01 (got {})", context.net_salary),
        ))
    } else if context.existing_monthly_deductions < Decimal::ZERO {
        Some(EngineError::invalid_input(
            "existing_monthly_deductions",
            "must not be negative",
        ))
    } else if application.principal_amount <= Decimal::ZERO {
        Some(EngineError::invalid_input(
            "principal_amount",
            "must be greater than zero",
        ))
    } else if application.term_months == 0 {
        Some(EngineError::invalid_input(
            "term_months",
            "must be at least one month",
        ))
    } else {
        None
    };

    match error {
        Some(error) => {
            warn!(
                employee_ref = %application.employee_ref,
                error = %error,
                "Rejected loan application input"
            );
            Err(error)
        }
        None => Ok(()),
    }
}
