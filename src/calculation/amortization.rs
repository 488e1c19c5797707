//! Loan installment (EMI) calculation and amortization schedules.
//!
//! ## Methods
//!
//! - **Reducing balance:** annuity `P·r·(1+r)ⁿ / ((1+r)ⁿ − 1)` with the
//!   monthly rate `r = annual_rate / 100 / 12`. A zero rate falls back to the
//!   interest-free formula.
//! - **Flat rate:** interest on the original principal for the whole term,
//!   `P × annual_rate / 100 × n / 12`, spread evenly.
//! - **Interest free:** `P / n`.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::monetary::{round2, ONE_HUNDRED};
use crate::error::{EngineError, EngineResult};
use crate::models::{Breakdown, BreakdownBuilder, CalculationMethod, LoanApplication, LoanProduct};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// The priced terms of a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    /// The product's calculation method.
    pub method: CalculationMethod,
    /// Amount borrowed.
    pub principal: Decimal,
    /// Annual interest rate in percent.
    pub annual_rate: Decimal,
    /// Monthly interest rate as a fraction.
    pub monthly_rate: Decimal,
    /// Term in months.
    pub term_months: u32,
    /// Equated monthly installment.
    pub emi: Decimal,
    /// Interest over the whole term.
    pub total_interest: Decimal,
    /// One-off administration fee.
    pub admin_fee: Decimal,
    /// Principal + interest + fee.
    pub total_payable: Decimal,
    /// Ordered calculation steps; the last one is the total payable.
    pub breakdown: Breakdown,
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based installment number.
    pub installment_number: u32,
    /// Principal outstanding before this payment.
    pub opening_balance: Decimal,
    /// Part of the payment that repays principal.
    pub principal_component: Decimal,
    /// Part of the payment that pays interest.
    pub interest_component: Decimal,
    /// Amount due for this installment.
    pub payment: Decimal,
    /// Principal outstanding after this payment.
    pub closing_balance: Decimal,
}

/// Prices a loan.
///
/// # Errors
///
/// - `DivisionByZero` if `term_months` is zero
/// - `InvalidInput` if the principal is not positive or the rate or fee is
///   negative
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_loan_quote;
/// use payroll_engine::models::CalculationMethod;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let quote = calculate_loan_quote(
///     Decimal::from(20000),
///     Decimal::from(12),
///     12,
///     Decimal::ZERO,
///     CalculationMethod::ReducingBalance,
/// )
/// .unwrap();
///
/// assert_eq!(quote.emi, Decimal::from_str("1776.98").unwrap());
/// assert_eq!(quote.total_interest, Decimal::from_str("1323.76").unwrap());
/// ```
pub fn calculate_loan_quote(
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
    admin_fee: Decimal,
    method: CalculationMethod,
) -> EngineResult<LoanQuote> {
    if term_months == 0 {
        warn!("Loan quote requested with a zero-month term");
        return Err(EngineError::DivisionByZero {
            operation: "installment calculation (term_months = 0)".to_string(),
        });
    }
    if principal <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "principal_amount",
            format!("must be greater than zero (got {})", principal),
        ));
    }
    if annual_rate < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "annual_rate",
            format!("must not be negative (got {})", annual_rate),
        ));
    }
    if admin_fee < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "admin_fee",
            format!("must not be negative (got {})", admin_fee),
        ));
    }

    let principal = round2(principal);
    let admin_fee = round2(admin_fee);
    let n = Decimal::from(term_months);
    let monthly_rate = annual_rate / ONE_HUNDRED / MONTHS_PER_YEAR;

    let mut breakdown = BreakdownBuilder::new();
    breakdown.step(
        "loan_principal",
        "Principal",
        format!("{} over {} months", principal, term_months),
        principal,
    );
    breakdown.step(
        "monthly_rate",
        "Monthly rate (%)",
        format!("{}% / 12", annual_rate),
        (monthly_rate * ONE_HUNDRED).round_dp(4),
    );

    let (emi, total_interest, emi_detail) = match method {
        CalculationMethod::ReducingBalance if !monthly_rate.is_zero() => {
            let growth = (Decimal::ONE + monthly_rate)
                .checked_powu(u64::from(term_months))
                .ok_or_else(|| {
                    EngineError::invalid_input(
                        "term_months",
                        format!("{} months overflows the annuity factor", term_months),
                    )
                })?;
            let denominator = growth - Decimal::ONE;
            if denominator.is_zero() {
                return Err(EngineError::DivisionByZero {
                    operation: "annuity factor".to_string(),
                });
            }
            let emi = round2(principal * monthly_rate * growth / denominator);
            let total_interest = round2(emi * n - principal);
            (
                emi,
                total_interest,
                format!(
                    "Reducing balance: P·r·(1+r)^n / ((1+r)^n - 1) with r = {}, n = {}",
                    monthly_rate.round_dp(6),
                    term_months
                ),
            )
        }
        CalculationMethod::FlatRate => {
            let total_interest = round2(principal * annual_rate / ONE_HUNDRED * n / MONTHS_PER_YEAR);
            let emi = round2((principal + total_interest) / n);
            (
                emi,
                total_interest,
                format!(
                    "Flat rate: ({} + {} interest) / {} months",
                    principal, total_interest, term_months
                ),
            )
        }
        CalculationMethod::ReducingBalance | CalculationMethod::InterestFree => (
            round2(principal / n),
            round2(Decimal::ZERO),
            format!("No interest: {} / {} months", principal, term_months),
        ),
    };

    breakdown.step("emi", "Monthly installment", emi_detail, emi);
    breakdown.step(
        "total_interest",
        "Total interest",
        format!("{} over {} months", method.as_str(), term_months),
        total_interest,
    );
    breakdown.step("admin_fee", "Administration fee", "One-off fee", admin_fee);

    let total_payable = principal + total_interest + admin_fee;
    breakdown.final_step(
        "total_payable",
        "Total payable",
        format!("{} + {} + {}", principal, total_interest, admin_fee),
        total_payable,
    );

    debug!(
        method = method.as_str(),
        principal = %principal,
        term_months,
        emi = %emi,
        total_payable = %total_payable,
        "Calculated loan quote"
    );

    Ok(LoanQuote {
        method,
        principal,
        annual_rate,
        monthly_rate,
        term_months,
        emi,
        total_interest,
        admin_fee,
        total_payable,
        breakdown: breakdown.build(),
    })
}

/// Prices an application under a product.
///
/// Fails with `InvalidInput` if the application names another product.
pub fn quote_for_product(
    application: &LoanApplication,
    product: &LoanProduct,
) -> EngineResult<LoanQuote> {
    if application.product_code != product.code {
        return Err(EngineError::invalid_input(
            "product_code",
            format!(
                "application is for '{}' but product is '{}'",
                application.product_code, product.code
            ),
        ));
    }

    calculate_loan_quote(
        application.principal_amount,
        product.annual_rate,
        application.term_months,
        product.admin_fee,
        product.calculation_method,
    )
}

/// Builds the month-by-month repayment schedule for a quote.
///
/// The final installment absorbs rounding: it repays the remaining balance
/// and the remaining interest, so the schedule closes at exactly zero and its
/// interest sums to `quote.total_interest`.
pub fn amortization_schedule(quote: &LoanQuote) -> Vec<Installment> {
    let n = quote.term_months;
    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = quote.principal;
    let mut interest_left = quote.total_interest;

    for installment_number in 1..=n {
        let is_last = installment_number == n;

        let interest_component = if is_last {
            interest_left.max(Decimal::ZERO)
        } else {
            let interest = match quote.method {
                CalculationMethod::ReducingBalance => round2(balance * quote.monthly_rate),
                CalculationMethod::FlatRate => round2(quote.total_interest / Decimal::from(n)),
                CalculationMethod::InterestFree => round2(Decimal::ZERO),
            };
            interest.min(interest_left.max(Decimal::ZERO))
        };

        let principal_component = if is_last {
            balance
        } else {
            (quote.emi - interest_component)
                .max(Decimal::ZERO)
                .min(balance)
        };

        let closing_balance = balance - principal_component;
        schedule.push(Installment {
            installment_number,
            opening_balance: balance,
            principal_component,
            interest_component,
            payment: principal_component + interest_component,
            closing_balance,
        });

        balance = closing_balance;
        interest_left -= interest_component;
    }

    schedule
}
