//! End-of-service benefit (EOSB) settlement calculation.
//!
//! ## Entitlement
//!
//! The tiered amount is half a month's base wage per year for the first
//! five years and a full month's base wage per year after that, with the
//! partial final year paid pro rata at the rate of the band it falls in.
//! Resignations receive a share of it by tenure; every other termination
//! type receives the full amount.
//!
//! The settlement then adds leave encashment, the salary earned in the final
//! partial month and any other amounts due, and offsets loans, advances and
//! other deductions.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::monetary::{daily_rate, percent_of, round2, DAYS_PER_MONTH};
use super::service_period::ServiceSpan;
use crate::config::EosbRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Breakdown, BreakdownBuilder, CompensationProfile, TerminationCase, TerminationType,
};

/// The result of an EOSB calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EosbSettlement {
    /// Reference to the departing employee.
    pub employee_ref: String,
    /// How the employment ended.
    pub termination_type: TerminationType,
    /// Tenure from join date to last working day.
    pub service_span: ServiceSpan,
    /// Basic salary plus housing allowance.
    pub base_wage: Decimal,
    /// Share of the tiered amount paid, in percent.
    pub multiplier_percent: Decimal,
    /// Why that share applies.
    pub rule_label: String,
    /// Half-wage years component.
    pub first_tier_amount: Decimal,
    /// Full-wage years component.
    pub second_tier_amount: Decimal,
    /// Partial-year component.
    pub pro_rata_amount: Decimal,
    /// Sum of the three components above.
    pub tiered_amount: Decimal,
    /// The end-of-service award after the multiplier.
    pub final_eosb: Decimal,
    /// Payment for unused leave days.
    pub leave_encashment: Decimal,
    /// Salary earned in the final partial month.
    pub earned_salary: Decimal,
    /// Everything owed to the employee.
    pub total_gross: Decimal,
    /// Everything recovered from the employee.
    pub total_deductions: Decimal,
    /// Amount to pay out.
    pub net_payable: Decimal,
    /// Ordered calculation steps; the last one is the net payable.
    pub breakdown: Breakdown,
}

/// Determines the entitlement share and its label for a termination.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::eosb_entitlement;
/// use payroll_engine::config::EosbRules;
/// use payroll_engine::models::TerminationType;
/// use rust_decimal::Decimal;
///
/// let rules = EosbRules::default();
/// let (percent, _) = eosb_entitlement(TerminationType::Resignation, 5, &rules);
/// assert_eq!(percent, Decimal::new(6667, 2));
///
/// let (percent, _) = eosb_entitlement(TerminationType::ContractExpiry, 1, &rules);
/// assert_eq!(percent, Decimal::ONE_HUNDRED);
/// ```
pub fn eosb_entitlement(
    termination_type: TerminationType,
    years: i64,
    rules: &EosbRules,
) -> (Decimal, String) {
    match termination_type {
        TerminationType::Resignation => match rules.resignation_tier(years) {
            Some(tier) => (tier.percent, tier.label.clone()),
            None => (
                Decimal::ZERO,
                format!("Resignation after {} years: no entitlement", years),
            ),
        },
        other => (
            rules.full_entitlement_percent,
            format!("{}: full entitlement", other.as_str()),
        ),
    }
}

/// Calculates the end-of-service settlement for a termination case.
///
/// # Errors
///
/// - `MissingDate` if the join date or last working day is absent
/// - `InvalidRange` if the last working day is before the join date
/// - `InvalidInput` if any amount in the case or profile is negative
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_eosb;
/// use payroll_engine::config::EosbRules;
/// use payroll_engine::models::{CompensationProfile, TerminationCase, TerminationType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let case = TerminationCase {
///     employee_ref: "emp_001".to_string(),
///     join_date: NaiveDate::from_ymd_opt(2015, 1, 1),
///     last_working_day: NaiveDate::from_ymd_opt(2023, 1, 1),
///     termination_type: TerminationType::Resignation,
///     unused_leave_days: Decimal::ZERO,
///     pending_loans: Decimal::ZERO,
///     pending_advances: Decimal::ZERO,
///     other_deductions: Decimal::ZERO,
///     other_payments: Decimal::ZERO,
///     overtime_due: Decimal::ZERO,
///     bonus_due: Decimal::ZERO,
/// };
/// let profile = CompensationProfile {
///     basic_salary: Decimal::from(5000),
///     housing_allowance: Decimal::from(2000),
///     ..CompensationProfile::default()
/// };
///
/// let settlement = calculate_eosb(&case, &profile, &EosbRules::default()).unwrap();
/// assert_eq!(settlement.service_span.years, 8);
/// assert_eq!(settlement.multiplier_percent, Decimal::new(6667, 2));
/// assert_eq!(settlement.first_tier_amount + settlement.second_tier_amount, Decimal::from(38500));
/// assert!(settlement.breakdown.final_step().unwrap().is_final);
/// ```
pub fn calculate_eosb(
    case: &TerminationCase,
    profile: &CompensationProfile,
    rules: &EosbRules,
) -> EngineResult<EosbSettlement> {
    let join_date = case.join_date.ok_or_else(|| missing_date(case, "join_date"))?;
    let last_working_day = case
        .last_working_day
        .ok_or_else(|| missing_date(case, "last_working_day"))?;
    case.validate_amounts()?;
    profile.validate()?;

    let span = ServiceSpan::between(join_date, last_working_day).inspect_err(|e| {
        warn!(employee_ref = %case.employee_ref, error = %e, "Rejected EOSB service period");
    })?;

    let mut breakdown = BreakdownBuilder::new();
    breakdown.step(
        "service_period",
        "Service period",
        format!("{} to {}: {}", join_date, last_working_day, span.describe()),
        Decimal::from(span.total_days),
    );

    let base_wage = round2(profile.eosb_base_wage());
    breakdown.step(
        "base_wage",
        "Base wage",
        format!(
            "Basic salary {} + housing allowance {}",
            profile.basic_salary, profile.housing_allowance
        ),
        base_wage,
    );

    let (multiplier_percent, rule_label) =
        eosb_entitlement(case.termination_type, span.years, rules);
    breakdown.step(
        "eosb_multiplier",
        "Entitlement share (%)",
        format!("{} ({} completed years)", rule_label, span.years),
        multiplier_percent,
    );

    let half_wage = base_wage / Decimal::TWO;
    let half_wage_years = span.years.min(rules.half_wage_years);
    let first_tier_amount = round2(half_wage * Decimal::from(half_wage_years));
    breakdown.step(
        "eosb_first_tier",
        "Half-wage years",
        format!("{} / 2 x {} years", base_wage, half_wage_years),
        first_tier_amount,
    );

    let full_wage_years = (span.years - rules.half_wage_years).max(0);
    let second_tier_amount = round2(base_wage * Decimal::from(full_wage_years));
    breakdown.step(
        "eosb_second_tier",
        "Full-wage years",
        format!("{} x {} years", base_wage, full_wage_years),
        second_tier_amount,
    );

    let pro_rata_monthly = if span.years >= rules.half_wage_years {
        base_wage
    } else {
        half_wage
    };
    let remainder_days = span.remainder_days();
    let pro_rata_amount = round2(daily_rate(pro_rata_monthly) * Decimal::from(remainder_days));
    breakdown.step(
        "eosb_pro_rata",
        "Partial year",
        format!(
            "{} / 30 x {} days ({} months, {} days)",
            round2(pro_rata_monthly),
            remainder_days,
            span.months,
            span.days
        ),
        pro_rata_amount,
    );

    let tiered_amount = first_tier_amount + second_tier_amount + pro_rata_amount;
    breakdown.step(
        "eosb_tiered_amount",
        "Tiered amount",
        format!(
            "{} + {} + {}",
            first_tier_amount, second_tier_amount, pro_rata_amount
        ),
        tiered_amount,
    );

    let final_eosb = round2(percent_of(tiered_amount, multiplier_percent));
    breakdown.step(
        "final_eosb",
        "End-of-service award",
        format!("{} x {}%", tiered_amount, multiplier_percent),
        final_eosb,
    );

    let leave_encashment = round2(daily_rate(base_wage) * case.unused_leave_days);
    breakdown.step(
        "leave_encashment",
        "Leave encashment",
        format!("{} / 30 x {} days", base_wage, case.unused_leave_days),
        leave_encashment,
    );

    let days_worked = Decimal::from(last_working_day.day());
    let earned_salary = round2(base_wage * days_worked / DAYS_PER_MONTH);
    breakdown.step(
        "earned_salary",
        "Final month salary",
        format!("{} x {} / 30 days", base_wage, days_worked),
        earned_salary,
    );

    let total_gross = round2(
        final_eosb
            + leave_encashment
            + earned_salary
            + case.overtime_due
            + case.bonus_due
            + case.other_payments,
    );
    breakdown.step(
        "total_gross",
        "Total gross",
        format!(
            "Award {} + leave {} + salary {} + overtime {} + bonus {} + other {}",
            final_eosb,
            leave_encashment,
            earned_salary,
            case.overtime_due,
            case.bonus_due,
            case.other_payments
        ),
        total_gross,
    );

    let total_deductions =
        round2(case.pending_loans + case.pending_advances + case.other_deductions);
    breakdown.step(
        "total_deductions",
        "Total deductions",
        format!(
            "Loans {} + advances {} + other {}",
            case.pending_loans, case.pending_advances, case.other_deductions
        ),
        total_deductions,
    );

    let net_payable = total_gross - total_deductions;
    breakdown.final_step(
        "net_payable",
        "Net payable",
        format!("{} - {}", total_gross, total_deductions),
        net_payable,
    );

    debug!(
        employee_ref = %case.employee_ref,
        termination_type = case.termination_type.as_str(),
        years = span.years,
        final_eosb = %final_eosb,
        net_payable = %net_payable,
        "Calculated EOSB settlement"
    );

    Ok(EosbSettlement {
        employee_ref: case.employee_ref.clone(),
        termination_type: case.termination_type,
        service_span: span,
        base_wage,
        multiplier_percent,
        rule_label,
        first_tier_amount,
        second_tier_amount,
        pro_rata_amount,
        tiered_amount,
        final_eosb,
        leave_encashment,
        earned_salary,
        total_gross,
        total_deductions,
        net_payable,
        breakdown: breakdown.build(),
    })
}

fn missing_date(case: &TerminationCase, field: &str) -> EngineError {
    warn!(employee_ref = %case.employee_ref, field, "EOSB case is missing a date");
    EngineError::MissingDate {
        field: field.to_string(),
    }
}
