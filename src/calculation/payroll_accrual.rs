//! Periodic payroll accrual: gross pay, GOSI, overtime, absence and net pay.
//!
//! The engine works on a precomputed [`PayrollFacts`] aggregate. It has no
//! notion of a run having already happened; keeping one result per
//! (employee, period) is up to the caller's record store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::monetary::{daily_rate, hourly_rate, round2};
use crate::config::PayrollRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{Breakdown, BreakdownBuilder, NationalityClass, PayPeriod, PayrollFacts};

/// The result of a payroll accrual for one employee and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriodResult {
    /// Reference to the employee.
    pub employee_ref: String,
    /// The period paid.
    pub period: PayPeriod,
    /// Nationality class the GOSI rates were chosen for.
    pub nationality_class: NationalityClass,
    /// Sum of the monthly compensation components.
    pub fixed_earnings: Decimal,
    /// Overtime hours × hourly basic rate × multiplier.
    pub overtime_pay: Decimal,
    /// Fixed earnings plus overtime.
    pub gross_pay: Decimal,
    /// GOSI withheld from the employee.
    pub gosi_employee: Decimal,
    /// GOSI paid by the employer (not deducted from pay).
    pub gosi_employer: Decimal,
    /// Daily basic rate × days absent.
    pub absence_deduction: Decimal,
    /// Caller-supplied deductions.
    pub other_deductions: Decimal,
    /// GOSI employee + absence + other deductions.
    pub total_deductions: Decimal,
    /// Gross pay less total deductions.
    pub net_pay: Decimal,
    /// Ordered calculation steps; the last one is the net pay.
    pub breakdown: Breakdown,
}

/// Calculates gross and net pay for one employee and period.
///
/// # Errors
///
/// - `InvalidRange` if the period ends before it starts
/// - `InvalidInput` for negative amounts, hours or days, a zero-day period,
///   or more absent days than days in the period
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::PayrollRules;
/// use payroll_engine::models::{CompensationProfile, NationalityClass, PayPeriod, PayrollFacts};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let facts = PayrollFacts {
///     employee_ref: "emp_001".to_string(),
///     period: PayPeriod {
///         start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///         end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
///     },
///     compensation: CompensationProfile {
///         basic_salary: Decimal::from(6000),
///         housing_allowance: Decimal::from(1500),
///         ..CompensationProfile::default()
///     },
///     nationality_class: NationalityClass::Domestic,
///     days_in_period: 30,
///     days_absent: Decimal::ZERO,
///     overtime_hours: Decimal::ZERO,
///     other_deductions: Decimal::ZERO,
/// };
///
/// let result = calculate_payroll(&facts, &PayrollRules::default()).unwrap();
/// assert_eq!(result.gross_pay, Decimal::from(7500));
/// assert_eq!(result.net_pay, result.gross_pay - result.gosi_employee);
/// ```
pub fn calculate_payroll(
    facts: &PayrollFacts,
    rules: &PayrollRules,
) -> EngineResult<PayrollPeriodResult> {
    validate_facts(facts).inspect_err(|e| {
        warn!(employee_ref = %facts.employee_ref, error = %e, "Rejected payroll facts");
    })?;

    let compensation = &facts.compensation;
    let mut breakdown = BreakdownBuilder::new();

    let fixed_earnings = round2(compensation.monthly_total());
    breakdown.step(
        "fixed_earnings",
        "Fixed earnings",
        compensation
            .components()
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(name, amount)| format!("{} {}", name, amount))
            .collect::<Vec<_>>()
            .join(" + "),
        fixed_earnings,
    );

    let basic_hourly = hourly_rate(compensation.basic_salary);
    let overtime_pay = round2(facts.overtime_hours * basic_hourly * rules.overtime_multiplier);
    breakdown.step(
        "overtime_pay",
        "Overtime",
        format!(
            "{} hours x {} / 30 / 8 ({}) x {}",
            facts.overtime_hours,
            compensation.basic_salary,
            round2(basic_hourly),
            rules.overtime_multiplier
        ),
        overtime_pay,
    );

    let gross_pay = fixed_earnings + overtime_pay;
    breakdown.step(
        "gross_pay",
        "Gross pay",
        format!("{} + {}", fixed_earnings, overtime_pay),
        gross_pay,
    );

    let gosi_base = compensation.gosi_base();
    let gosi_rates = rules.gosi_rates(facts.nationality_class);
    let gosi_employee = round2(gosi_base * gosi_rates.employee);
    breakdown.step(
        "gosi_employee",
        "GOSI (employee)",
        format!(
            "({} + {}) x {}",
            compensation.basic_salary, compensation.housing_allowance, gosi_rates.employee
        ),
        gosi_employee,
    );

    let gosi_employer = round2(gosi_base * gosi_rates.employer);
    breakdown.step(
        "gosi_employer",
        "GOSI (employer, not deducted)",
        format!(
            "({} + {}) x {}",
            compensation.basic_salary, compensation.housing_allowance, gosi_rates.employer
        ),
        gosi_employer,
    );

    let absence_deduction = round2(daily_rate(compensation.basic_salary) * facts.days_absent);
    breakdown.step(
        "absence_deduction",
        "Absence deduction",
        format!(
            "{} / 30 x {} days",
            compensation.basic_salary, facts.days_absent
        ),
        absence_deduction,
    );

    let other_deductions = round2(facts.other_deductions);
    breakdown.step(
        "other_deductions",
        "Other deductions",
        "Supplied with the payroll facts",
        other_deductions,
    );

    let total_deductions = gosi_employee + absence_deduction + other_deductions;
    breakdown.step(
        "total_deductions",
        "Total deductions",
        format!(
            "{} + {} + {}",
            gosi_employee, absence_deduction, other_deductions
        ),
        total_deductions,
    );

    let net_pay = gross_pay - total_deductions;
    breakdown.final_step(
        "net_pay",
        "Net pay",
        format!("{} - {}", gross_pay, total_deductions),
        net_pay,
    );

    debug!(
        employee_ref = %facts.employee_ref,
        period_start = %facts.period.start_date,
        period_end = %facts.period.end_date,
        gross_pay = %gross_pay,
        net_pay = %net_pay,
        "Calculated payroll accrual"
    );

    Ok(PayrollPeriodResult {
        employee_ref: facts.employee_ref.clone(),
        period: facts.period.clone(),
        nationality_class: facts.nationality_class,
        fixed_earnings,
        overtime_pay,
        gross_pay,
        gosi_employee,
        gosi_employer,
        absence_deduction,
        other_deductions,
        total_deductions,
        net_pay,
        breakdown: breakdown.build(),
    })
}

fn validate_facts(facts: &PayrollFacts) -> EngineResult<()> {
    facts.period.validate()?;
    facts.compensation.validate()?;

    if facts.days_in_period == 0 {
        return Err(EngineError::invalid_input(
            "days_in_period",
            "must be at least one day",
        ));
    }
    for (field, value) in [
        ("days_absent", facts.days_absent),
        ("overtime_hours", facts.overtime_hours),
        ("other_deductions", facts.other_deductions),
    ] {
        if value < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                field,
                format!("must not be negative (got {})", value),
            ));
        }
    }
    if facts.days_absent > Decimal::from(facts.days_in_period) {
        return Err(EngineError::invalid_input(
            "days_absent",
            format!(
                "{} days absent exceeds {} days in period",
                facts.days_absent, facts.days_in_period
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompensationProfile;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_facts(nationality_class: NationalityClass) -> PayrollFacts {
        PayrollFacts {
            employee_ref: "emp_001".to_string(),
            period: PayPeriod {
                start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            },
            compensation: CompensationProfile {
                basic_salary: dec("6000"),
                housing_allowance: dec("1500"),
                transportation_allowance: dec("500"),
                food_allowance: dec("300"),
                telecom_allowance: dec("100"),
                fuel_allowance: dec("0"),
                variable_pay: dec("250"),
                shift_allowance: dec("0"),
            },
            nationality_class,
            days_in_period: 30,
            days_absent: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
        }
    }

    fn calculate(facts: &PayrollFacts) -> PayrollPeriodResult {
        calculate_payroll(facts, &PayrollRules::default()).unwrap()
    }

    #[test]
    fn test_domestic_gosi_rates() {
        let result = calculate(&create_facts(NationalityClass::Domestic));

        assert_eq!(result.gross_pay, dec("8650.00"));
        // 7500 x 9.75% and 12%
        assert_eq!(result.gosi_employee, dec("731.25"));
        assert_eq!(result.gosi_employer, dec("900.00"));
        assert_eq!(result.net_pay, dec("7918.75"));
    }

    #[test]
    fn test_foreign_gosi_rates() {
        let result = calculate(&create_facts(NationalityClass::Foreign));

        assert_eq!(result.gosi_employee, dec("150.00"));
        assert_eq!(result.gosi_employer, dec("150.00"));
        assert_eq!(result.net_pay, dec("8500.00"));
    }

    #[test]
    fn test_overtime_pay_at_time_and_a_half() {
        let mut facts = create_facts(NationalityClass::Foreign);
        facts.overtime_hours = dec("10");
        let result = calculate(&facts);

        // 6000 / 30 / 8 = 25 per hour, x 1.5 x 10
        assert_eq!(result.overtime_pay, dec("375.00"));
        assert_eq!(result.gross_pay, dec("9025.00"));
    }

    #[test]
    fn test_absence_deduction_uses_daily_basic() {
        let mut facts = create_facts(NationalityClass::Domestic);
        facts.days_absent = dec("2");
        let result = calculate(&facts);

        assert_eq!(result.absence_deduction, dec("400.00"));
        assert_eq!(result.total_deductions, dec("1131.25"));
        assert_eq!(result.net_pay, dec("7518.75"));
    }

    #[test]
    fn test_other_deductions_reduce_net() {
        let mut facts = create_facts(NationalityClass::Domestic);
        facts.other_deductions = dec("1776.98");
        let result = calculate(&facts);

        assert_eq!(result.total_deductions, dec("2508.23"));
        assert_eq!(result.net_pay, result.gross_pay - result.total_deductions);
    }

    #[test]
    fn test_no_absence_no_overtime_net_is_gross_less_gosi() {
        let result = calculate(&create_facts(NationalityClass::Domestic));
        assert_eq!(result.net_pay, result.gross_pay - result.gosi_employee);
    }

    #[test]
    fn test_breakdown_order_and_final_step() {
        let result = calculate(&create_facts(NationalityClass::Domestic));

        let rule_ids: Vec<&str> = result
            .breakdown
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "fixed_earnings",
                "overtime_pay",
                "gross_pay",
                "gosi_employee",
                "gosi_employer",
                "absence_deduction",
                "other_deductions",
                "total_deductions",
                "net_pay",
            ]
        );
        assert_eq!(result.breakdown.final_step().unwrap().value, result.net_pay);
    }

    #[test]
    fn test_absent_days_cannot_exceed_period() {
        let mut facts = create_facts(NationalityClass::Domestic);
        facts.days_absent = dec("31");

        assert!(matches!(
            calculate_payroll(&facts, &PayrollRules::default()),
            Err(EngineError::InvalidInput { field, .. }) if field == "days_absent"
        ));
    }

    #[test]
    fn test_negative_overtime_is_invalid_input() {
        let mut facts = create_facts(NationalityClass::Domestic);
        facts.overtime_hours = dec("-1");

        assert!(matches!(
            calculate_payroll(&facts, &PayrollRules::default()),
            Err(EngineError::InvalidInput { field, .. }) if field == "overtime_hours"
        ));
    }

    #[test]
    fn test_zero_day_period_is_invalid_input() {
        let mut facts = create_facts(NationalityClass::Domestic);
        facts.days_in_period = 0;

        assert!(matches!(
            calculate_payroll(&facts, &PayrollRules::default()),
            Err(EngineError::InvalidInput { field, .. }) if field == "days_in_period"
        ));
    }

    #[test]
    fn test_inverted_period_is_invalid_range() {
        let mut facts = create_facts(NationalityClass::Domestic);
        std::mem::swap(&mut facts.period.start_date, &mut facts.period.end_date);

        assert!(matches!(
            calculate_payroll(&facts, &PayrollRules::default()),
            Err(EngineError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_recalculation_is_identical() {
        let mut facts = create_facts(NationalityClass::Domestic);
        facts.overtime_hours = dec("3.5");
        facts.days_absent = dec("1.5");

        assert_eq!(calculate(&facts), calculate(&facts));
    }
}
