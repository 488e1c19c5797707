//! End-to-end tests for the payroll engine against the KSA rule set.
//!
//! This test suite covers:
//! - EOSB settlements for each kind of termination
//! - Loan quotes, schedules and eligibility for the configured products
//! - The loan account lifecycle from draft to closure
//! - Monthly payroll accruals for domestic and foreign employees
//! - Error cases and serialized output

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use payroll_engine::calculation::{
    amortization_schedule, calculate_eosb, calculate_payroll, evaluate_eligibility,
    quote_for_product, EligibilityCheck,
};
use payroll_engine::config::ConfigLoader;
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    CompensationProfile, EligibilityContext, LoanAccount, LoanApplication, LoanStatus,
    NationalityClass, PayPeriod, PayrollFacts, TerminationCase, TerminationType,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/ksa").expect("Failed to load config")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn profile(basic: &str, housing: &str) -> CompensationProfile {
    CompensationProfile {
        basic_salary: decimal(basic),
        housing_allowance: decimal(housing),
        ..CompensationProfile::default()
    }
}

fn termination(
    termination_type: TerminationType,
    join_date: &str,
    last_working_day: &str,
) -> TerminationCase {
    TerminationCase {
        employee_ref: "emp_001".to_string(),
        join_date: Some(date(join_date)),
        last_working_day: Some(date(last_working_day)),
        termination_type,
        unused_leave_days: Decimal::ZERO,
        pending_loans: Decimal::ZERO,
        pending_advances: Decimal::ZERO,
        other_deductions: Decimal::ZERO,
        other_payments: Decimal::ZERO,
        overtime_due: Decimal::ZERO,
        bonus_due: Decimal::ZERO,
    }
}

fn application(product_code: &str, principal: &str, term_months: u32) -> LoanApplication {
    LoanApplication {
        employee_ref: "emp_001".to_string(),
        product_code: product_code.to_string(),
        principal_amount: decimal(principal),
        term_months,
    }
}

fn context(net_salary: &str, existing: &str) -> EligibilityContext {
    EligibilityContext {
        net_salary: decimal(net_salary),
        existing_monthly_deductions: decimal(existing),
        active_loan_count: 0,
        on_probation: false,
    }
}

fn march_facts(nationality_class: NationalityClass) -> PayrollFacts {
    PayrollFacts {
        employee_ref: "emp_001".to_string(),
        period: PayPeriod {
            start_date: date("2024-03-01"),
            end_date: date("2024-03-31"),
        },
        compensation: CompensationProfile {
            basic_salary: decimal("6000"),
            housing_allowance: decimal("1500"),
            transportation_allowance: decimal("500"),
            food_allowance: decimal("300"),
            telecom_allowance: decimal("100"),
            shift_allowance: decimal("250"),
            ..CompensationProfile::default()
        },
        nationality_class,
        days_in_period: 30,
        days_absent: Decimal::ZERO,
        overtime_hours: Decimal::ZERO,
        other_deductions: Decimal::ZERO,
    }
}

fn assert_final_step(breakdown: &payroll_engine::models::Breakdown, rule_id: &str, value: Decimal) {
    let last = breakdown.final_step().expect("breakdown has no final step");
    assert_eq!(last.rule_id, rule_id);
    assert_eq!(last.value, value);
    assert_eq!(breakdown.steps.last(), Some(last));
}

// =============================================================================
// SECTION 1: End-of-Service Benefit
// =============================================================================

#[test]
fn test_eosb_resignation_eight_years() {
    let config = load_config();
    let case = termination(TerminationType::Resignation, "2015-01-01", "2023-01-01");

    let settlement = calculate_eosb(&case, &profile("5000", "2000"), config.eosb_rules()).unwrap();

    assert_eq!(settlement.service_span.total_days, 2922);
    assert_eq!(settlement.service_span.years, 8);
    assert_eq!(settlement.first_tier_amount, decimal("17500.00"));
    assert_eq!(settlement.second_tier_amount, decimal("21000.00"));
    assert_eq!(settlement.pro_rata_amount, decimal("466.67"));
    assert_eq!(settlement.tiered_amount, decimal("38966.67"));
    assert_eq!(settlement.multiplier_percent, decimal("66.67"));
    assert_eq!(settlement.rule_label, "Resignation 5 to 10 years: two thirds");
    assert_eq!(settlement.final_eosb, decimal("25979.08"));
    assert_eq!(settlement.earned_salary, decimal("233.33"));
    assert_eq!(settlement.total_gross, decimal("26212.41"));
    assert_final_step(&settlement.breakdown, "net_payable", decimal("26212.41"));
}

#[test]
fn test_eosb_employer_termination_with_leave_and_loans() {
    let config = load_config();
    let mut case = termination(TerminationType::TerminationByEmployer, "2018-03-01", "2024-03-15");
    case.unused_leave_days = decimal("10");
    case.pending_loans = decimal("1500");

    let settlement = calculate_eosb(&case, &profile("8000", "2000"), config.eosb_rules()).unwrap();

    assert_eq!(settlement.service_span.years, 6);
    assert_eq!(settlement.service_span.days, 16);
    assert_eq!(settlement.multiplier_percent, decimal("100"));
    assert_eq!(settlement.first_tier_amount, decimal("25000.00"));
    assert_eq!(settlement.second_tier_amount, decimal("10000.00"));
    assert_eq!(settlement.pro_rata_amount, decimal("5333.33"));
    assert_eq!(settlement.final_eosb, decimal("40333.33"));
    assert_eq!(settlement.leave_encashment, decimal("3333.33"));
    assert_eq!(settlement.earned_salary, decimal("5000.00"));
    assert_eq!(settlement.total_gross, decimal("48666.66"));
    assert_eq!(settlement.total_deductions, decimal("1500.00"));
    assert_eq!(settlement.net_payable, decimal("47166.66"));
}

#[test]
fn test_eosb_resignation_one_third_tier() {
    let config = load_config();
    let case = termination(TerminationType::Resignation, "2020-06-01", "2023-08-10");

    let settlement = calculate_eosb(&case, &profile("5000", "1250"), config.eosb_rules()).unwrap();

    assert_eq!(settlement.service_span.years, 3);
    assert_eq!(settlement.multiplier_percent, decimal("33.33"));
    assert_eq!(settlement.tiered_amount, decimal("16666.67"));
    assert_eq!(settlement.final_eosb, decimal("5555.00"));
    assert_eq!(settlement.net_payable, decimal("7638.33"));
}

#[test]
fn test_eosb_resignation_under_two_years_pays_salary_only() {
    let config = load_config();
    let case = termination(TerminationType::Resignation, "2023-01-01", "2024-06-30");

    let settlement = calculate_eosb(&case, &profile("5000", "1250"), config.eosb_rules()).unwrap();

    assert_eq!(settlement.service_span.years, 1);
    assert_eq!(settlement.final_eosb, decimal("0.00"));
    assert_eq!(settlement.earned_salary, decimal("6250.00"));
    assert_eq!(settlement.net_payable, decimal("6250.00"));
}

#[test]
fn test_eosb_non_resignation_types_get_full_entitlement() {
    let config = load_config();
    for termination_type in [
        TerminationType::TerminationByEmployer,
        TerminationType::ContractExpiry,
        TerminationType::MutualAgreement,
        TerminationType::Death,
        TerminationType::Disability,
    ] {
        let case = termination(termination_type, "2023-01-01", "2024-06-30");
        let settlement =
            calculate_eosb(&case, &profile("5000", "1250"), config.eosb_rules()).unwrap();

        assert_eq!(settlement.multiplier_percent, decimal("100"));
        assert_eq!(settlement.final_eosb, settlement.tiered_amount);
    }
}

#[test]
fn test_eosb_missing_last_working_day() {
    let config = load_config();
    let mut case = termination(TerminationType::Resignation, "2020-01-01", "2024-01-01");
    case.last_working_day = None;

    let result = calculate_eosb(&case, &profile("5000", "1250"), config.eosb_rules());

    match result {
        Err(EngineError::MissingDate { field }) => assert_eq!(field, "last_working_day"),
        other => panic!("Expected MissingDate, got {:?}", other),
    }
}

#[test]
fn test_eosb_reversed_dates() {
    let config = load_config();
    let case = termination(TerminationType::Resignation, "2024-01-01", "2023-12-31");

    let result = calculate_eosb(&case, &profile("5000", "1250"), config.eosb_rules());

    assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
}

// =============================================================================
// SECTION 2: Loan Quotes and Eligibility
// =============================================================================

#[test]
fn test_personal_loan_quote_and_schedule() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();

    let quote = quote_for_product(&application("personal", "20000", 12), product).unwrap();

    assert_eq!(quote.emi, decimal("1776.98"));
    assert_eq!(quote.total_interest, decimal("1323.76"));
    assert_eq!(quote.admin_fee, decimal("250.00"));
    assert_eq!(quote.total_payable, decimal("21573.76"));

    let schedule = amortization_schedule(&quote);
    assert_eq!(schedule.len(), 12);
    assert_eq!(schedule[0].interest_component, decimal("200.00"));
    assert_eq!(schedule[0].principal_component, decimal("1576.98"));
    assert!(schedule.last().unwrap().closing_balance.is_zero());
    let interest: Decimal = schedule.iter().map(|i| i.interest_component).sum();
    assert_eq!(interest, quote.total_interest);
}

#[test]
fn test_personal_loan_eligible() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();

    let result = evaluate_eligibility(
        &application("personal", "20000", 12),
        product,
        &context("12000", "1500"),
    )
    .unwrap();

    assert!(result.eligible);
    assert!(result.failed_checks().is_empty());
    assert_eq!(result.total_monthly_deductions, decimal("3276.98"));
    assert_eq!(result.dti_percent, decimal("27.31"));
    assert_eq!(result.max_affordable_emi, decimal("2460.00"));
    assert_final_step(&result.breakdown, "dti_percent", decimal("27.31"));
}

#[test]
fn test_car_loan_blocked_during_probation() {
    let config = load_config();
    let product = config.get_loan_product("car").unwrap();
    let mut ctx = context("8000", "0");
    ctx.on_probation = true;

    let result = evaluate_eligibility(&application("car", "60000", 36), product, &ctx).unwrap();

    assert_eq!(result.quote.total_interest, decimal("9000.00"));
    assert_eq!(result.quote.emi, decimal("1916.67"));
    assert_eq!(result.dti_percent, decimal("23.96"));
    assert!(!result.eligible);
    assert_eq!(result.failed_checks(), vec![EligibilityCheck::Probation]);
}

#[test]
fn test_salary_advance_allowed_during_probation() {
    let config = load_config();
    let product = config.get_loan_product("salary_advance").unwrap();
    let mut ctx = context("10000", "0");
    ctx.on_probation = true;

    let result =
        evaluate_eligibility(&application("salary_advance", "3000", 3), product, &ctx).unwrap();

    assert!(result.eligible);
    assert!(result.passed(EligibilityCheck::Probation));
    assert_eq!(result.quote.emi, decimal("1000.00"));
}

#[test]
fn test_salary_advance_over_dti_cap() {
    let config = load_config();
    let product = config.get_loan_product("salary_advance").unwrap();

    let result = evaluate_eligibility(
        &application("salary_advance", "9000", 3),
        product,
        &context("6000", "0"),
    )
    .unwrap();

    assert!(!result.eligible);
    assert_eq!(result.failed_checks(), vec![EligibilityCheck::Dti]);
    assert_eq!(result.dti_percent, decimal("50.00"));
    assert_eq!(result.max_affordable_emi, decimal("1980.00"));
}

#[test]
fn test_multiple_failed_checks_reported_together() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();
    let mut ctx = context("12000", "0");
    ctx.active_loan_count = 2;

    let result =
        evaluate_eligibility(&application("personal", "150000", 72), product, &ctx).unwrap();

    assert_eq!(
        result.failed_checks(),
        vec![
            EligibilityCheck::Amount,
            EligibilityCheck::Term,
            EligibilityCheck::ConcurrentLoans,
        ]
    );
}

#[test]
fn test_unknown_product() {
    let config = load_config();

    let result = config.get_loan_product("mortgage");

    assert!(matches!(result, Err(EngineError::ProductNotFound { .. })));
}

#[test]
fn test_zero_salary_rejected() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();

    let result = evaluate_eligibility(
        &application("personal", "20000", 12),
        product,
        &context("0", "0"),
    );

    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
}

#[test]
fn test_salary_rounding_to_zero_rejected() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();

    let result = evaluate_eligibility(
        &application("personal", "20000", 12),
        product,
        &context("0.004", "0"),
    );

    match result {
        Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "net_salary"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_extreme_term_reported_as_failed_check() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();

    let result = evaluate_eligibility(
        &application("personal", "20000", u32::MAX),
        product,
        &context("12000", "0"),
    )
    .unwrap();

    assert!(!result.eligible);
    assert_eq!(result.failed_checks(), vec![EligibilityCheck::Term]);
    assert_eq!(result.quote.term_months, 60);
}

// =============================================================================
// SECTION 3: Loan Account Lifecycle
// =============================================================================

#[test]
fn test_loan_lifecycle_to_closure() {
    let config = load_config();
    let product = config.get_loan_product("salary_advance").unwrap();
    let app = application("salary_advance", "3000", 3);
    let eligibility = evaluate_eligibility(&app, product, &context("10000", "0")).unwrap();

    let mut account = LoanAccount::draft(Uuid::new_v4(), app);
    account.submit(date("2024-05-01")).unwrap();
    account.approve(&eligibility, date("2024-05-02")).unwrap();
    account
        .disburse(&eligibility.quote, date("2024-05-05"))
        .unwrap();
    assert_eq!(account.status, LoanStatus::Active);
    assert_eq!(account.outstanding_balance, decimal("3000.00"));

    for installment in amortization_schedule(&eligibility.quote) {
        account
            .record_repayment(installment.payment, date("2024-06-01"))
            .unwrap();
    }

    assert_eq!(account.status, LoanStatus::Closed);
    assert_eq!(account.history.len(), 5);
}

#[test]
fn test_ineligible_loan_cannot_be_approved() {
    let config = load_config();
    let product = config.get_loan_product("salary_advance").unwrap();
    let app = application("salary_advance", "9000", 3);
    let eligibility = evaluate_eligibility(&app, product, &context("6000", "0")).unwrap();

    let mut account = LoanAccount::draft(Uuid::new_v4(), app);
    account.submit(date("2024-05-01")).unwrap();

    assert!(matches!(
        account.approve(&eligibility, date("2024-05-02")),
        Err(EngineError::InvalidTransition { .. })
    ));
    account.reject("DTI over cap", date("2024-05-02")).unwrap();
    assert_eq!(account.status, LoanStatus::Rejected);
}

// =============================================================================
// SECTION 4: Payroll Accrual
// =============================================================================

#[test]
fn test_payroll_domestic_employee() {
    let config = load_config();

    let result = calculate_payroll(&march_facts(NationalityClass::Domestic), config.payroll_rules())
        .unwrap();

    assert_eq!(result.gross_pay, decimal("8650.00"));
    assert_eq!(result.gosi_employee, decimal("731.25"));
    assert_eq!(result.gosi_employer, decimal("900.00"));
    assert_eq!(result.net_pay, decimal("7918.75"));
    assert_final_step(&result.breakdown, "net_pay", decimal("7918.75"));
}

#[test]
fn test_payroll_foreign_employee() {
    let config = load_config();

    let result = calculate_payroll(&march_facts(NationalityClass::Foreign), config.payroll_rules())
        .unwrap();

    assert_eq!(result.gosi_employee, decimal("150.00"));
    assert_eq!(result.gosi_employer, decimal("150.00"));
    assert_eq!(result.net_pay, decimal("8500.00"));
}

#[test]
fn test_payroll_overtime_and_absence() {
    let config = load_config();
    let mut facts = march_facts(NationalityClass::Domestic);
    facts.overtime_hours = decimal("10");
    facts.days_absent = decimal("2");

    let result = calculate_payroll(&facts, config.payroll_rules()).unwrap();

    assert_eq!(result.overtime_pay, decimal("375.00"));
    assert_eq!(result.gross_pay, decimal("9025.00"));
    assert_eq!(result.absence_deduction, decimal("400.00"));
    assert_eq!(result.total_deductions, decimal("1131.25"));
    assert_eq!(result.net_pay, decimal("7893.75"));
}

#[test]
fn test_payroll_loan_installment_as_deduction() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();
    let quote = quote_for_product(&application("personal", "20000", 12), product).unwrap();
    let mut facts = march_facts(NationalityClass::Domestic);
    facts.other_deductions = quote.emi;

    let result = calculate_payroll(&facts, config.payroll_rules()).unwrap();

    assert_eq!(result.total_deductions, decimal("2508.23"));
    assert_eq!(result.net_pay, decimal("6141.77"));
}

#[test]
fn test_payroll_absent_more_than_period() {
    let config = load_config();
    let mut facts = march_facts(NationalityClass::Domestic);
    facts.days_absent = decimal("31");

    let result = calculate_payroll(&facts, config.payroll_rules());

    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
}

// =============================================================================
// SECTION 5: Serialized Output
// =============================================================================

#[test]
fn test_results_serialize_amounts_as_strings() {
    let config = load_config();
    let product = config.get_loan_product("personal").unwrap();
    let result = evaluate_eligibility(
        &application("personal", "20000", 12),
        product,
        &context("12000", "1500"),
    )
    .unwrap();

    let json: Value = serde_json::to_value(&result).unwrap();

    assert_eq!(json["quote"]["emi"], "1776.98");
    assert_eq!(json["quote"]["method"], "reducing_balance");
    assert_eq!(json["dti_percent"], "27.31");
    assert_eq!(json["checks"]["dti"]["passed"], true);
}

#[test]
fn test_settlement_json_round_trip() {
    let config = load_config();
    let case = termination(TerminationType::Resignation, "2015-01-01", "2023-01-01");
    let settlement = calculate_eosb(&case, &profile("5000", "2000"), config.eosb_rules()).unwrap();

    let json = serde_json::to_string(&settlement).unwrap();
    let parsed: payroll_engine::calculation::EosbSettlement = serde_json::from_str(&json).unwrap();

    assert_eq!(settlement, parsed);
}

#[test]
fn test_calculations_are_deterministic() {
    let config = load_config();
    let facts = march_facts(NationalityClass::Domestic);

    let first = calculate_payroll(&facts, config.payroll_rules()).unwrap();
    let second = calculate_payroll(&facts, config.payroll_rules()).unwrap();

    assert_eq!(first, second);
}
