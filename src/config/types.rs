//! Configuration types for the rule tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. The EOSB and payroll rule
//! sets default to the statutory values so the engines work without files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{LoanProduct, NationalityClass};

/// Metadata about the jurisdiction the rules belong to.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short code (e.g. "KSA").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Version or effective date of the rule set.
    pub version: String,
    /// ISO currency code all amounts are expressed in.
    pub currency: String,
    /// URL to the governing regulation.
    pub source_url: String,
}

/// One row of the resignation entitlement table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResignationTier {
    /// Completed service years from which this tier applies.
    pub min_years: i64,
    /// Share of the tiered amount paid, in percent.
    pub percent: Decimal,
    /// Label shown in the breakdown.
    pub label: String,
}

/// End-of-service rule set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EosbRules {
    /// Years paid at half a month's wage before the full-wage rate applies.
    pub half_wage_years: i64,
    /// Entitlement for every termination type other than resignation.
    pub full_entitlement_percent: Decimal,
    /// Resignation entitlement by tenure.
    pub resignation_tiers: Vec<ResignationTier>,
}

impl Default for EosbRules {
    fn default() -> Self {
        Self {
            half_wage_years: 5,
            full_entitlement_percent: Decimal::ONE_HUNDRED,
            resignation_tiers: vec![
                ResignationTier {
                    min_years: 0,
                    percent: Decimal::ZERO,
                    label: "Resignation under 2 years: no entitlement".to_string(),
                },
                ResignationTier {
                    min_years: 2,
                    percent: Decimal::new(3333, 2),
                    label: "Resignation 2 to 5 years: one third".to_string(),
                },
                ResignationTier {
                    min_years: 5,
                    percent: Decimal::new(6667, 2),
                    label: "Resignation 5 to 10 years: two thirds".to_string(),
                },
                ResignationTier {
                    min_years: 10,
                    percent: Decimal::ONE_HUNDRED,
                    label: "Resignation 10 years or more: full entitlement".to_string(),
                },
            ],
        }
    }
}

impl EosbRules {
    /// Returns the resignation tier for the given completed years.
    ///
    /// The tier with the highest threshold that is met applies, whatever the
    /// order of the table.
    pub fn resignation_tier(&self, years: i64) -> Option<&ResignationTier> {
        self.resignation_tiers
            .iter()
            .filter(|t| t.min_years <= years)
            .max_by_key(|t| t.min_years)
    }

    pub(crate) fn sort_tiers(&mut self) {
        self.resignation_tiers.sort_by_key(|t| t.min_years);
    }
}

/// Employee and employer GOSI contribution rates (fractions, not percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GosiRates {
    /// Rate withheld from the employee.
    pub employee: Decimal,
    /// Rate paid by the employer.
    pub employer: Decimal,
}

/// GOSI rates by nationality class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GosiConfig {
    /// Rates for domestic employees.
    pub domestic: GosiRates,
    /// Rates for foreign employees.
    pub foreign: GosiRates,
}

/// Payroll accrual rule set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollRules {
    /// Multiplier applied to the hourly rate for overtime.
    pub overtime_multiplier: Decimal,
    /// GOSI contribution rates.
    pub gosi: GosiConfig,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            overtime_multiplier: Decimal::new(15, 1),
            gosi: GosiConfig {
                domestic: GosiRates {
                    employee: Decimal::new(975, 4),
                    employer: Decimal::new(12, 2),
                },
                foreign: GosiRates {
                    employee: Decimal::new(2, 2),
                    employer: Decimal::new(2, 2),
                },
            },
        }
    }
}

impl PayrollRules {
    /// GOSI rates for a nationality class.
    pub fn gosi_rates(&self, nationality_class: NationalityClass) -> GosiRates {
        match nationality_class {
            NationalityClass::Domestic => self.gosi.domestic,
            NationalityClass::Foreign => self.gosi.foreign,
        }
    }
}

/// Loan products configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanProductsConfig {
    /// Map of product code to product definition.
    pub products: HashMap<String, LoanProduct>,
}

/// The complete rule configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    metadata: JurisdictionMetadata,
    eosb: EosbRules,
    payroll: PayrollRules,
    loan_products: HashMap<String, LoanProduct>,
}

impl RuleConfig {
    /// Creates a new RuleConfig from its component parts.
    pub fn new(
        metadata: JurisdictionMetadata,
        eosb: EosbRules,
        payroll: PayrollRules,
        loan_products: HashMap<String, LoanProduct>,
    ) -> Self {
        let mut eosb = eosb;
        eosb.sort_tiers();
        Self {
            metadata,
            eosb,
            payroll,
            loan_products,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns the EOSB rule set.
    pub fn eosb(&self) -> &EosbRules {
        &self.eosb
    }

    /// Returns the payroll rule set.
    pub fn payroll(&self) -> &PayrollRules {
        &self.payroll
    }

    /// Returns all loan products keyed by code.
    pub fn loan_products(&self) -> &HashMap<String, LoanProduct> {
        &self.loan_products
    }
}
