//! Payroll engine for Saudi Arabian HR and payroll rules
//!
//! This crate derives the financial figures an HR system needs: end-of-service
//! benefit (EOSB) settlements under the KSA Labor Law, loan quotes and
//! amortization schedules, loan eligibility against debt-to-income limits, and
//! monthly payroll accruals with GOSI contributions. Rule parameters are loaded
//! from YAML files per jurisdiction.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
