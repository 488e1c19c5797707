//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load rule tables from YAML files:
//! jurisdiction metadata, the EOSB entitlement table, GOSI rates and the
//! loan product catalogue.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ksa").unwrap();
//! println!("Loaded rules: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EosbRules, GosiConfig, GosiRates, JurisdictionMetadata, LoanProductsConfig, PayrollRules,
    ResignationTier, RuleConfig,
};
