//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading rule tables
//! and loan products from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::LoanProduct;

use super::types::{
    EosbRules, JurisdictionMetadata, LoanProductsConfig, PayrollRules, RuleConfig,
};

/// Loads and provides access to the rule configuration.
///
/// # Directory Structure
///
/// ```text
/// config/ksa/
/// ├── jurisdiction.yaml   # Jurisdiction metadata
/// ├── eosb.yaml           # End-of-service rule table
/// ├── payroll.yaml        # GOSI rates and overtime multiplier
/// └── loan_products.yaml  # Loan products keyed by code
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ksa")?;
/// let product = loader.get_loan_product("personal")?;
/// println!("{}: {}% {:?}", product.name, product.annual_rate, product.calculation_method);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RuleConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Fails with `ConfigNotFound` if a file is missing and
    /// `ConfigParseError` if a file is not valid YAML for its structure.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let eosb = Self::load_yaml::<EosbRules>(&path.join("eosb.yaml"))?;
        let payroll = Self::load_yaml::<PayrollRules>(&path.join("payroll.yaml"))?;

        let products_path = path.join("loan_products.yaml");
        let products = Self::load_yaml::<LoanProductsConfig>(&products_path)?;
        Self::check_product_keys(&products, &products_path)?;

        info!(
            jurisdiction = %metadata.code,
            version = %metadata.version,
            loan_products = products.products.len(),
            "Loaded rule configuration"
        );

        let config = RuleConfig::new(metadata, eosb, payroll, products.products);
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Every product must be filed under its own code.
    fn check_product_keys(products: &LoanProductsConfig, path: &Path) -> EngineResult<()> {
        match products.products.iter().find(|(key, p)| **key != p.code) {
            Some((key, product)) => Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "product filed under '{}' declares code '{}'",
                    key, product.code
                ),
            }),
            None => Ok(()),
        }
    }

    /// Returns the underlying rule configuration.
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }

    /// Returns the EOSB rule set.
    pub fn eosb_rules(&self) -> &EosbRules {
        self.config.eosb()
    }

    /// Returns the payroll rule set.
    pub fn payroll_rules(&self) -> &PayrollRules {
        self.config.payroll()
    }

    /// Gets a loan product by its code.
    ///
    /// Returns `ProductNotFound` if no product has that code.
    pub fn get_loan_product(&self, code: &str) -> EngineResult<&LoanProduct> {
        self.config
            .loan_products()
            .get(code)
            .ok_or_else(|| EngineError::ProductNotFound {
                code: code.to_string(),
            })
    }
}
