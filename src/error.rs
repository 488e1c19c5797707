//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only malformed input is an error; business-rule failures (an ineligible
//! loan, a zero EOSB entitlement) are ordinary results.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::MissingDate {
///     field: "join_date".to_string(),
/// };
/// assert_eq!(error.to_string(), "Required date is missing: join_date");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date range ends before it starts.
    #[error("Invalid date range for '{field}': {end} is before {start}")]
    InvalidRange {
        /// The range being validated (e.g. "service_period").
        field: String,
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// A date required by the calculation was not supplied.
    #[error("Required date is missing: {field}")]
    MissingDate {
        /// The name of the missing date field.
        field: String,
    },

    /// An input value was negative, zero or otherwise unusable.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A calculation would have divided by zero.
    #[error("Division by zero in {operation}")]
    DivisionByZero {
        /// The operation that was attempted.
        operation: String,
    },

    /// A loan account event is not allowed from the current status.
    #[error("Cannot apply '{event}' to a loan in status '{from}'")]
    InvalidTransition {
        /// The status the account was in.
        from: String,
        /// The event that was rejected.
        event: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Loan product code was not found in the configuration.
    #[error("Loan product not found: {code}")]
    ProductNotFound {
        /// The product code that was not found.
        code: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
