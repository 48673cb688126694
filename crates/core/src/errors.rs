//! Core error types for the performance engine.
//!
//! Only genuine contract violations surface as errors. Numeric edge cases
//! (zero start values, zero-length sub-periods) resolve to zero and never
//! reach this module.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the performance engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Performance calculation failed: {0}")]
    Performance(#[from] PerformanceError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Errors raised by the return calculations themselves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerformanceError {
    /// No valuation point could resolve a sub-period boundary.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The chain-linker was handed zero sub-periods.
    #[error("At least one sub-period is required")]
    EmptyInput,

    /// The annualizer was handed a non-positive number of days.
    #[error("Elapsed days must be positive, got {days}")]
    InvalidPeriod { days: i64 },

    /// A total return below -100% has no real-valued annualization.
    #[error("Annualized return is undefined for a total return of {total_return}")]
    UndefinedAnnualizedReturn { total_return: Decimal },

    /// An intermediate result fell outside the range of `Decimal`.
    #[error("Numeric overflow while computing {0}")]
    NumericOverflow(String),
}

/// Validation errors for externally supplied value objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid date range: start date {start} must be on or before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Valuation on {date} is negative: {value}")]
    NegativeValuation { date: NaiveDate, value: Decimal },
}

impl PerformanceError {
    /// Creates an InsufficientData error.
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    /// Creates a NumericOverflow error naming the failed computation.
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::NumericOverflow(operation.into())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err: Error = PerformanceError::EmptyInput.into();
        assert_eq!(
            err.to_string(),
            "Performance calculation failed: At least one sub-period is required"
        );

        let err: Error = PerformanceError::InvalidPeriod { days: -10 }.into();
        assert_eq!(
            err.to_string(),
            "Performance calculation failed: Elapsed days must be positive, got -10"
        );

        let err: Error = ValidationError::NegativeValuation {
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            value: dec!(-5),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Input validation failed: Valuation on 2024-01-31 is negative: -5"
        );
    }

    #[test]
    fn test_insufficient_data_helper() {
        let err = PerformanceError::insufficient_data("no valuations");
        assert_eq!(err, PerformanceError::InsufficientData("no valuations".to_string()));
    }

    #[test]
    fn test_overflow_message() {
        let err: Error = PerformanceError::overflow("sub-period return").into();
        assert_eq!(
            err.to_string(),
            "Performance calculation failed: Numeric overflow while computing sub-period return"
        );
    }
}
