//! Engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DAYS_PER_YEAR, DECIMAL_PRECISION, PARALLEL_THRESHOLD, RISK_FREE_RATE, ROLLING_WINDOW,
    VAR_CONFIDENCE,
};
use crate::errors::{Error, Result};

/// Tunables for the performance engine.
///
/// Every field has a default, so a partial document deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceConfig {
    /// Calendar days per year used when annualizing (default: 365.25)
    pub days_per_year: Decimal,

    /// Decimal places kept in reported results (default: 6)
    pub decimal_precision: u32,

    /// Annual risk-free rate for the Sharpe ratio (default: 0.02)
    pub risk_free_rate: Decimal,

    /// Confidence level for historical VaR (default: 0.95)
    pub var_confidence: Decimal,

    /// Returns per rolling volatility window (default: 30)
    pub rolling_window: usize,

    /// Batch size at which batch calculations go parallel (default: 8)
    pub parallel_threshold: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            days_per_year: DAYS_PER_YEAR,
            decimal_precision: DECIMAL_PRECISION,
            risk_free_rate: RISK_FREE_RATE,
            var_confidence: VAR_CONFIDENCE,
            rolling_window: ROLLING_WINDOW,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl PerformanceConfig {
    /// Rejects values that would make the calculations meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.days_per_year <= Decimal::ZERO {
            return Err(Error::InvalidConfigValue(format!(
                "daysPerYear must be positive, got {}",
                self.days_per_year
            )));
        }
        if self.var_confidence <= Decimal::ZERO || self.var_confidence >= Decimal::ONE {
            return Err(Error::InvalidConfigValue(format!(
                "varConfidence must be between 0 and 1, got {}",
                self.var_confidence
            )));
        }
        if self.rolling_window == 0 {
            return Err(Error::InvalidConfigValue(
                "rollingWindow must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a batch of `len` items should be processed in parallel.
    pub fn should_parallelize(&self, len: usize) -> bool {
        len >= self.parallel_threshold.max(1)
    }
}
