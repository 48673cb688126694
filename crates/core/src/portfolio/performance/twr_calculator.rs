//! Geometric chain-linking of sub-period returns.

use rust_decimal::Decimal;

use super::performance_model::SubPeriod;
use crate::errors::{PerformanceError, Result};

/// Links sub-period returns: `Π(1 + r_i) - 1`.
pub fn chain_link(returns: &[Decimal]) -> Result<Decimal> {
    if returns.is_empty() {
        return Err(PerformanceError::EmptyInput.into());
    }
    let growth = returns.iter().try_fold(Decimal::ONE, |acc, r| {
        Decimal::ONE
            .checked_add(*r)
            .and_then(|factor| acc.checked_mul(factor))
            .ok_or_else(|| PerformanceError::overflow("chain-linked growth"))
    })?;
    growth
        .checked_sub(Decimal::ONE)
        .ok_or_else(|| PerformanceError::overflow("chain-linked growth").into())
}

/// Total time-weighted return over an ordered, non-empty run of sub-periods.
pub fn calculate(sub_periods: &[SubPeriod]) -> Result<Decimal> {
    let returns = sub_periods
        .iter()
        .map(SubPeriod::return_rate)
        .collect::<Result<Vec<Decimal>>>()?;
    chain_link(&returns)
}
