//! Converts a total return over elapsed days into an annual rate.

use rust_decimal::{Decimal, MathematicalOps};

use crate::constants::DAYS_PER_YEAR;
use crate::errors::{PerformanceError, Result};

/// `(1 + total_return)^(365.25 / elapsed_days) - 1`.
pub fn annualize(total_return: Decimal, elapsed_days: i64) -> Result<Decimal> {
    annualize_with(total_return, elapsed_days, DAYS_PER_YEAR)
}

/// Annualizes against a configurable year length.
///
/// A total loss of exactly -100% annualizes to -100%. Anything below that
/// has no real-valued root and is reported as undefined. Growth too large
/// for `Decimal`, such as a short window with a large gain, is reported as
/// `NumericOverflow`.
pub fn annualize_with(
    total_return: Decimal,
    elapsed_days: i64,
    days_per_year: Decimal,
) -> Result<Decimal> {
    if elapsed_days <= 0 {
        return Err(PerformanceError::InvalidPeriod { days: elapsed_days }.into());
    }

    let base = Decimal::ONE
        .checked_add(total_return)
        .ok_or_else(|| PerformanceError::overflow("annualization base"))?;
    if base.is_zero() {
        return Ok(-Decimal::ONE);
    }
    if base < Decimal::ZERO {
        return Err(PerformanceError::UndefinedAnnualizedReturn { total_return }.into());
    }

    let exponent = days_per_year / Decimal::from(elapsed_days);
    let growth = base
        .checked_powd(exponent)
        .ok_or_else(|| PerformanceError::overflow("annualized growth"))?;
    Ok(growth - Decimal::ONE)
}
