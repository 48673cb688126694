//! Contribution analysis: how much of the portfolio's return each position produced.
//!
//! Weight is measured at the start of the period:
//! `contribution = (position_start / portfolio_start) * position_return`.
//! Zero bases resolve to zero rather than failing, so every figure stays
//! summable across positions.

use log::debug;
use rust_decimal::Decimal;

use super::{
    ContributionAnalysis, ContributionResult, ContributionSummary, PositionContribution,
    PositionValuation,
};
use crate::errors::{PerformanceError, Result};
use crate::portfolio::performance::{annualize_with, DateRange};
use crate::settings::PerformanceConfig;

/// Simple return `(end - start) / start`, or zero without a positive base.
pub fn portfolio_return(start_value: Decimal, end_value: Decimal) -> Result<Decimal> {
    if start_value <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    end_value
        .checked_sub(start_value)
        .and_then(|gain| gain.checked_div(start_value))
        .ok_or_else(|| PerformanceError::overflow("simple return").into())
}

/// Share of the portfolio's absolute return produced by one position.
pub fn percentage_contribution(
    absolute_contribution: Decimal,
    total_portfolio_absolute_return: Decimal,
) -> Result<Decimal> {
    if total_portfolio_absolute_return.is_zero() {
        return Ok(Decimal::ZERO);
    }
    absolute_contribution
        .checked_div(total_portfolio_absolute_return)
        .ok_or_else(|| PerformanceError::overflow("percentage of total").into())
}

/// Contribution of a single position.
///
/// `absolute_contribution` is always reported, including for a position
/// opened mid-period with no starting value.
pub fn calculate_contribution(
    position_start_value: Decimal,
    position_end_value: Decimal,
    portfolio_start_value: Decimal,
    portfolio_end_value: Decimal,
) -> Result<ContributionResult> {
    let weight = if portfolio_start_value > Decimal::ZERO {
        position_start_value
            .checked_div(portfolio_start_value)
            .ok_or_else(|| PerformanceError::overflow("position weight"))?
    } else {
        Decimal::ZERO
    };
    let instrument_return = portfolio_return(position_start_value, position_end_value)?;
    let contribution = weight
        .checked_mul(instrument_return)
        .ok_or_else(|| PerformanceError::overflow("position contribution"))?;
    let absolute_contribution = position_end_value
        .checked_sub(position_start_value)
        .ok_or_else(|| PerformanceError::overflow("absolute contribution"))?;
    let portfolio_change = portfolio_end_value
        .checked_sub(portfolio_start_value)
        .ok_or_else(|| PerformanceError::overflow("portfolio change"))?;

    Ok(ContributionResult {
        weight,
        instrument_return,
        contribution,
        absolute_contribution,
        percentage_of_total: percentage_contribution(absolute_contribution, portfolio_change)?,
    })
}

fn checked_total(mut values: impl Iterator<Item = Decimal>, what: &str) -> Result<Decimal> {
    values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| PerformanceError::overflow(what).into())
}

/// Highest and lowest contributors.
///
/// Ties go to the earliest entry. An empty input yields the empty summary
/// for both sides.
pub fn get_extremes(
    contributions: &[(String, Decimal)],
) -> (ContributionSummary, ContributionSummary) {
    let Some(first) = contributions.first() else {
        return (ContributionSummary::empty(), ContributionSummary::empty());
    };

    let (top, worst) = contributions
        .iter()
        .skip(1)
        .fold((first, first), |(top, worst), entry| {
            let top = if entry.1 > top.1 { entry } else { top };
            let worst = if entry.1 < worst.1 { entry } else { worst };
            (top, worst)
        });

    (
        ContributionSummary::new(top.0.clone(), top.1),
        ContributionSummary::new(worst.0.clone(), worst.1),
    )
}

pub trait ContributionServiceTrait: Send + Sync {
    /// Contribution of every position to the portfolio's return over `period`.
    fn analyze_positions(
        &self,
        positions: &[PositionValuation],
        period: DateRange,
    ) -> Result<ContributionAnalysis>;
}

#[derive(Debug, Default)]
pub struct ContributionService {
    config: PerformanceConfig,
}

impl ContributionService {
    pub fn new(config: PerformanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl ContributionServiceTrait for ContributionService {
    fn analyze_positions(
        &self,
        positions: &[PositionValuation],
        period: DateRange,
    ) -> Result<ContributionAnalysis> {
        let start_value = checked_total(
            positions.iter().map(|p| p.start_value),
            "portfolio start value",
        )?;
        let end_value =
            checked_total(positions.iter().map(|p| p.end_value), "portfolio end value")?;
        let total_return = portfolio_return(start_value, end_value)?;
        let precision = self.config.decimal_precision;

        let mut contributions: Vec<PositionContribution> = positions
            .iter()
            .map(|p| -> Result<PositionContribution> {
                Ok(PositionContribution {
                    ticker: p.ticker.clone(),
                    name: p.name.clone(),
                    start_value: p.start_value,
                    end_value: p.end_value,
                    result: calculate_contribution(
                        p.start_value,
                        p.end_value,
                        start_value,
                        end_value,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        contributions.sort_by(|a, b| b.result.contribution.cmp(&a.result.contribution));

        let pairs: Vec<(String, Decimal)> = contributions
            .iter()
            .map(|c| (c.ticker.clone(), c.result.contribution))
            .collect();
        let (top_contributor, worst_contributor) = get_extremes(&pairs);

        let days = period.inclusive_days();
        let annualized_return = match annualize_with(total_return, days, self.config.days_per_year)
        {
            Ok(rate) => Some(rate.round_dp(precision)),
            Err(e) => {
                debug!("Portfolio return over {} days not annualized: {}", days, e);
                None
            }
        };

        debug!(
            "Contribution analysis over {} positions: portfolio return {}",
            contributions.len(),
            total_return
        );

        Ok(ContributionAnalysis {
            period,
            days,
            start_value,
            end_value,
            portfolio_return: total_return.round_dp(precision),
            annualized_return,
            positions: contributions,
            top_contributor,
            worst_contributor,
        })
    }
}
