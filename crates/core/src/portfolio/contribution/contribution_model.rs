use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::performance::DateRange;

/// A position's share of the portfolio's return over a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResult {
    /// Position start value over portfolio start value
    pub weight: Decimal,
    /// Position's own simple return
    pub instrument_return: Decimal,
    /// `weight * instrument_return`
    pub contribution: Decimal,
    /// Position end value minus start value
    pub absolute_contribution: Decimal,
    /// Absolute contribution over the portfolio's absolute return
    pub percentage_of_total: Decimal,
}

/// A ticker and its contribution, used for top/worst reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    pub ticker: String,
    pub contribution: Decimal,
}

impl ContributionSummary {
    pub fn new(ticker: impl Into<String>, contribution: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            contribution,
        }
    }

    /// Placeholder reported when there is nothing to rank.
    pub fn empty() -> Self {
        Self::new("", Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.ticker.is_empty() && self.contribution.is_zero()
    }
}

/// Start and end values of one position, already in the portfolio currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    pub start_value: Decimal,
    pub end_value: Decimal,
}

impl PositionValuation {
    pub fn new(ticker: impl Into<String>, start_value: Decimal, end_value: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            start_value,
            end_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionContribution {
    pub ticker: String,
    pub name: String,
    pub start_value: Decimal,
    pub end_value: Decimal,
    #[serde(flatten)]
    pub result: ContributionResult,
}

/// Contribution breakdown of a whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionAnalysis {
    pub period: DateRange,
    pub days: i64,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub portfolio_return: Decimal,
    /// None when the return cannot be annualized (see `annualize`)
    pub annualized_return: Option<Decimal>,
    /// Sorted by contribution, largest first
    pub positions: Vec<PositionContribution>,
    pub top_contributor: ContributionSummary,
    pub worst_contributor: ContributionSummary,
}
