use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetricsResult {
    pub annualized_volatility: Decimal,
    pub sharpe_ratio: Decimal,
    pub maximum_drawdown: Decimal,
    pub current_drawdown: Decimal,
    /// Historical VaR as a positive loss fraction
    pub value_at_risk: Decimal,
    pub annualized_return: Decimal,
    pub drawdown_periods: Vec<DrawdownPeriod>,
}

/// Peak-to-recovery stretch. An unrecovered drawdown ends on the last date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_drawdown: Decimal,
    pub duration_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingVolatilityPoint {
    pub date: NaiveDate,
    pub annualized_volatility: Decimal,
}
