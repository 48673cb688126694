use chrono::NaiveDate;
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use super::{DrawdownPeriod, RiskMetricsResult, RollingVolatilityPoint};
use crate::errors::{Error, PerformanceError, Result};
use crate::portfolio::valuation::{ValuationPoint, ValuationSeries};
use crate::settings::PerformanceConfig;
use crate::utils::time_utils::days_between;

pub trait RiskMetricsServiceTrait: Send + Sync {
    /// Volatility, Sharpe ratio, drawdowns and VaR for a valuation series.
    fn calculate_risk_metrics(&self, valuations: &[ValuationPoint]) -> Result<RiskMetricsResult>;

    /// Annualized volatility over each trailing window of returns.
    fn calculate_rolling_volatility(
        &self,
        valuations: &[ValuationPoint],
    ) -> Result<Vec<RollingVolatilityPoint>>;
}

#[derive(Debug, Default)]
pub struct RiskMetricsService {
    config: PerformanceConfig,
}

fn overflow(what: &str) -> Error {
    PerformanceError::overflow(what).into()
}

impl RiskMetricsService {
    pub fn new(config: PerformanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Simple periodic returns tagged with the date they end on.
    /// Pairs with no positive prior value are skipped.
    fn calculate_returns(points: &[ValuationPoint]) -> Result<Vec<(NaiveDate, Decimal)>> {
        points
            .windows(2)
            .filter(|w| w[0].value > Decimal::ZERO)
            .map(|w| {
                w[1].value
                    .checked_sub(w[0].value)
                    .and_then(|gain| gain.checked_div(w[0].value))
                    .map(|r| (w[1].date, r))
                    .ok_or_else(|| overflow("periodic return"))
            })
            .collect()
    }

    fn mean(returns: &[Decimal]) -> Result<Decimal> {
        if returns.is_empty() {
            return Ok(Decimal::ZERO);
        }
        returns
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(*r))
            .map(|sum| sum / Decimal::from(returns.len()))
            .ok_or_else(|| overflow("mean return"))
    }

    /// Population standard deviation.
    fn calculate_volatility(returns: &[Decimal]) -> Result<Decimal> {
        if returns.len() < 2 {
            return Ok(Decimal::ZERO);
        }
        let mean = Self::mean(returns)?;
        let variance = returns
            .iter()
            .try_fold(Decimal::ZERO, |acc, &r| {
                let diff = r.checked_sub(mean)?;
                acc.checked_add(diff.checked_mul(diff)?)
            })
            .ok_or_else(|| overflow("return variance"))?
            / Decimal::from(returns.len());

        Ok(variance.sqrt().unwrap_or(Decimal::ZERO))
    }

    /// Observations per year implied by the average spacing of the series.
    fn periods_per_year(&self, points: &[ValuationPoint]) -> Decimal {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Decimal::ONE;
        };
        let intervals = (points.len() as i64 - 1).max(1);
        let spacing = (days_between(first.date, last.date) / intervals).max(1);
        self.config.days_per_year / Decimal::from(spacing)
    }

    fn calculate_drawdowns(points: &[ValuationPoint]) -> (Decimal, Decimal, Vec<DrawdownPeriod>) {
        let mut periods = Vec::new();
        let Some(first) = points.first() else {
            return (Decimal::ZERO, Decimal::ZERO, periods);
        };

        let mut peak = first.value;
        let mut peak_date = first.date;
        let mut max_drawdown = Decimal::ZERO;
        let mut open_since: Option<NaiveDate> = None;
        let mut worst_in_period = Decimal::ZERO;

        // Drawdowns are fractions of a positive peak, so they stay within [0, 1].
        for (i, point) in points.iter().enumerate().skip(1) {
            if point.value > peak {
                if let Some(start) = open_since.take() {
                    let end = points[i - 1].date;
                    periods.push(DrawdownPeriod {
                        start_date: start,
                        end_date: end,
                        max_drawdown: worst_in_period,
                        duration_days: days_between(start, end) + 1,
                    });
                    worst_in_period = Decimal::ZERO;
                }
                peak = point.value;
                peak_date = point.date;
            } else if point.value < peak && peak > Decimal::ZERO {
                let drawdown = (peak - point.value) / peak;
                if open_since.is_none() {
                    open_since = Some(peak_date);
                }
                worst_in_period = worst_in_period.max(drawdown);
                max_drawdown = max_drawdown.max(drawdown);
            }
        }

        let last = &points[points.len() - 1];
        if let Some(start) = open_since {
            periods.push(DrawdownPeriod {
                start_date: start,
                end_date: last.date,
                max_drawdown: worst_in_period,
                duration_days: days_between(start, last.date) + 1,
            });
        }

        let current_drawdown = if last.value < peak && peak > Decimal::ZERO {
            (peak - last.value) / peak
        } else {
            Decimal::ZERO
        };

        (max_drawdown, current_drawdown, periods)
    }

    /// Historical VaR: the loss at the `1 - confidence` quantile of returns.
    fn calculate_value_at_risk(&self, returns: &[Decimal]) -> Decimal {
        if returns.is_empty() {
            return Decimal::ZERO;
        }
        let mut sorted = returns.to_vec();
        sorted.sort();
        let tail = (Decimal::ONE - self.config.var_confidence) * Decimal::from(sorted.len());
        let index = tail.floor().to_usize().unwrap_or(0).min(sorted.len() - 1);
        sorted[index].abs()
    }
}

impl RiskMetricsServiceTrait for RiskMetricsService {
    fn calculate_risk_metrics(&self, valuations: &[ValuationPoint]) -> Result<RiskMetricsResult> {
        let series = ValuationSeries::new(valuations.to_vec());
        let points = series.points();
        if points.len() < 2 {
            debug!(
                "Risk metrics need at least two valuations, got {}",
                points.len()
            );
            return Ok(RiskMetricsResult::default());
        }

        let returns: Vec<Decimal> = Self::calculate_returns(points)?
            .into_iter()
            .map(|(_, r)| r)
            .collect();
        let periods_per_year = self.periods_per_year(points);

        let volatility = Self::calculate_volatility(&returns)?;
        let annualized_volatility = volatility
            .checked_mul(periods_per_year.sqrt().unwrap_or(Decimal::ONE))
            .ok_or_else(|| overflow("annualized volatility"))?;
        let annualized_return = Self::mean(&returns)?
            .checked_mul(periods_per_year)
            .ok_or_else(|| overflow("annualized return"))?;

        let sharpe_ratio = if annualized_volatility.is_zero() {
            Decimal::ZERO
        } else {
            annualized_return
                .checked_sub(self.config.risk_free_rate)
                .and_then(|excess| excess.checked_div(annualized_volatility))
                .ok_or_else(|| overflow("Sharpe ratio"))?
        };

        let (maximum_drawdown, current_drawdown, drawdown_periods) =
            Self::calculate_drawdowns(points);
        let value_at_risk = self.calculate_value_at_risk(&returns);

        let precision = self.config.decimal_precision;
        Ok(RiskMetricsResult {
            annualized_volatility: annualized_volatility.round_dp(precision),
            sharpe_ratio: sharpe_ratio.round_dp(precision),
            maximum_drawdown: maximum_drawdown.round_dp(precision),
            current_drawdown: current_drawdown.round_dp(precision),
            value_at_risk: value_at_risk.round_dp(precision),
            annualized_return: annualized_return.round_dp(precision),
            drawdown_periods: drawdown_periods
                .into_iter()
                .map(|p| DrawdownPeriod {
                    max_drawdown: p.max_drawdown.round_dp(precision),
                    ..p
                })
                .collect(),
        })
    }

    fn calculate_rolling_volatility(
        &self,
        valuations: &[ValuationPoint],
    ) -> Result<Vec<RollingVolatilityPoint>> {
        let series = ValuationSeries::new(valuations.to_vec());
        let dated_returns = Self::calculate_returns(series.points())?;
        let window = self.config.rolling_window;
        if window == 0 || dated_returns.len() < window {
            return Ok(Vec::new());
        }

        let returns: Vec<Decimal> = dated_returns.iter().map(|(_, r)| *r).collect();
        let scale = self.config.days_per_year.sqrt().unwrap_or(Decimal::ONE);
        let precision = self.config.decimal_precision;

        (window..=returns.len())
            .map(|end| -> Result<RollingVolatilityPoint> {
                let volatility = Self::calculate_volatility(&returns[end - window..end])?;
                let annualized = volatility
                    .checked_mul(scale)
                    .ok_or_else(|| overflow("rolling volatility"))?;
                Ok(RollingVolatilityPoint {
                    date: dated_returns[end - 1].0,
                    annualized_volatility: annualized.round_dp(precision),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn series(values: &[Decimal]) -> Vec<ValuationPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                ValuationPoint::new(start + chrono::Duration::days(i as i64), *v).unwrap()
            })
            .collect()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_too_few_points_is_zero() {
        let service = RiskMetricsService::default();
        assert_eq!(
            service.calculate_risk_metrics(&series(&[dec!(100)])).unwrap(),
            RiskMetricsResult::default()
        );
        assert_eq!(
            service.calculate_risk_metrics(&[]).unwrap(),
            RiskMetricsResult::default()
        );
    }

    #[test]
    fn test_daily_series_metrics() {
        let service = RiskMetricsService::default();
        let result = service
            .calculate_risk_metrics(&series(&[dec!(100), dec!(120), dec!(90), dec!(135)]))
            .unwrap();

        // Returns 0.20, -0.25, 0.50: mean 0.15, population variance 0.095.
        assert_eq!(result.annualized_return, dec!(54.7875));
        let expected_vol = dec!(0.308220700148449) * dec!(19.111514853616);
        assert!((result.annualized_volatility - expected_vol).abs() < dec!(0.0001));
        let expected_sharpe = (dec!(54.7875) - dec!(0.02)) / expected_vol;
        assert!((result.sharpe_ratio - expected_sharpe).abs() < dec!(0.001));

        assert_eq!(result.maximum_drawdown, dec!(0.25));
        assert_eq!(result.current_drawdown, Decimal::ZERO);
        assert_eq!(result.value_at_risk, dec!(0.25));
        assert_eq!(
            result.drawdown_periods,
            vec![DrawdownPeriod {
                start_date: date(2),
                end_date: date(3),
                max_drawdown: dec!(0.25),
                duration_days: 2,
            }]
        );
    }

    #[test]
    fn test_ongoing_drawdown() {
        let service = RiskMetricsService::default();
        let result = service
            .calculate_risk_metrics(&series(&[dec!(100), dec!(80), dec!(90)]))
            .unwrap();

        assert_eq!(result.maximum_drawdown, dec!(0.2));
        assert_eq!(result.current_drawdown, dec!(0.1));
        assert_eq!(result.drawdown_periods.len(), 1);
        assert_eq!(result.drawdown_periods[0].start_date, date(1));
        assert_eq!(result.drawdown_periods[0].end_date, date(3));
        assert_eq!(result.drawdown_periods[0].duration_days, 3);
    }

    #[test]
    fn test_flat_series_has_zero_sharpe() {
        let service = RiskMetricsService::default();
        let result = service
            .calculate_risk_metrics(&series(&[dec!(100), dec!(100), dec!(100)]))
            .unwrap();
        assert_eq!(result.annualized_volatility, Decimal::ZERO);
        assert_eq!(result.sharpe_ratio, Decimal::ZERO);
        assert!(result.drawdown_periods.is_empty());
    }

    #[test]
    fn test_zero_values_are_skipped_in_returns() {
        let returns = RiskMetricsService::calculate_returns(&series(&[
            Decimal::ZERO,
            dec!(100),
            dec!(110),
        ]))
        .unwrap();
        assert_eq!(returns, vec![(date(3), dec!(0.1))]);
    }

    #[test]
    fn test_near_zero_prior_value_reports_overflow() {
        let service = RiskMetricsService::default();
        let points = series(&[Decimal::new(1, 28), dec!(10000000000), dec!(10000000001)]);

        assert!(matches!(
            service.calculate_risk_metrics(&points),
            Err(Error::Performance(PerformanceError::NumericOverflow(_)))
        ));
        assert!(matches!(
            service.calculate_rolling_volatility(&points),
            Err(Error::Performance(PerformanceError::NumericOverflow(_)))
        ));
    }

    #[test]
    fn test_rolling_volatility_windows() {
        let service = RiskMetricsService::new(PerformanceConfig {
            rolling_window: 2,
            ..Default::default()
        })
        .unwrap();
        let points = series(&[dec!(100), dec!(110), dec!(99), dec!(99), dec!(108.9)]);

        let rolling = service.calculate_rolling_volatility(&points).unwrap();

        // Four returns, windows of two: three points dated by each window's last return.
        assert_eq!(rolling.len(), 3);
        assert_eq!(rolling[0].date, date(3));
        assert_eq!(rolling[2].date, date(5));
        // Window (0.10, -0.10): population std 0.10.
        let expected = dec!(0.1) * dec!(365.25).sqrt().unwrap();
        assert!((rolling[0].annualized_volatility - expected).abs() < dec!(0.000001));
    }

    #[test]
    fn test_rolling_volatility_short_series_is_empty() {
        let service = RiskMetricsService::default();
        assert!(service
            .calculate_rolling_volatility(&series(&[dec!(1), dec!(2), dec!(3)]))
            .unwrap()
            .is_empty());
    }
}
