use log::{debug, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::annualizer::annualize_with;
use super::flow_classifier::{classify_flow, FlowRole};
use super::performance_model::{DateRange, SubPeriodResult, TwrRequest, TwrResult};
use super::sub_period_builder::build_sub_periods;
use super::twr_calculator::chain_link;
use crate::cash_flows::{CashFlow, CashFlowSummary};
use crate::errors::Result;
use crate::portfolio::valuation::{ValuationPoint, ValuationSeries};
use crate::settings::PerformanceConfig;

pub trait PerformanceServiceTrait: Send + Sync {
    /// Time-weighted return for one account over `period`.
    fn calculate_twr(
        &self,
        valuations: &[ValuationPoint],
        cash_flows: &[CashFlow],
        period: DateRange,
    ) -> Result<TwrResult>;

    /// Runs `calculate_twr` for every request. Results keep the input order
    /// and carry the request id.
    fn calculate_twr_batch(&self, requests: &[TwrRequest]) -> Vec<(String, Result<TwrResult>)>;
}

#[derive(Debug, Default)]
pub struct PerformanceService {
    config: PerformanceConfig,
}

impl PerformanceService {
    pub fn new(config: PerformanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    fn sorted_flows(cash_flows: &[CashFlow]) -> Vec<CashFlow> {
        let mut flows = cash_flows.to_vec();
        if !flows.windows(2).all(|w| w[0].date <= w[1].date) {
            debug!(
                "Cash flows ({} records) were not in date order; sorting",
                flows.len()
            );
            flows.sort_by_key(|f| f.date);
        }
        flows
    }

    fn count_roles(flows: &[CashFlow]) -> (usize, usize) {
        flows
            .iter()
            .fold((0, 0), |(external, performance), flow| match classify_flow(flow) {
                FlowRole::Breaking => (external + 1, performance),
                FlowRole::Performance => (external, performance + 1),
                FlowRole::Ignored => (external, performance),
            })
    }

    fn annualized(&self, total_return: Decimal, period: &DateRange) -> Option<Decimal> {
        match annualize_with(total_return, period.elapsed_days(), self.config.days_per_year) {
            Ok(rate) => Some(rate.round_dp(self.config.decimal_precision)),
            Err(e) => {
                debug!(
                    "Annualized return not computable for {} to {}: {}",
                    period.start(),
                    period.end(),
                    e
                );
                None
            }
        }
    }
}

impl PerformanceServiceTrait for PerformanceService {
    fn calculate_twr(
        &self,
        valuations: &[ValuationPoint],
        cash_flows: &[CashFlow],
        period: DateRange,
    ) -> Result<TwrResult> {
        let series = ValuationSeries::new(valuations.to_vec());
        let flows = Self::sorted_flows(cash_flows);

        let spans = build_sub_periods(&series, &flows, &period)?;
        let returns = spans
            .iter()
            .map(|s| s.sub_period.return_rate())
            .collect::<Result<Vec<Decimal>>>()?;
        let total_return = chain_link(&returns)?;

        for span in spans.iter().filter(|s| s.sub_period.start_value.is_zero()) {
            debug!(
                "Sub-period {} to {} has no starting value; its return is zero",
                span.start_date, span.end_date
            );
        }

        let (external_flow_count, performance_flow_count) = Self::count_roles(&flows);
        let precision = self.config.decimal_precision;

        let start_value = spans
            .first()
            .map_or(Decimal::ZERO, |s| s.sub_period.start_value);
        let end_value = spans.last().map_or(Decimal::ZERO, |s| s.sub_period.end_value);

        let sub_periods = spans
            .into_iter()
            .zip(returns)
            .map(|(span, return_rate)| SubPeriodResult {
                start_date: span.start_date,
                end_date: span.end_date,
                days: span.days(),
                sub_period: span.sub_period,
                return_rate: return_rate.round_dp(precision),
                total_performance_flow: span.sub_period.net_flow,
                performance_flows: span
                    .performance_flows
                    .iter()
                    .map(CashFlowSummary::from)
                    .collect(),
            })
            .collect();

        Ok(TwrResult {
            period,
            total_return: total_return.round_dp(precision),
            annualized_return: self.annualized(total_return, &period),
            sub_periods,
            external_flow_count,
            performance_flow_count,
            start_value,
            end_value,
            total_days: period.elapsed_days(),
        })
    }

    fn calculate_twr_batch(&self, requests: &[TwrRequest]) -> Vec<(String, Result<TwrResult>)> {
        let run = |request: &TwrRequest| {
            let result = self.calculate_twr(&request.valuations, &request.cash_flows, request.period);
            if let Err(e) = &result {
                warn!("TWR calculation failed for '{}': {}", request.id, e);
            }
            (request.id.clone(), result)
        };

        if self.config.should_parallelize(requests.len()) {
            requests.par_iter().map(run).collect()
        } else {
            requests.iter().map(run).collect()
        }
    }
}
