//! Splits a reporting window into sub-periods at external flow dates.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::flow_classifier::{classify_flow, FlowRole};
use super::performance_model::{DateRange, SubPeriod, SubPeriodSpan};
use crate::cash_flows::CashFlow;
use crate::errors::{PerformanceError, Result};
use crate::portfolio::valuation::ValuationSeries;

/// Partitions `range` into contiguous sub-periods.
///
/// Boundaries are the range start, every distinct breaking-flow date inside
/// the range, and the range end, so N breaking dates yield N + 1 sub-periods.
/// Each sub-period opens on the valuation at or nearest before its first
/// boundary and closes on the valuation at or nearest after its second.
/// Performance flows dated in `(b_i, b_i+1]` are netted into that sub-period.
/// A breaking flow on either end of the range yields a zero-length
/// sub-period whose end value equals its start value.
pub fn build_sub_periods(
    valuations: &ValuationSeries,
    flows: &[CashFlow],
    range: &DateRange,
) -> Result<Vec<SubPeriodSpan>> {
    if valuations.is_empty() {
        return Err(PerformanceError::insufficient_data(format!(
            "no valuations supplied for {} to {}",
            range.start(),
            range.end()
        ))
        .into());
    }

    let mut breaking_dates: Vec<NaiveDate> = Vec::new();
    let mut performance_flows: Vec<&CashFlow> = Vec::new();
    for flow in flows {
        match classify_flow(flow) {
            FlowRole::Breaking => {
                if range.contains(flow.date) {
                    breaking_dates.push(flow.date);
                }
            }
            FlowRole::Performance => performance_flows.push(flow),
            FlowRole::Ignored => {}
        }
    }
    breaking_dates.sort_unstable();
    breaking_dates.dedup();
    performance_flows.sort_by_key(|f| f.date);

    let mut boundaries = Vec::with_capacity(breaking_dates.len() + 2);
    boundaries.push(range.start());
    boundaries.extend(breaking_dates.iter().copied());
    boundaries.push(range.end());

    let mut spans = Vec::with_capacity(boundaries.len() - 1);
    for window in boundaries.windows(2) {
        let (from, to) = (window[0], window[1]);
        let start_value = valuations.start_value(from)?;

        if from == to {
            spans.push(SubPeriodSpan {
                start_date: from,
                end_date: to,
                sub_period: SubPeriod::new(start_value, start_value, Decimal::ZERO),
                performance_flows: Vec::new(),
            });
            continue;
        }

        let end_value = valuations.end_value(to)?;
        let inside: Vec<CashFlow> = performance_flows
            .iter()
            .filter(|f| f.date > from && f.date <= to)
            .map(|f| (*f).clone())
            .collect();
        let net_flow: Decimal = inside.iter().map(|f| f.amount).sum();

        spans.push(SubPeriodSpan {
            start_date: from,
            end_date: to,
            sub_period: SubPeriod::new(start_value, end_value, net_flow),
            performance_flows: inside,
        });
    }

    debug!(
        "Built {} sub-periods for {} to {} ({} breaking dates, {} performance flows)",
        spans.len(),
        range.start(),
        range.end(),
        breaking_dates.len(),
        performance_flows.len()
    );

    Ok(spans)
}
