//! Decomposes active return into allocation, selection and interaction.
//!
//! Per sector, with portfolio weight `wp`, benchmark weight `wb`, sector
//! returns `rp`/`rb` and total benchmark return `Rb`:
//!
//! - allocation  = (wp - wb) * (rb - Rb)
//! - selection   = wb * (rp - rb)
//! - interaction = (wp - wb) * (rp - rb)

use log::debug;
use rust_decimal::Decimal;

use super::{AttributionHolding, AttributionResult, SectorAttribution};
use crate::errors::{Error, PerformanceError, Result};

fn overflow(what: &str) -> Error {
    PerformanceError::overflow(what).into()
}

/// Summed weight and weight-averaged return of the holdings in `sector`.
fn sector_weight_and_return(
    holdings: &[AttributionHolding],
    sector: &str,
) -> Result<(Decimal, Decimal)> {
    let (weight, weighted_return) = holdings
        .iter()
        .filter(|h| h.sector == sector)
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(w, wr), h| {
            let w = w.checked_add(h.weight)?;
            let wr = wr.checked_add(h.weight.checked_mul(h.return_rate)?)?;
            Some((w, wr))
        })
        .ok_or_else(|| overflow("sector weight"))?;

    if weight.is_zero() {
        return Ok((weight, Decimal::ZERO));
    }
    let sector_return = weighted_return
        .checked_div(weight)
        .ok_or_else(|| overflow("sector return"))?;
    Ok((weight, sector_return))
}

/// Allocation, selection and interaction effects for one sector.
fn sector_effects(
    (wp, rp): (Decimal, Decimal),
    (wb, rb): (Decimal, Decimal),
    benchmark_return: Decimal,
) -> Option<(Decimal, Decimal, Decimal)> {
    let active_weight = wp.checked_sub(wb)?;
    let return_gap = rp.checked_sub(rb)?;
    let allocation = active_weight.checked_mul(rb.checked_sub(benchmark_return)?)?;
    let selection = wb.checked_mul(return_gap)?;
    let interaction = active_weight.checked_mul(return_gap)?;
    Some((allocation, selection, interaction))
}

pub trait AttributionServiceTrait: Send + Sync {
    fn calculate_attribution(
        &self,
        portfolio: &[AttributionHolding],
        benchmark: &[AttributionHolding],
        portfolio_return: Decimal,
        benchmark_return: Decimal,
    ) -> Result<AttributionResult>;
}

#[derive(Debug, Default)]
pub struct AttributionService;

impl AttributionService {
    pub fn new() -> Self {
        Self
    }
}

impl AttributionServiceTrait for AttributionService {
    fn calculate_attribution(
        &self,
        portfolio: &[AttributionHolding],
        benchmark: &[AttributionHolding],
        portfolio_return: Decimal,
        benchmark_return: Decimal,
    ) -> Result<AttributionResult> {
        // Sectors in first-seen order, portfolio before benchmark.
        let mut sector_names: Vec<&str> = Vec::new();
        for holding in portfolio.iter().chain(benchmark) {
            if !sector_names.contains(&holding.sector.as_str()) {
                sector_names.push(holding.sector.as_str());
            }
        }

        let mut sectors = Vec::with_capacity(sector_names.len());
        for sector in sector_names {
            let (wp, rp) = sector_weight_and_return(portfolio, sector)?;
            let (wb, rb) = sector_weight_and_return(benchmark, sector)?;
            let (allocation_effect, selection_effect, interaction_effect) =
                sector_effects((wp, rp), (wb, rb), benchmark_return)
                    .ok_or_else(|| overflow("sector effects"))?;

            sectors.push(SectorAttribution {
                sector: sector.to_string(),
                portfolio_weight: wp,
                benchmark_weight: wb,
                portfolio_return: rp,
                benchmark_return: rb,
                allocation_effect,
                selection_effect,
                interaction_effect,
            });
        }

        let (total_allocation, total_selection, total_interaction) = sectors
            .iter()
            .try_fold(
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
                |(a, s, i), sector| {
                    Some((
                        a.checked_add(sector.allocation_effect)?,
                        s.checked_add(sector.selection_effect)?,
                        i.checked_add(sector.interaction_effect)?,
                    ))
                },
            )
            .ok_or_else(|| overflow("attribution totals"))?;
        let total_attribution = total_allocation
            .checked_add(total_selection)
            .and_then(|t| t.checked_add(total_interaction))
            .ok_or_else(|| overflow("attribution totals"))?;
        let active_return = portfolio_return
            .checked_sub(benchmark_return)
            .ok_or_else(|| overflow("active return"))?;

        debug!(
            "Attribution over {} sectors: allocation {}, selection {}, interaction {}",
            sectors.len(),
            total_allocation,
            total_selection,
            total_interaction
        );

        Ok(AttributionResult {
            portfolio_return,
            benchmark_return,
            active_return,
            total_allocation_effect: total_allocation,
            total_selection_effect: total_selection,
            total_interaction_effect: total_interaction,
            total_attribution,
            sectors,
        })
    }
}
