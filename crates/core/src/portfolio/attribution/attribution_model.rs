use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A security's weight and period return within a portfolio or benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionHolding {
    pub security: String,
    pub sector: String,
    pub weight: Decimal,
    pub return_rate: Decimal,
}

impl AttributionHolding {
    pub fn new(
        security: impl Into<String>,
        sector: impl Into<String>,
        weight: Decimal,
        return_rate: Decimal,
    ) -> Self {
        Self {
            security: security.into(),
            sector: sector.into(),
            weight,
            return_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAttribution {
    pub sector: String,
    pub portfolio_weight: Decimal,
    pub benchmark_weight: Decimal,
    pub portfolio_return: Decimal,
    pub benchmark_return: Decimal,
    pub allocation_effect: Decimal,
    pub selection_effect: Decimal,
    pub interaction_effect: Decimal,
}

impl SectorAttribution {
    pub fn total_effect(&self) -> Decimal {
        self.allocation_effect + self.selection_effect + self.interaction_effect
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResult {
    pub portfolio_return: Decimal,
    pub benchmark_return: Decimal,
    pub active_return: Decimal,
    pub total_allocation_effect: Decimal,
    pub total_selection_effect: Decimal,
    pub total_interaction_effect: Decimal,
    pub total_attribution: Decimal,
    pub sectors: Vec<SectorAttribution>,
}
