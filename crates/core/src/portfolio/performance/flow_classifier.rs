//! Flow classification for performance calculation.
//!
//! Maps a cash flow's recorded category to the role it plays in TWR.
//! Only the category is consulted; the flow kind is descriptive metadata.

use crate::cash_flows::{CashFlow, CashFlowCategory};

/// Computational role of a cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowRole {
    /// External capital movement.
    /// Closes the current sub-period and opens a new one.
    Breaking,

    /// Income or cost earned by the assets.
    /// Stays inside its sub-period and is netted out of the return.
    Performance,

    /// Internal bookkeeping.
    /// Excluded from the calculation entirely.
    Ignored,
}

/// Classify a category.
pub fn classify_category(category: CashFlowCategory) -> FlowRole {
    match category {
        CashFlowCategory::ExternalFlow => FlowRole::Breaking,
        CashFlowCategory::PerformanceInfluencing => FlowRole::Performance,
        CashFlowCategory::Internal => FlowRole::Ignored,
    }
}

/// Classify a flow by its category.
pub fn classify_flow(flow: &CashFlow) -> FlowRole {
    classify_category(flow.category)
}

/// Check if a flow defines a sub-period boundary
pub fn is_breaking_flow(flow: &CashFlow) -> bool {
    classify_flow(flow) == FlowRole::Breaking
}

/// Check if a flow is netted out of its sub-period's return
pub fn is_performance_flow(flow: &CashFlow) -> bool {
    classify_flow(flow) == FlowRole::Performance
}
