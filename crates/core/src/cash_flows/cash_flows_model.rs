//! Cash flow domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Descriptive kind of a cash movement.
///
/// The kind is metadata only. Calculations route on [`CashFlowCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowType {
    // Returns earned by the portfolio's assets
    Dividend,
    DividendReinvested,
    BondCoupon,
    InterestEarned,
    RealizedGainLoss,
    ManagementFee,
    CustodyFee,
    TransactionCost,
    TaxWithholding,
    TaxReclaim,
    ForeignExchangeGainLoss,

    // Client-driven capital movements
    ClientContribution,
    ClientWithdrawal,
    IncomeDistribution,
    TransferIn,
    TransferOut,
    ReturnOfCapital,
    CapitalCall,
    PerformanceFeePayment,
    EstimatedTaxPayment,

    // Bookkeeping inside the portfolio
    InternalTransfer,
    CashSweep,
    SettlementAdjustment,
    AccruedInterestAdjustment,
}

impl CashFlowType {
    /// Conventional category for this kind.
    ///
    /// Upstream producers use this when assigning a category. The engine
    /// itself never reclassifies a flow.
    pub fn default_category(&self) -> CashFlowCategory {
        match self {
            CashFlowType::Dividend
            | CashFlowType::DividendReinvested
            | CashFlowType::BondCoupon
            | CashFlowType::InterestEarned
            | CashFlowType::RealizedGainLoss
            | CashFlowType::ManagementFee
            | CashFlowType::CustodyFee
            | CashFlowType::TransactionCost
            | CashFlowType::TaxWithholding
            | CashFlowType::TaxReclaim
            | CashFlowType::ForeignExchangeGainLoss => CashFlowCategory::PerformanceInfluencing,

            CashFlowType::ClientContribution
            | CashFlowType::ClientWithdrawal
            | CashFlowType::IncomeDistribution
            | CashFlowType::TransferIn
            | CashFlowType::TransferOut
            | CashFlowType::ReturnOfCapital
            | CashFlowType::CapitalCall
            | CashFlowType::PerformanceFeePayment
            | CashFlowType::EstimatedTaxPayment => CashFlowCategory::ExternalFlow,

            CashFlowType::InternalTransfer
            | CashFlowType::CashSweep
            | CashFlowType::SettlementAdjustment
            | CashFlowType::AccruedInterestAdjustment => CashFlowCategory::Internal,
        }
    }
}

/// Treatment of a flow in return calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowCategory {
    /// Client capital crossing the portfolio boundary; breaks the period
    ExternalFlow,
    /// Income or cost earned by the assets; stays in the return numerator
    PerformanceInfluencing,
    /// Accounting movement with no effect on measured performance
    Internal,
}

/// A dated cash movement. Positive amounts are inflows, negative are outflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: CashFlowType,
    pub category: CashFlowCategory,
    #[serde(default)]
    pub description: String,
}

impl CashFlow {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        kind: CashFlowType,
        category: CashFlowCategory,
    ) -> Self {
        Self {
            date,
            amount,
            kind,
            category,
            description: String::new(),
        }
    }

    /// Builds a flow whose category is the kind's conventional one.
    pub fn with_default_category(date: NaiveDate, amount: Decimal, kind: CashFlowType) -> Self {
        Self::new(date, amount, kind, kind.default_category())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Reported view of a performance flow attached to a sub-period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: CashFlowType,
    pub description: String,
}

impl From<&CashFlow> for CashFlowSummary {
    fn from(flow: &CashFlow) -> Self {
        Self {
            date: flow.date,
            amount: flow.amount,
            kind: flow.kind,
            description: flow.description.clone(),
        }
    }
}
