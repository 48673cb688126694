use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cash_flows::{CashFlow, CashFlowSummary};
use crate::errors::{PerformanceError, Result, ValidationError};
use crate::portfolio::valuation::ValuationPoint;
use crate::utils::time_utils::days_between;

/// Reporting window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = crate::errors::Error;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end }.into());
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Days elapsed from start to end; zero for a single-day range.
    pub fn elapsed_days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Calendar days covered, counting both ends.
    pub fn inclusive_days(&self) -> i64 {
        self.elapsed_days() + 1
    }
}

/// Values bounding one sub-period and the performance flows netted out of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPeriod {
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub net_flow: Decimal,
}

impl SubPeriod {
    pub fn new(start_value: Decimal, end_value: Decimal, net_flow: Decimal) -> Self {
        Self {
            start_value,
            end_value,
            net_flow,
        }
    }

    /// `(end - start - net_flow) / start`, or zero when there is no positive base.
    ///
    /// Fails with `NumericOverflow` when the quotient leaves the `Decimal` range,
    /// as happens with a near-zero start value.
    pub fn return_rate(&self) -> Result<Decimal> {
        if self.start_value <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        self.end_value
            .checked_sub(self.start_value)
            .and_then(|gain| gain.checked_sub(self.net_flow))
            .and_then(|gain| gain.checked_div(self.start_value))
            .ok_or_else(|| PerformanceError::overflow("sub-period return").into())
    }
}

/// A sub-period as produced by the builder, before its return is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPeriodSpan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sub_period: SubPeriod,
    pub performance_flows: Vec<CashFlow>,
}

impl SubPeriodSpan {
    pub fn days(&self) -> i64 {
        days_between(self.start_date, self.end_date)
    }

    pub fn is_zero_length(&self) -> bool {
        self.start_date == self.end_date
    }
}

/// Reported sub-period with its computed return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPeriodResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    #[serde(flatten)]
    pub sub_period: SubPeriod,
    #[serde(rename = "return")]
    pub return_rate: Decimal,
    pub performance_flows: Vec<CashFlowSummary>,
    pub total_performance_flow: Decimal,
}

/// Time-weighted return over a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwrResult {
    pub period: DateRange,
    pub total_return: Decimal,
    /// None when the window has no elapsed days or the total return is below -100%
    pub annualized_return: Option<Decimal>,
    pub sub_periods: Vec<SubPeriodResult>,
    pub external_flow_count: usize,
    pub performance_flow_count: usize,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub total_days: i64,
}

/// One account's inputs for a batch TWR run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwrRequest {
    pub id: String,
    pub valuations: Vec<ValuationPoint>,
    pub cash_flows: Vec<CashFlow>,
    pub period: DateRange,
}
