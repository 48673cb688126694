//! Valuation domain models.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{PerformanceError, Result, ValidationError};

/// Total marked-to-market value of an account or position on a date.
///
/// Values are already currency-normalized by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

impl ValuationPoint {
    pub fn new(date: NaiveDate, value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::NegativeValuation { date, value }.into());
        }
        Ok(Self { date, value })
    }
}

/// A date-ordered valuation series.
///
/// Points sharing a date keep their input order. A producer that records
/// both a pre-flow and a post-flow snapshot on a boundary date lists the
/// pre-flow snapshot first: sub-period ends resolve to the earliest point on
/// a date and sub-period starts to the latest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationSeries {
    points: Vec<ValuationPoint>,
}

impl ValuationSeries {
    /// Builds a series, reordering by date when the input is unsorted.
    pub fn new(mut points: Vec<ValuationPoint>) -> Self {
        if !points.windows(2).all(|w| w[0].date <= w[1].date) {
            debug!(
                "Valuation series of {} points was not in date order; sorting",
                points.len()
            );
            points.sort_by_key(|p| p.date);
        }
        Self { points }
    }

    pub fn points(&self) -> &[ValuationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest point dated on or before `date`.
    pub fn at_or_before(&self, date: NaiveDate) -> Option<&ValuationPoint> {
        let idx = self.points.partition_point(|p| p.date <= date);
        idx.checked_sub(1).map(|i| &self.points[i])
    }

    /// Earliest point dated on or after `date`.
    pub fn at_or_after(&self, date: NaiveDate) -> Option<&ValuationPoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        self.points.get(idx)
    }

    /// Value opening a sub-period that starts on `date`.
    ///
    /// Prefers the latest point on or before the date and falls back to the
    /// earliest point after it.
    pub fn start_value(&self, date: NaiveDate) -> Result<Decimal> {
        self.at_or_before(date)
            .or_else(|| self.at_or_after(date))
            .map(|p| p.value)
            .ok_or_else(|| Self::no_data(date))
    }

    /// Value closing a sub-period that ends on `date`.
    ///
    /// Prefers the earliest point on or after the date and falls back to the
    /// latest point before it.
    pub fn end_value(&self, date: NaiveDate) -> Result<Decimal> {
        self.at_or_after(date)
            .or_else(|| self.at_or_before(date))
            .map(|p| p.value)
            .ok_or_else(|| Self::no_data(date))
    }

    fn no_data(date: NaiveDate) -> crate::errors::Error {
        PerformanceError::insufficient_data(format!(
            "no valuation available to resolve boundary {}",
            date
        ))
        .into()
    }
}

impl From<Vec<ValuationPoint>> for ValuationSeries {
    fn from(points: Vec<ValuationPoint>) -> Self {
        Self::new(points)
    }
}
