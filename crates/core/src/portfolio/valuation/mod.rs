//! Valuation series consumed by the performance engine.

mod valuation_model;

pub use valuation_model::*;
