//! Cash flow records consumed by the performance engine.

mod cash_flows_model;

pub use cash_flows_model::*;
