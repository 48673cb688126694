//! Risk statistics over a valuation series.

mod risk_model;
mod risk_service;

pub use risk_model::*;
pub use risk_service::*;
