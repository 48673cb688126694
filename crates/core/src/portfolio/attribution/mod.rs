//! Brinson-Fachler return attribution against a benchmark.

mod attribution_model;
mod attribution_service;

pub use attribution_model::*;
pub use attribution_service::*;
