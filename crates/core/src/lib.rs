//! TWR Core - Time-weighted return, contribution and risk analytics.
//!
//! This crate holds the pure calculation engine: valuation series and cash
//! flows go in, chain-linked returns and their breakdowns come out. It has no
//! storage or network dependencies; callers own persistence and transport.

pub mod cash_flows;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod settings;
pub mod utils;

// Re-export the calculation surface
pub use cash_flows::*;
pub use portfolio::*;
pub use settings::PerformanceConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
