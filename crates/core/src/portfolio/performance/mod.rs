mod annualizer;
mod flow_classifier;
pub mod performance_model;
pub mod performance_service;
mod sub_period_builder;
mod twr_calculator;

pub use annualizer::{annualize, annualize_with};
pub use flow_classifier::{
    classify_category, classify_flow, is_breaking_flow, is_performance_flow, FlowRole,
};
pub use performance_model::*;
pub use performance_service::*;
pub use sub_period_builder::build_sub_periods;
pub use twr_calculator::{calculate as calculate_twr, chain_link};
