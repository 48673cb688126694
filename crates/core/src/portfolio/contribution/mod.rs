//! Position-level contribution to portfolio return.

mod contribution_model;
mod contribution_service;

pub use contribution_model::*;
pub use contribution_service::*;

#[cfg(test)]
mod contribution_service_tests;
