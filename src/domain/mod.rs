//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod period;
pub mod portfolio;
pub mod position;
pub mod signal;
pub mod simulator;
pub mod stats;
pub mod strategy;
