//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod ticker;
pub mod parameters;
pub mod comparison;
pub mod dashboard;
pub mod controller;
pub mod config_validation;
pub mod error;
