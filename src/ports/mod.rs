//! Port traits at the external boundaries.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
