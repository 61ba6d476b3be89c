//! Port traits (hexagonal architecture boundaries).

pub mod config_port;
pub mod data_port;
pub mod dividend_port;
pub mod rate_port;
