//! Concrete adapter implementations for ports.

pub mod cached_data_port;
pub mod csv_adapter;
pub mod dividend_csv_adapter;
pub mod file_config_adapter;
pub mod indicator_table;
pub mod sgs_csv_adapter;
pub mod symbol_directory;
