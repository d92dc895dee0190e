//! Concrete adapter implementations for ports.

pub mod cache_dir_adapter;
pub mod file_config_adapter;
#[cfg(feature = "fetch")]
pub mod http_fetch_adapter;
pub mod html_pre;
pub mod json_report_adapter;
pub mod symbols_json_adapter;
