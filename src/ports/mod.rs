//! Port traits at the I/O seams of the parsing core.

pub mod config_port;
pub mod report_port;
pub mod source_port;
pub mod symbol_port;
