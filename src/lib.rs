//! cotreport: Commitment of Traders report parser and sentiment analytics.
//!
//! Hexagonal architecture: parsing and analytics in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], command line in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
