//! Core parsing and analytics: from raw COT report text to market entries.

pub mod analytics;
pub mod assembler;
pub mod block;
pub mod block_parser;
pub mod category;
pub mod error;
pub mod market;
pub mod row;
pub mod symbol;
