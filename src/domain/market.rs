//! Per-market entries and the per-symbol report they are collected into.

use crate::domain::category::CategoryRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Symbol used for the report over every market of every source.
pub const FULL_REPORT_SYMBOL: &str = "FULL";

/// Concentration of open interest among the N largest traders, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub long: f64,
    pub short: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub market: String,
    pub open_interest: Option<i64>,
    pub source: String,
    /// Keyed by trader count ("4", "8").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub largest_traders: BTreeMap<String, Concentration>,
    pub groups: Vec<CategoryRecord>,
}

/// Case-insensitive substring match of `report_name` against a market header.
pub fn header_matches(header: &str, report_name: &str) -> bool {
    header
        .to_uppercase()
        .contains(&report_name.to_uppercase())
}

impl MarketEntry {
    pub fn matches(&self, report_name: &str) -> bool {
        header_matches(&self.market, report_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub collected_at: NaiveDateTime,
    pub entries: Vec<MarketEntry>,
}

impl SymbolReport {
    /// `eurusd_cot.json` for `EUR/USD`; `full_cot_report.json` for the full report.
    pub fn file_name(&self) -> String {
        if self.symbol == FULL_REPORT_SYMBOL {
            "full_cot_report.json".to_string()
        } else {
            format!("{}_cot.json", self.symbol.to_lowercase().replace('/', ""))
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
