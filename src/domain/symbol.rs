//! Symbol selection: which COT market name a trading symbol maps to.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Keyword selecting every configured symbol.
pub const ALL_SYMBOLS: &str = "ALL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CotMapping {
    pub report_name: Option<String>,
}

/// One entry of the symbols configuration. Unrelated keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SymbolInfo {
    #[serde(default)]
    pub aliases: Vec<String>,
    pub cot: Option<CotMapping>,
}

impl SymbolInfo {
    pub fn report_name(&self) -> Option<&str> {
        self.cot
            .as_ref()
            .and_then(|c| c.report_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

/// A symbol resolved to the market name its COT entries are selected by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMapping {
    pub symbol: String,
    pub report_name: String,
}

/// `eur-usd`, `eur usd` → `EUR/USD`.
pub fn normalize_symbol(input: &str) -> String {
    input.trim().replace(['-', ' '], "/").to_uppercase()
}

/// Find the configured key for `symbol`, matching the key itself or a normalized alias.
pub fn find_symbol<'a>(
    symbols: &'a BTreeMap<String, SymbolInfo>,
    symbol: &str,
) -> Option<(&'a String, &'a SymbolInfo)> {
    let wanted = normalize_symbol(symbol);
    symbols.iter().find(|(key, info)| {
        **key == wanted || info.aliases.iter().any(|a| normalize_symbol(a) == wanted)
    })
}

/// Split a `--symbol` argument into the symbols to process.
///
/// `ALL` (any case) expands to every configured key.
pub fn select_symbols(input: &str, configured: &[String]) -> Vec<String> {
    let requested: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if requested.iter().any(|s| s.eq_ignore_ascii_case(ALL_SYMBOLS)) {
        return configured.to_vec();
    }
    requested.into_iter().map(normalize_symbol).collect()
}
