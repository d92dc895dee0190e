//! JSON symbols configuration adapter.

use crate::domain::error::CotError;
use crate::domain::symbol::{find_symbol, normalize_symbol, SymbolInfo, SymbolMapping};
use crate::ports::symbol_port::SymbolPort;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub struct SymbolsJsonAdapter {
    symbols: BTreeMap<String, SymbolInfo>,
}

impl SymbolsJsonAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CotError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CotError::SymbolsConfig {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| CotError::SymbolsConfig {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            symbols: serde_json::from_str(json)?,
        })
    }

    pub fn info(&self, symbol: &str) -> Option<&SymbolInfo> {
        self.symbols.get(symbol)
    }
}

impl SymbolPort for SymbolsJsonAdapter {
    fn symbols(&self) -> Vec<String> {
        self.symbols.keys().cloned().collect()
    }

    fn resolve(&self, symbol: &str) -> Result<SymbolMapping, CotError> {
        let (key, info) = find_symbol(&self.symbols, symbol)
            .ok_or_else(|| CotError::UnknownSymbol(normalize_symbol(symbol)))?;
        let report_name = info
            .report_name()
            .ok_or_else(|| CotError::UnknownSymbol(key.clone()))?;
        Ok(SymbolMapping {
            symbol: key.clone(),
            report_name: report_name.to_string(),
        })
    }
}
