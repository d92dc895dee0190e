//! Symbol-to-report-name lookup port trait.

use crate::domain::error::CotError;
use crate::domain::symbol::SymbolMapping;

pub trait SymbolPort {
    /// Every configured symbol key.
    fn symbols(&self) -> Vec<String>;

    /// Resolve a user-supplied symbol or alias to its report name.
    fn resolve(&self, symbol: &str) -> Result<SymbolMapping, CotError>;
}
