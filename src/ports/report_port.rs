//! Report persistence port trait.

use crate::domain::error::CotError;
use crate::domain::market::SymbolReport;

/// Port for persisting assembled reports.
pub trait ReportSink {
    /// Persist `report`, returning where it went.
    fn write(&self, report: &SymbolReport) -> Result<String, CotError>;
}
