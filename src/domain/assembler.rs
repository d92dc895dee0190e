//! Report assembly: run every source through the block pipeline and collect
//! the resulting market entries into a [`SymbolReport`].
//!
//! Sources are parsed one at a time, each to completion. Failures are
//! contained: a malformed block or an unreadable source is logged and left
//! out, never propagated.

use crate::domain::block::locate_blocks;
use crate::domain::block_parser::parse_block;
use crate::domain::market::{header_matches, MarketEntry, SymbolReport, FULL_REPORT_SYMBOL};
use crate::domain::symbol::SymbolMapping;
use crate::ports::source_port::SourcePort;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

/// Which blocks of a source become entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketFilter<'a> {
    /// Blocks whose header contains the report name; kept even without categories.
    ReportName(&'a str),
    /// Every block that decodes at least one category.
    All,
}

/// Outcome of an assembly run. `NoData` is an expected result, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    Report(SymbolReport),
    NoData,
}

impl Assembly {
    pub fn report(self) -> Option<SymbolReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Entries of one source's report text, in document order.
pub fn entries_from_text(source_id: &str, text: &str, filter: MarketFilter<'_>) -> Vec<MarketEntry> {
    let mut entries = Vec::new();

    for block in locate_blocks(text) {
        if let MarketFilter::ReportName(name) = filter {
            if !header_matches(&block.header, name) {
                continue;
            }
        }

        let entry = match parse_block(&block, source_id) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(source = source_id, market = %block.header, "skipping block: {e}");
                continue;
            }
        };

        if filter == MarketFilter::All && entry.groups.is_empty() {
            debug!(source = source_id, market = %entry.market, "no categories decoded");
            continue;
        }
        if let MarketFilter::ReportName(name) = filter {
            info!(source = source_id, "found block for {name}");
        }
        entries.push(entry);
    }

    entries
}

/// Entries across every source of `sources`, in source order then document order.
pub fn collect_entries(sources: &dyn SourcePort, filter: MarketFilter<'_>) -> Vec<MarketEntry> {
    let refs = match sources.sources() {
        Ok(refs) => refs,
        Err(e) => {
            warn!("cannot list report sources: {e}");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for source in &refs {
        let text = match sources.load_text(source) {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!(source = %source.id, location = %source.location, "no preformatted report region");
                continue;
            }
            Err(e) => {
                warn!(source = %source.id, "skipping source: {e}");
                continue;
            }
        };
        entries.extend(entries_from_text(&source.id, &text, filter));
    }
    entries
}

/// Wrap `entries` into a report stamped `collected_at`, or `NoData` when empty.
pub fn assemble(symbol: &str, entries: Vec<MarketEntry>, collected_at: NaiveDateTime) -> Assembly {
    if entries.is_empty() {
        return Assembly::NoData;
    }
    Assembly::Report(SymbolReport {
        symbol: symbol.to_string(),
        collected_at,
        entries,
    })
}

/// Report for one symbol: every entry whose market header contains its report name.
pub fn assemble_symbol(
    sources: &dyn SourcePort,
    mapping: &SymbolMapping,
    collected_at: NaiveDateTime,
) -> Assembly {
    let entries = collect_entries(sources, MarketFilter::ReportName(&mapping.report_name));
    assemble(&mapping.symbol, entries, collected_at)
}

/// Report over every market of every source.
pub fn assemble_full(sources: &dyn SourcePort, collected_at: NaiveDateTime) -> Assembly {
    let entries = collect_entries(sources, MarketFilter::All);
    assemble(FULL_REPORT_SYMBOL, entries, collected_at)
}
