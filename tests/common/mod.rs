#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use cotreport::domain::error::CotError;
use cotreport::domain::market::SymbolReport;
use cotreport::ports::report_port::ReportSink;
use cotreport::ports::source_port::{SourcePort, SourceRef};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory sources, listed in insertion order.
pub struct MockSourcePort {
    pub pages: Vec<(String, Option<String>)>,
    pub errors: HashMap<String, String>,
}

impl MockSourcePort {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_text(mut self, id: &str, text: &str) -> Self {
        self.pages.push((id.to_string(), Some(text.to_string())));
        self
    }

    /// A page with no `<pre>` region.
    pub fn without_pre(mut self, id: &str) -> Self {
        self.pages.push((id.to_string(), None));
        self
    }

    pub fn with_error(mut self, id: &str, reason: &str) -> Self {
        self.pages.push((id.to_string(), None));
        self.errors.insert(id.to_string(), reason.to_string());
        self
    }
}

impl SourcePort for MockSourcePort {
    fn sources(&self) -> Result<Vec<SourceRef>, CotError> {
        Ok(self
            .pages
            .iter()
            .map(|(id, _)| SourceRef {
                id: id.clone(),
                location: format!("mock://{id}"),
            })
            .collect())
    }

    fn load_text(&self, source: &SourceRef) -> Result<Option<String>, CotError> {
        if let Some(reason) = self.errors.get(&source.id) {
            return Err(CotError::Source {
                source_id: source.id.clone(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .pages
            .iter()
            .find(|(id, _)| *id == source.id)
            .and_then(|(_, text)| text.clone()))
    }
}

/// Collects written reports instead of touching the filesystem.
pub struct MemorySink {
    pub written: RefCell<Vec<SymbolReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.written.borrow().iter().map(|r| r.symbol.clone()).collect()
    }
}

impl ReportSink for MemorySink {
    fn write(&self, report: &SymbolReport) -> Result<String, CotError> {
        self.written.borrow_mut().push(report.clone());
        Ok(format!("memory://{}", report.file_name()))
    }
}

pub fn collected_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 4)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// Numeric rows of one market block, written out in report layout.
pub struct BlockFixture {
    pub market: String,
    pub open_interest: Option<String>,
    pub positions: Vec<i64>,
    pub changes: Vec<i64>,
    pub percentages: Vec<f64>,
    pub traders: Vec<i64>,
    pub largest: Vec<(u8, f64, f64)>,
}

impl BlockFixture {
    pub fn new(market: &str) -> Self {
        Self {
            market: market.to_string(),
            open_interest: None,
            positions: Vec::new(),
            changes: Vec::new(),
            percentages: Vec::new(),
            traders: Vec::new(),
            largest: Vec::new(),
        }
    }

    pub fn open_interest(mut self, oi: &str) -> Self {
        self.open_interest = Some(oi.to_string());
        self
    }

    pub fn positions(mut self, values: &[i64]) -> Self {
        self.positions = values.to_vec();
        self
    }

    pub fn changes(mut self, values: &[i64]) -> Self {
        self.changes = values.to_vec();
        self
    }

    pub fn percentages(mut self, values: &[f64]) -> Self {
        self.percentages = values.to_vec();
        self
    }

    pub fn traders(mut self, values: &[i64]) -> Self {
        self.traders = values.to_vec();
        self
    }

    pub fn largest(mut self, n: u8, long: f64, short: f64) -> Self {
        self.largest.push((n, long, short));
        self
    }

    pub fn render(&self) -> String {
        let row = |values: Vec<String>| format!(":  {}", values.join("   "));
        let ints = |values: &[i64]| row(values.iter().map(i64::to_string).collect());

        let mut lines = vec![
            self.market.clone(),
            "FUTURES ONLY POSITIONS AS OF 07/01/25".to_string(),
            ":".to_string(),
        ];
        let oi = self.open_interest.as_deref().unwrap_or("");
        if self.open_interest.is_some() {
            lines.push(format!("CFTC Code #000000          Open Interest is {oi:>10}"));
        } else {
            lines.push("CFTC Code #000000          OPEN INTEREST IS NOT REPORTED".to_string());
        }
        lines.push(": Positions".to_string());
        lines.push(ints(&self.positions));
        lines.push(":".to_string());
        lines.push(": Changes from:      June 24, 2025".to_string());
        lines.push(ints(&self.changes));
        lines.push(": Percent of Open Interest Represented by Each Category of Trader".to_string());
        lines.push(row(self.percentages.iter().map(f64::to_string).collect()));
        lines.push(": Number of Traders in Each Category".to_string());
        lines.push(ints(&self.traders));
        lines.push(":".to_string());
        lines.push(":".to_string());
        lines.push(":".to_string());
        for (n, long, short) in &self.largest {
            lines.push(format!(
                ": Percent of Open Interest Held by the Largest {n} Traders (Gross): {long}% Long, {short}% Short"
            ));
        }
        lines.join("\n")
    }
}

/// A full report page text made of `blocks`, separated by filler lines.
pub fn report_text(blocks: &[BlockFixture]) -> String {
    let mut text = String::from("Commitments of Traders - Futures Only, July 1, 2025\n:\n");
    for block in blocks {
        text.push_str(&block.render());
        text.push_str("\n:\n:\n");
    }
    text
}

pub fn euro_fx() -> BlockFixture {
    BlockFixture::new("EURO FX - CHICAGO MERCANTILE EXCHANGE")
        .open_interest("10,000")
        .positions(&[-500, 1000, 200, 300, -100, 50, 10, 20, 30, 4000, 3000, 100, 70, 80, 5])
        .changes(&[25, -10, 5, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
        .percentages(&[10.5, 20.0, 1.0, 3.0, 1.0, 0.5, 0.1, 0.2, 0.3, 40.0, 30.0, 1.0, 0.7, 0.8, 0.05])
        .traders(&[19, 20, 49, 50, 0])
        .largest(4, 22.5, 31.0)
        .largest(8, 35.1, 44.9)
}

pub fn japanese_yen() -> BlockFixture {
    BlockFixture::new("JAPANESE YEN - CHICAGO MERCANTILE EXCHANGE")
        .open_interest("200,000")
        .positions(&[70000, 10000, 500, 20000, 90000, 0, 1, 2, 3, 95000, 100000, 500, 5000, 0, 0])
        .changes(&[1500, -200, 0, -100, 900, 0, 0, 0, 0, 1400, 700, 0, 100, 0, 0])
        .percentages(&[35.0, 5.0, 0.3, 10.0, 45.0, 0.0, 0.0, 0.0, 0.0, 47.5, 50.0, 0.3, 2.5, 0.0, 0.0])
        .traders(&[60, 25])
}

/// Header and anchor only; decodes to no categories.
pub fn wheat_without_rows() -> BlockFixture {
    BlockFixture::new("WHEAT-SRW - CHICAGO BOARD OF TRADE").open_interest("350,123")
}

pub const SYMBOLS_JSON: &str = r#"{
    "EUR/USD": {
        "aliases": ["EURUSD", "EUR-USD"],
        "cot": { "report_name": "EURO FX" },
        "exchanges": ["OANDA"]
    },
    "USD/JPY": {
        "aliases": ["USDJPY"],
        "cot": { "report_name": "JAPANESE YEN" }
    },
    "XAU/USD": {
        "aliases": ["GOLD"],
        "cot": { "report_name": "GOLD - COMMODITY EXCHANGE" }
    },
    "BTC/USD": {
        "aliases": ["BTCUSD"],
        "cot": {}
    }
}"#;
