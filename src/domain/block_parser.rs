//! Turn one located report block into a [`MarketEntry`].

use crate::domain::block::ReportBlock;
use crate::domain::category::decode_categories;
use crate::domain::error::CotError;
use crate::domain::market::{Concentration, MarketEntry};
use crate::domain::row::{CategoryRows, RowNumber};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static OPEN_INTEREST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Open Interest is\s+([\d,]+)").expect("valid open interest regex")
});

static LARGEST_TRADERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Percent of Open Interest Held by the Largest (\d) Traders.*?: ([\d\.]+)% Long, ([\d\.]+)% Short",
    )
    .expect("valid largest traders regex")
});

/// Open interest from the first "Open Interest is N" statement.
pub fn open_interest(lines: &[&str]) -> Result<Option<i64>, CotError> {
    for line in lines {
        if let Some(caps) = OPEN_INTEREST.captures(line) {
            let token = &caps[1];
            return i64::parse_token(token)
                .map(Some)
                .ok_or_else(|| CotError::MalformedNumber {
                    token: token.to_string(),
                    kind: i64::KIND,
                });
        }
    }
    Ok(None)
}

/// Concentration ratios keyed by trader count. Later lines for the same count win.
pub fn largest_traders(lines: &[&str]) -> Result<BTreeMap<String, Concentration>, CotError> {
    let mut largest = BTreeMap::new();
    for line in lines {
        let Some(caps) = LARGEST_TRADERS.captures(line) else {
            continue;
        };
        let percent = |token: &str| {
            f64::parse_token(token).ok_or_else(|| CotError::MalformedNumber {
                token: token.to_string(),
                kind: f64::KIND,
            })
        };
        largest.insert(
            caps[1].to_string(),
            Concentration {
                long: percent(&caps[2])?,
                short: percent(&caps[3])?,
            },
        );
    }
    Ok(largest)
}

/// Parse `block` into an entry tagged with `source_id`.
///
/// Missing rows shrink the entry; only a numeric token that cannot be
/// converted fails the block.
pub fn parse_block(block: &ReportBlock, source_id: &str) -> Result<MarketEntry, CotError> {
    let lines = block.lines();
    let open_interest = open_interest(&lines)?;
    let rows = CategoryRows::extract(&lines)?;

    Ok(MarketEntry {
        market: block.header.clone(),
        open_interest,
        source: source_id.to_string(),
        largest_traders: largest_traders(&lines)?,
        groups: decode_categories(&rows, open_interest)?,
    })
}
