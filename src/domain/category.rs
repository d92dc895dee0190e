//! Trader categories and positional decoding of category rows.
//!
//! Every numeric row of a COT table is a flat sequence. Position, change and
//! percentage rows hold one `(long, short, spread)` triplet per category;
//! the trader-count row holds one value per category. [`CATEGORY_LAYOUT`]
//! spells the offsets out so the schema can be checked in one place.

use crate::domain::analytics::{CategoryAnalytics, CategoryFigures};
use crate::domain::error::CotError;
use crate::domain::row::CategoryRows;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Non-Commercial")]
    NonCommercial,
    Commercial,
    Spreading,
    Total,
    Nonreportable,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NonCommercial => "Non-Commercial",
            Self::Commercial => "Commercial",
            Self::Spreading => "Spreading",
            Self::Total => "Total",
            Self::Nonreportable => "Nonreportable",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where one category's values sit in the flat rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySlot {
    pub category: Category,
    /// Index of the long value in the position, change and percentage rows.
    pub position_offset: usize,
    /// Index of the count in the trader row.
    pub trader_offset: usize,
}

/// Width of a `(long, short, spread)` triplet.
pub const TRIPLET_WIDTH: usize = 3;

pub const CATEGORY_LAYOUT: [CategorySlot; 5] = [
    CategorySlot {
        category: Category::NonCommercial,
        position_offset: 0,
        trader_offset: 0,
    },
    CategorySlot {
        category: Category::Commercial,
        position_offset: 3,
        trader_offset: 1,
    },
    CategorySlot {
        category: Category::Spreading,
        position_offset: 6,
        trader_offset: 2,
    },
    CategorySlot {
        category: Category::Total,
        position_offset: 9,
        trader_offset: 3,
    },
    CategorySlot {
        category: Category::Nonreportable,
        position_offset: 12,
        trader_offset: 4,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChanges {
    #[serde(rename = "long_chg")]
    pub long: i64,
    #[serde(rename = "short_chg")]
    pub short: i64,
    #[serde(rename = "spread_chg")]
    pub spread: i64,
}

/// Share of open interest held long and short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestShare {
    #[serde(rename = "long_pct")]
    pub long: Option<f64>,
    #[serde(rename = "short_pct")]
    pub short: Option<f64>,
}

/// One decoded trader category with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "group")]
    pub category: Category,
    pub long: i64,
    pub short: i64,
    pub spread: i64,
    pub traders: Option<i64>,
    pub analysis: CategoryAnalytics,
    pub changes: PositionChanges,
    pub percentages: OpenInterestShare,
}

fn triplet(row: &[i64], offset: usize) -> Option<(i64, i64, i64)> {
    match row.get(offset..offset + TRIPLET_WIDTH)? {
        [a, b, c] => Some((*a, *b, *c)),
        _ => None,
    }
}

impl CategorySlot {
    /// Decode this slot from `rows`, or `None` when its position or change
    /// triplet is incomplete.
    ///
    /// Missing percentages or trader counts read as `None`. Errors only when
    /// the derived metrics overflow.
    pub fn decode(
        &self,
        rows: &CategoryRows,
        open_interest: Option<i64>,
    ) -> Result<Option<CategoryRecord>, CotError> {
        let Some((long, short, spread)) = triplet(&rows.positions, self.position_offset) else {
            return Ok(None);
        };
        let Some((long_chg, short_chg, spread_chg)) = triplet(&rows.changes, self.position_offset)
        else {
            return Ok(None);
        };
        let changes = PositionChanges {
            long: long_chg,
            short: short_chg,
            spread: spread_chg,
        };
        let percentages = OpenInterestShare {
            long: rows.percentages.get(self.position_offset).copied(),
            short: rows.percentages.get(self.position_offset + 1).copied(),
        };
        let traders = rows.traders.get(self.trader_offset).copied();

        let figures = CategoryFigures {
            long,
            short,
            long_change: changes.long,
            short_change: changes.short,
            traders,
        };

        Ok(Some(CategoryRecord {
            category: self.category,
            long,
            short,
            spread,
            traders,
            analysis: CategoryAnalytics::compute(&figures, open_interest)?,
            changes,
            percentages,
        }))
    }
}

/// Decode every category whose position and change triplets are present, in
/// layout order.
///
/// Each slot is attempted independently: a short row drops the trailing
/// categories only.
pub fn decode_categories(
    rows: &CategoryRows,
    open_interest: Option<i64>,
) -> Result<Vec<CategoryRecord>, CotError> {
    let mut records = Vec::with_capacity(CATEGORY_LAYOUT.len());
    for slot in &CATEGORY_LAYOUT {
        if let Some(record) = slot.decode(rows, open_interest)? {
            records.push(record);
        }
    }
    Ok(records)
}
