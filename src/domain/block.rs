//! Report block location.
//!
//! A COT text dump is a long run of per-market tables. Each table carries an
//! "Open Interest is" statement; the market name sits on the (wrapped) lines
//! right above it and the category rows follow below.

/// Case-insensitive phrase marking one market table.
pub const ANCHOR: &str = "OPEN INTEREST IS";

/// Lines above the anchor joined into the header.
pub const HEADER_LINES: usize = 3;

/// Lines captured per block, starting one line above the anchor.
pub const BLOCK_WINDOW: usize = 61;

/// One market table cut out of a report source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlock {
    pub header: String,
    pub raw_text: String,
}

impl ReportBlock {
    pub fn lines(&self) -> Vec<&str> {
        self.raw_text.lines().collect()
    }
}

/// Single-pass iterator over the blocks of one report text.
///
/// Blocks come out in document order. A block's window is cut short where the
/// next block's window begins, so no line belongs to two blocks.
pub struct BlockLocator<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
    floor: usize,
}

impl<'a> BlockLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            cursor: 0,
            floor: 0,
        }
    }

    fn is_anchor(line: &str) -> bool {
        line.to_uppercase().contains(ANCHOR)
    }

    fn next_anchor(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&i| Self::is_anchor(self.lines[i]))
    }

    fn header(&self, anchor: usize) -> String {
        let first = anchor.saturating_sub(HEADER_LINES);
        self.lines[first..anchor]
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

impl Iterator for BlockLocator<'_> {
    type Item = ReportBlock;

    fn next(&mut self) -> Option<ReportBlock> {
        let anchor = self.next_anchor(self.cursor)?;
        let start = anchor.saturating_sub(1).max(self.floor);

        let mut end = (start + BLOCK_WINDOW).min(self.lines.len());
        if let Some(following) = self.next_anchor(anchor + 1) {
            end = end.min(following.saturating_sub(1).max(anchor + 1));
        }
        self.cursor = anchor + 1;
        self.floor = end;

        Some(ReportBlock {
            header: self.header(anchor),
            raw_text: self.lines[start..end].join("\n"),
        })
    }
}

/// Locate every report block in `text`.
pub fn locate_blocks(text: &str) -> BlockLocator<'_> {
    BlockLocator::new(text)
}
