//! Table row extraction from loosely aligned report text.
//!
//! COT tables put a section label ("Positions", "Changes from", ...) on one
//! line and the numbers on one of the lines that follow, with blank or
//! decorative lines in between depending on the report flavour. [`best_row`]
//! picks the most number-dense line out of a small lookahead window.

use crate::domain::error::CotError;
use regex::Regex;
use std::sync::LazyLock;

/// Lines examined after the label line.
pub const DEFAULT_LOOKAHEAD: usize = 3;

pub const POSITIONS: &str = "Positions";
pub const CHANGES: &str = "Changes from";
pub const PERCENT_OF_OI: &str = "Percent of Open Interest";
pub const NUMBER_OF_TRADERS: &str = "Number of Traders";

/// Optional sign, a digit, then any run of digits, thousands separators or dots.
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d[\d,\.]*").expect("valid number regex"));

/// Numeric tokens in `line`, left to right, as written.
pub fn number_tokens(line: &str) -> impl Iterator<Item = &str> {
    NUMBER_TOKEN.find_iter(line).map(|m| m.as_str())
}

pub fn count_numbers(line: &str) -> usize {
    NUMBER_TOKEN.find_iter(line).count()
}

/// Return the line most likely to hold the row labelled `phrase`.
///
/// The first line containing `phrase` (case-insensitive) is the label; up to
/// `lookahead` following lines are candidates and the one with the most
/// numeric tokens wins, earliest on ties. An empty string means the row is
/// absent, either because the label never appears or because no candidate
/// carries a number.
pub fn best_row<'a>(lines: &[&'a str], phrase: &str, lookahead: usize) -> &'a str {
    let needle = phrase.to_uppercase();
    let Some(label) = lines
        .iter()
        .position(|line| line.to_uppercase().contains(&needle))
    else {
        return "";
    };

    let mut best = "";
    let mut max_count = 0;
    for candidate in lines.iter().skip(label + 1).take(lookahead) {
        let count = count_numbers(candidate);
        if count > max_count {
            best = candidate;
            max_count = count;
        }
    }
    best
}

/// A number type a table row can be decoded into.
pub trait RowNumber: Sized {
    const KIND: &'static str;

    fn parse_token(token: &str) -> Option<Self>;
}

impl RowNumber for i64 {
    const KIND: &'static str = "integer";

    fn parse_token(token: &str) -> Option<Self> {
        token.replace(',', "").parse().ok()
    }
}

impl RowNumber for f64 {
    const KIND: &'static str = "decimal";

    fn parse_token(token: &str) -> Option<Self> {
        token.replace(',', "").parse().ok()
    }
}

/// Parse every numeric token of `line` as `T`.
///
/// A token that matches the number pattern but does not convert (e.g. `1.5`
/// read as an integer) fails the whole row.
pub fn parse_numbers<T: RowNumber>(line: &str) -> Result<Vec<T>, CotError> {
    number_tokens(line)
        .map(|token| {
            T::parse_token(token).ok_or_else(|| CotError::MalformedNumber {
                token: token.to_string(),
                kind: T::KIND,
            })
        })
        .collect()
}

/// The four numeric rows a category table is decoded from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryRows {
    pub positions: Vec<i64>,
    pub changes: Vec<i64>,
    pub percentages: Vec<f64>,
    pub traders: Vec<i64>,
}

impl CategoryRows {
    pub fn extract(lines: &[&str]) -> Result<Self, CotError> {
        Ok(Self {
            positions: parse_numbers(best_row(lines, POSITIONS, DEFAULT_LOOKAHEAD))?,
            changes: parse_numbers(best_row(lines, CHANGES, DEFAULT_LOOKAHEAD))?,
            percentages: parse_numbers(best_row(lines, PERCENT_OF_OI, DEFAULT_LOOKAHEAD))?,
            traders: parse_numbers(best_row(lines, NUMBER_OF_TRADERS, DEFAULT_LOOKAHEAD))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_sign_and_separators() {
        let tokens: Vec<_> = number_tokens(":  -1,250   300.5  abc 7").collect();
        assert_eq!(tokens, vec!["-1,250", "300.5", "7"]);
    }

    #[test]
    fn best_row_picks_densest_candidate() {
        let lines = vec![
            ": Positions",
            ":",
            ":  1  2  3",
            ":  1  2  3  4  5",
            ":  1  2  3  4  5  6",
        ];
        // Only three lines after the label are considered.
        assert_eq!(best_row(&lines, "Positions", 3), ":  1  2  3  4  5");
    }

    #[test]
    fn best_row_ties_keep_earliest() {
        let lines = vec!["POSITIONS", "a 1 2", "b 3 4", "c"];
        assert_eq!(best_row(&lines, "positions", 3), "a 1 2");
    }

    #[test]
    fn best_row_missing_phrase_is_empty() {
        let lines = vec!["Open Interest is 100", "1 2 3"];
        assert_eq!(best_row(&lines, "Number of Traders", 3), "");
    }

    #[test]
    fn best_row_no_numeric_candidate_is_empty() {
        let lines = vec!["Number of Traders", ":", "---", "none here"];
        assert_eq!(best_row(&lines, "Number of Traders", 3), "");
    }

    #[test]
    fn best_row_uses_first_label_only() {
        let lines = vec!["Positions", "", "", "", "Positions", "9 9 9 9"];
        assert_eq!(best_row(&lines, "Positions", 3), "");
    }

    #[test]
    fn best_row_label_at_end_has_no_candidates() {
        let lines = vec!["1 2 3", "Positions"];
        assert_eq!(best_row(&lines, "Positions", 3), "");
    }

    #[test]
    fn parse_integers_strip_thousands_separators() {
        let values: Vec<i64> = parse_numbers(":  250,100  -1,234   7").unwrap();
        assert_eq!(values, vec![250_100, -1_234, 7]);
    }

    #[test]
    fn parse_decimals() {
        let values: Vec<f64> = parse_numbers("  20.5  26.2  4").unwrap();
        assert_eq!(values, vec![20.5, 26.2, 4.0]);
    }

    #[test]
    fn parse_integer_rejects_decimal_token() {
        let err = parse_numbers::<i64>("10 1.5 20").unwrap_err();
        match err {
            CotError::MalformedNumber { token, kind } => {
                assert_eq!(token, "1.5");
                assert_eq!(kind, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_decimal_rejects_double_dot() {
        assert!(parse_numbers::<f64>("1.2.3").is_err());
    }

    #[test]
    fn parse_empty_line_is_empty_row() {
        let values: Vec<i64> = parse_numbers("").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn category_rows_extract_all_four() {
        let lines = vec![
            ": Positions",
            ":  10  20  30",
            ": Changes from:  June 24, 2025",
            ":  -1  2  0",
            ": Percent of Open Interest Represented by Each Category",
            ":  10.5  20.0  1.0",
            ": Number of Traders in Each Category",
            ":  12",
        ];
        let rows = CategoryRows::extract(&lines).unwrap();
        assert_eq!(rows.positions, vec![10, 20, 30]);
        assert_eq!(rows.changes, vec![-1, 2, 0]);
        assert_eq!(rows.percentages, vec![10.5, 20.0, 1.0]);
        assert_eq!(rows.traders, vec![12]);
    }
}
