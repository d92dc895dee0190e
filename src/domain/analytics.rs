//! Sentiment metrics derived from one trader category.
//!
//! Thresholds are fixed business rules. Comparisons are strict where noted:
//! a ratio of exactly 0.30 is `medium`, exactly 0.15 is `low`.

use crate::domain::error::CotError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_ALERT_RATIO: f64 = 0.30;
pub const MEDIUM_ALERT_RATIO: f64 = 0.15;
pub const NORMAL_DENSITY_TRADERS: i64 = 20;
pub const HIGH_DENSITY_TRADERS: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dominance {
    Bullish,
    Bearish,
    Neutral,
}

impl Dominance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }

    pub fn from_net(net: i64) -> Self {
        match net.signum() {
            1 => Self::Bullish,
            -1 => Self::Bearish,
            _ => Self::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// A missing ratio is never an alert.
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio.map(f64::abs) {
            Some(r) if r > HIGH_ALERT_RATIO => Self::High,
            Some(r) if r > MEDIUM_ALERT_RATIO => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraderDensity {
    Low,
    Normal,
    High,
}

impl TraderDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    pub fn from_traders(traders: Option<i64>) -> Self {
        match traders {
            Some(n) if n >= HIGH_DENSITY_TRADERS => Self::High,
            Some(n) if n >= NORMAL_DENSITY_TRADERS => Self::Normal,
            _ => Self::Low,
        }
    }
}

macro_rules! lowercase_display {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

lowercase_display!(Dominance, AlertLevel, TraderDensity);

/// Round to four decimal places, ties to even on the exact binary value.
pub fn round4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// `net / open_interest` rounded to 4 places; `None` without a usable denominator.
pub fn net_ratio(net: i64, open_interest: Option<i64>) -> Option<f64> {
    match open_interest {
        Some(oi) if oi != 0 => Some(round4(net as f64 / oi as f64)),
        _ => None,
    }
}

fn difference(field: &'static str, left: i64, right: i64) -> Result<i64, CotError> {
    left.checked_sub(right).ok_or(CotError::Overflow { field, left, right })
}

/// The inputs [`CategoryAnalytics::compute`] reads from a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFigures {
    pub long: i64,
    pub short: i64,
    pub long_change: i64,
    pub short_change: i64,
    pub traders: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalytics {
    pub net: i64,
    pub net_change: i64,
    pub net_ratio: Option<f64>,
    pub dominance: Dominance,
    pub alert_level: AlertLevel,
    pub trader_density: TraderDensity,
}

impl CategoryAnalytics {
    /// Fails only when a difference does not fit in an `i64`.
    pub fn compute(
        figures: &CategoryFigures,
        open_interest: Option<i64>,
    ) -> Result<Self, CotError> {
        let net = difference("net", figures.long, figures.short)?;
        let net_change = difference("net_change", figures.long_change, figures.short_change)?;
        let net_ratio = net_ratio(net, open_interest);
        Ok(Self {
            net,
            net_change,
            net_ratio,
            dominance: Dominance::from_net(net),
            alert_level: AlertLevel::from_ratio(net_ratio),
            trader_density: TraderDensity::from_traders(figures.traders),
        })
    }
}
