use crate::stats::WindowedStats;
use chrono::{DateTime, Utc};
use core_types::Trend;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the dashboard shows about a single metal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalReport {
    pub metal: String,
    pub latest_usd: f64,
    pub previous_usd: f64,
    /// Latest price in the display currency, rounded to cents.
    pub latest_converted: Decimal,
    pub percent_change: Option<f64>, // Option<> because a zero first price has no change
    pub trend: Trend,
    pub volatility: f64,
    pub window: WindowedStats,
}

/// Why a correlation coefficient could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedCorrelation {
    /// At least one history never moves.
    ZeroVariance,
    /// The histories have different lengths and are never truncated.
    LengthMismatch,
    /// Fewer than two paired points.
    NotEnoughData,
    InvalidInput,
}

impl std::fmt::Display for UndefinedCorrelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UndefinedCorrelation::ZeroVariance => write!(f, "zero variance"),
            UndefinedCorrelation::LengthMismatch => write!(f, "unequal histories"),
            UndefinedCorrelation::NotEnoughData => write!(f, "not enough data"),
            UndefinedCorrelation::InvalidInput => write!(f, "invalid input"),
        }
    }
}

/// Pearson correlation between two metals' full histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub left: String,
    pub right: String,
    pub coefficient: Option<f64>,
    /// Set exactly when `coefficient` is `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<UndefinedCorrelation>,
}

/// The output of one dashboard refresh.
///
/// Built by the `AnalyticsEngine` from a `DashboardContext` and discarded on
/// the next refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    /// The multiplier applied to USD prices for `currency`.
    pub rate: f64,
    pub metals: Vec<MetalReport>,
    pub correlations: Vec<CorrelationEntry>,
}

impl DashboardReport {
    pub fn metal(&self, name: &str) -> Option<&MetalReport> {
        self.metals.iter().find(|m| m.metal.eq_ignore_ascii_case(name))
    }

    /// Metals whose volatility exceeds `threshold_pct`.
    pub fn volatile_metals(&self, threshold_pct: f64) -> impl Iterator<Item = &MetalReport> {
        self.metals.iter().filter(move |m| m.volatility > threshold_pct)
    }
}
