//! # Bullion Analytics
//!
//! The computation layer behind the dashboard: descriptive statistics over a
//! price series, a range-based volatility figure, Pearson correlation between
//! two metals, currency conversion and the portfolio calculator.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Nothing here performs I/O. Every function borrows fully
//!   loaded inputs and returns a value or an `AnalyticsError`.
//! - **Explicit Context:** The dashboard pipeline receives a
//!   `DashboardContext` instead of reading shared globals, so one refresh can
//!   never observe half of another.
//! - **Independent Leaves:** The estimators do not depend on each other and
//!   can be evaluated in any order, or concurrently, per metal.
//!
//! ## Public API
//!
//! - `stats`, `volatility`, `correlation`, `currency`: the leaf estimators.
//! - `PortfolioQuote`: how many units a given amount buys.
//! - `AnalyticsEngine` / `DashboardReport`: the per-refresh pipeline.
//! - `AnalyticsError`: the specific error types returned by this crate.

pub mod correlation;
pub mod currency;
pub mod engine;
pub mod error;
pub mod portfolio;
pub mod report;
pub mod stats;
pub mod volatility;

// Re-export the key components to create a clean, public-facing API.
pub use correlation::correlation;
pub use currency::{convert, convert_series};
pub use engine::{AnalyticsEngine, DashboardContext};
pub use error::AnalyticsError;
pub use portfolio::PortfolioQuote;
pub use report::{CorrelationEntry, DashboardReport, MetalReport, UndefinedCorrelation};
pub use stats::{SeriesStats, WindowedStats, series_stats, windowed_stats};
pub use volatility::volatility;
