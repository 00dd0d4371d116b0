//! # Bullion Core Types
//!
//! The shared vocabulary of the workspace: price series, exchange-rate tables,
//! news records, the metals snapshot and the trend classification. As the
//! bottom layer it depends on no other workspace crate.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Trend;
pub use error::CoreError;
pub use structs::{
    BASE_CURRENCY, MIN_SERIES_LEN, MetalsDocument, MetalsSnapshot, NewsItem, PriceSeries, RateTable,
};
