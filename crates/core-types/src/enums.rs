use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse net direction of a series, from its first to its last point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Upward,
    Downward,
    Stable,
}

impl Trend {
    /// Classifies the move from `first` to `last`.
    ///
    /// Equality is exact: no tolerance is applied, so `Stable` is only
    /// reported when both prices are bit-for-bit the same value.
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            Trend::Upward
        } else if last < first {
            Trend::Downward
        } else {
            Trend::Stable
        }
    }

    /// An arrow glyph for compact terminal output.
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Upward => "▲",
            Trend::Downward => "▼",
            Trend::Stable => "■",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Upward => "Upward",
            Trend::Downward => "Downward",
            Trend::Stable => "Stable",
        };
        f.write_str(label)
    }
}
