use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Series lengths differ: left has {left} points, right has {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
