use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Failed to serialize structured data: {0}")]
    Serialization(#[from] serde_json::Error),
}
