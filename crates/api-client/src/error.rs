use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to perform the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The server answered with status {0}: {1}")]
    Status(u16, String),

    #[error("Failed to deserialize the document: {0}")]
    Deserialization(String),

    #[error("Invalid data format from source: {0}")]
    InvalidData(String),
}
