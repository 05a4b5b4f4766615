use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Key: {0}")]
    InvalidKey(String),

    #[error("Invalid Configuration: {0}")]
    InvalidConfig(String),

    #[error("Resource Unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type CfResult<T> = Result<T, CipherForgeError>;
