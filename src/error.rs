use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Export Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Missing Input: {0}")]
    MissingInput(String),
}

pub type RpResult<T> = Result<T, ReportError>;
