use thiserror::Error;

pub type TableResult<T> = Result<T, TableError>;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Duplicate reference table: {0}")]
    DuplicateTable(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
