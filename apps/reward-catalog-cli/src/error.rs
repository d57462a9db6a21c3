use reward_catalog::{CatalogError, RegistryError};
use reward_catalog_tables::TableError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reference table error: {0}")]
    Table(#[from] TableError),

    #[error("Schema registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Catalog build failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
