use std::path::PathBuf;
use thiserror::Error;

use crate::model::{JobStatus, StoredDate};

#[derive(Error, Debug)]
pub enum JobDeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Job store error: {0}")]
    Store(#[from] StoreError),

    #[error("Import/export error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid logging setup: {message}")]
    Logging { message: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Database(#[from] crate::db::DatabaseError),

    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Job {id}: status cannot change from {from} to {to}")]
    IllegalTransition {
        id: String,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Job {id}: {later_field} ({later}) is earlier than {earlier_field} ({earlier})")]
    DateOrder {
        id: String,
        earlier_field: &'static str,
        earlier: StoredDate,
        later_field: &'static str,
        later: StoredDate,
    },

    #[error("An engineer named '{name}' already exists")]
    DuplicateEngineer { name: String },
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Import data is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Import data does not look like a job dashboard export: {errors}")]
    Schema { errors: String },

    #[error("Import data has an invalid '{collection}' list: {source}")]
    Collection {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize export document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Imported data could not be validated: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, JobDeskError>;
