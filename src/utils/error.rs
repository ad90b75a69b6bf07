// src/utils/error.rs
use thiserror::Error;

// Failures of the extraction pipeline itself. Field-level misses never end up here.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not parse document: {0}")]
    DocumentParseError(String), // Input bytes are not a readable PDF

    #[error("Could not extract contract data: {0}")]
    ExtractionError(String), // Text was read but no recognizable structure was found
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Server error: {0}")]
    Server(String),
}
