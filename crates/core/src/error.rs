//! Core error types for Backport

#[derive(thiserror::Error, Debug)]
pub enum BackportError {
    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Remap error: {0}")]
    Remap(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, BackportError>;
