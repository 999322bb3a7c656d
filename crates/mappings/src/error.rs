//! Error types for the mappings crate

use backport_core::BackportError;

/// Mapping-load error types.
///
/// All of these happen while a version-pair module activates and are fatal
/// for that pair; nothing here occurs on the translation path.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// File I/O error while reading a document
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    /// A document or table does not have the shape its layout requires
    #[error("Malformed mapping data: {0}")]
    Malformed(String),

    /// A table marked required is absent from a source document
    #[error("Missing required table: {0}")]
    MissingTable(String),
}

impl From<MappingError> for BackportError {
    fn from(err: MappingError) -> Self {
        BackportError::Mapping(err.to_string())
    }
}

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;
