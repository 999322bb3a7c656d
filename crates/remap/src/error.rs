//! Error types for the remap crate

use backport_core::BackportError;

use crate::types::FieldType;

/// Message-scoped remap failures.
///
/// Any of these abort the one message being translated. The surrounding
/// connection and other in-flight messages are unaffected; the caller
/// drops the message and carries on.
#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    /// The input ended inside a field
    #[error("Not enough bytes for {0:?}")]
    ShortRead(FieldType),

    /// A VarInt ran past its five-byte limit
    #[error("VarInt wider than five bytes")]
    VarIntTooLong,

    /// Undecodable field content
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A value's kind does not match the declared field type
    #[error("Type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: FieldType,
        actual: FieldType,
    },

    /// No written field of the requested type at the index
    #[error("No {ty:?} written at index {index}")]
    NoSuchField { ty: FieldType, index: usize },
}

impl From<RemapError> for BackportError {
    fn from(err: RemapError) -> Self {
        BackportError::Remap(err.to_string())
    }
}

/// Result type for remap operations
pub type Result<T> = std::result::Result<T, RemapError>;
