//! Error types for the document codec.

use crate::decimal128::ParseDecimalError;

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The byte buffer is not a structurally valid document.
    #[error("malformed document at offset {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// An element carries a type tag outside the supported set.
    #[error("unsupported element type 0x{tag:02x} for key {key:?}")]
    UnsupportedElementType { tag: u8, key: String },

    /// Extended JSON input cannot be mapped onto a document.
    #[error("invalid extended JSON: {message}")]
    InvalidExtJson { message: String },

    /// A decimal128 literal was rejected by the parser.
    #[error(transparent)]
    Decimal(#[from] ParseDecimalError),
}

impl CodecError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn extjson(message: impl Into<String>) -> Self {
        Self::InvalidExtJson {
            message: message.into(),
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
