//! Hex subject decoding.

use bsonspec_codec::RawDocument;

use crate::error::{HarnessError, HarnessResult};

/// Decoded bytes of a corpus subject, checked to be a well-formed document.
///
/// The buffer owns the bytes; views from [`Subject::document`] borrow it and
/// cannot outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    bytes: Vec<u8>,
}

impl Subject {
    /// Decode a hex string into a structurally valid document buffer.
    ///
    /// Every character must be consumed as part of a two-digit pair, and the
    /// bytes must form one complete document. Either failure is a fixture
    /// error.
    pub fn decode(hex_subject: &str) -> HarnessResult<Self> {
        let bytes = hex::decode(hex_subject).map_err(|e| {
            HarnessError::fixture(format!(
                "subject is not a hex string ({} chars): {e}",
                hex_subject.len()
            ))
        })?;
        RawDocument::from_bytes(&bytes)
            .map_err(|e| HarnessError::fixture(format!("subject is not a valid document: {e}")))?;
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrowed view over the decoded bytes.
    ///
    /// A view cannot be stored next to the buffer it borrows, so the
    /// structural check from [`Subject::decode`] runs again here. It cannot
    /// fail for a `Subject`.
    pub fn document(&self) -> HarnessResult<RawDocument<'_>> {
        RawDocument::from_bytes(&self.bytes)
            .map_err(|e| HarnessError::fixture(format!("subject is not a valid document: {e}")))
    }
}
