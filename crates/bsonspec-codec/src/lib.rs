//! Minimal binary document codec.
//!
//! This crate provides the codec surface the conformance harness drives:
//!
//! - [`RawDocument`]: a structurally checked, zero-copy view over encoded bytes
//!   with field lookup and type-tag introspection
//! - typed accessors for int32, bool and decimal128 elements
//! - [`Document::single`] for single-field documents, plus wire encoding
//! - [`to_canonical_json`] and [`document_from_extjson`] for canonical text
//! - [`Decimal128`] parsing and rendering, with NaN as the poison value
//!
//! It is deliberately narrow: only the element types listed on
//! [`ElementType`] are understood, and anything else is a structural error.
//!
//! ```
//! use bsonspec_codec::{to_canonical_json, RawDocument};
//!
//! let bytes = [0x0c, 0, 0, 0, 0x10, b'i', 0, 42, 0, 0, 0, 0];
//! let doc = RawDocument::from_bytes(&bytes).unwrap();
//! assert_eq!(doc.get("i").and_then(|e| e.as_i32()), Some(42));
//! assert_eq!(to_canonical_json(&doc.to_document()), r#"{"i":42}"#);
//! ```

pub mod decimal128;
pub mod document;
pub mod error;
pub mod extjson;
pub mod raw;

pub use decimal128::{Decimal128, ParseDecimalError};
pub use document::{Document, ElementType, Value};
pub use error::{CodecError, CodecResult};
pub use extjson::{document_from_extjson, to_canonical_json};
pub use raw::{RawDocument, RawElement, RawIter};
