//! Owned documents, element values and wire encoding.

use crate::decimal128::Decimal128;
use crate::error::{CodecError, CodecResult};

/// Element type tags understood by this codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Double,
    String,
    Document,
    Array,
    Boolean,
    Null,
    Int32,
    Int64,
    Decimal128,
}

impl ElementType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::Document,
            0x04 => Self::Array,
            0x08 => Self::Boolean,
            0x0a => Self::Null,
            0x10 => Self::Int32,
            0x12 => Self::Int64,
            0x13 => Self::Decimal128,
            _ => return None,
        })
    }

    pub fn tag(self) -> u8 {
        match self {
            Self::Double => 0x01,
            Self::String => 0x02,
            Self::Document => 0x03,
            Self::Array => 0x04,
            Self::Boolean => 0x08,
            Self::Null => 0x0a,
            Self::Int32 => 0x10,
            Self::Int64 => 0x12,
            Self::Decimal128 => 0x13,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::String => "string",
            Self::Document => "document",
            Self::Array => "array",
            Self::Boolean => "bool",
            Self::Null => "null",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Decimal128 => "decimal128",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An owned element value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    String(String),
    Document(Document),
    Array(Vec<Value>),
    Boolean(bool),
    Null,
    Int32(i32),
    Int64(i64),
    Decimal128(Decimal128),
}

impl Value {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Double(_) => ElementType::Double,
            Self::String(_) => ElementType::String,
            Self::Document(_) => ElementType::Document,
            Self::Array(_) => ElementType::Array,
            Self::Boolean(_) => ElementType::Boolean,
            Self::Null => ElementType::Null,
            Self::Int32(_) => ElementType::Int32,
            Self::Int64(_) => ElementType::Int64,
            Self::Decimal128(_) => ElementType::Decimal128,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<Decimal128> for Value {
    fn from(v: Decimal128) -> Self {
        Self::Decimal128(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Self::Document(v)
    }
}

/// An insertion-ordered document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document holding exactly one field.
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            entries: vec![(key.into(), value.into())],
        }
    }

    /// Insert a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append a field, keeping any earlier field with the same key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First field named `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode to the wire format.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut out = Vec::with_capacity(64);
        encode_document(self.iter(), &mut out)?;
        Ok(out)
    }
}

fn encode_document<'a>(
    entries: impl Iterator<Item = (&'a str, &'a Value)>,
    out: &mut Vec<u8>,
) -> CodecResult<()> {
    let start = out.len();
    out.extend_from_slice(&[0; 4]);
    for (key, value) in entries {
        out.push(value.element_type().tag());
        write_cstring(key, out)?;
        encode_value(value, out)?;
    }
    out.push(0);
    patch_length(start, out)
}

fn encode_value(value: &Value, out: &mut Vec<u8>) -> CodecResult<()> {
    match value {
        Value::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::String(s) => {
            let len = i32::try_from(s.len() + 1)
                .map_err(|_| CodecError::malformed(out.len(), "string too long to encode"))?;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        Value::Document(doc) => encode_document(doc.iter(), out)?,
        Value::Array(items) => {
            let keys: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
            encode_document(keys.iter().map(String::as_str).zip(items.iter()), out)?;
        }
        Value::Boolean(v) => out.push(u8::from(*v)),
        Value::Null => {}
        Value::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Decimal128(v) => out.extend_from_slice(&v.to_le_bytes()),
    }
    Ok(())
}

fn write_cstring(key: &str, out: &mut Vec<u8>) -> CodecResult<()> {
    if key.as_bytes().contains(&0) {
        return Err(CodecError::malformed(
            out.len(),
            format!("key {key:?} contains a NUL byte"),
        ));
    }
    out.extend_from_slice(key.as_bytes());
    out.push(0);
    Ok(())
}

fn patch_length(start: usize, out: &mut [u8]) -> CodecResult<()> {
    let len = i32::try_from(out.len() - start)
        .map_err(|_| CodecError::malformed(start, "document too long to encode"))?;
    out[start..start + 4].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_duplicate_keys_and_insert_replaces() {
        let mut doc = Document::new();
        doc.push("i", 1_i32);
        doc.push("i", 2_i32);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("i"), Some(&Value::Int32(1)));

        doc.insert("i", 3_i32);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("i"), Some(&Value::Int32(3)));
    }

    #[test]
    fn encodes_single_int32_field() {
        let bytes = Document::single("i", 42_i32).to_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), "0c0000001069002a00000000");
    }

    #[test]
    fn encodes_single_bool_field() {
        let bytes = Document::single("b", true).to_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), "090000000862000100");
    }

    #[test]
    fn encodes_decimal128_low_word_first() {
        let d = Decimal128::parse("1").unwrap();
        let bytes = Document::single("d", d).to_bytes().unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "180000001364000100000000000000000000000000403000"
        );
    }

    #[test]
    fn encodes_nested_array_with_index_keys() {
        let mut doc = Document::new();
        doc.insert("a", Value::Array(vec![Value::Int32(1), Value::Null]));
        let bytes = doc.to_bytes().unwrap();
        // outer(4) a-elem: tag(1) "a\0"(2) inner: len(4) "0"int32(1+2+4) "1"null(1+2) term(1) ; term(1)
        assert_eq!(bytes.len(), 4 + 3 + 4 + 7 + 3 + 1 + 1);
        assert_eq!(bytes[0] as usize, bytes.len());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut doc = Document::new();
        doc.insert("x", 1_i32);
        doc.insert("y", 2_i32);
        doc.insert("x", 3_i32);
        let keys: Vec<&str> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["x", "y"]);
        assert_eq!(doc.get("x"), Some(&Value::Int32(3)));
    }

    #[test]
    fn rejects_key_with_nul() {
        let err = Document::single("a\0b", 1_i32).to_bytes().unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }));
    }
}
