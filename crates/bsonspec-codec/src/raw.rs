//! Borrowed, structurally checked views over encoded documents.
//!
//! A [`RawDocument`] never copies: it borrows the caller's buffer, so the
//! borrow checker keeps every view and element inside the buffer's lifetime.
//! Construction validates the whole tree once; lookups and iteration after
//! that are infallible.

use crate::decimal128::Decimal128;
use crate::document::{Document, ElementType, Value};
use crate::error::{CodecError, CodecResult};

const MIN_DOCUMENT_LEN: usize = 5;
const MAX_NESTING_DEPTH: usize = 100;

/// A validated document view over borrowed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDocument<'a> {
    bytes: &'a [u8],
}

impl<'a> RawDocument<'a> {
    /// View `bytes` as a document after checking its structure.
    pub fn from_bytes(bytes: &'a [u8]) -> CodecResult<Self> {
        validate_document(bytes, 0, 0)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn iter(&self) -> RawIter<'a> {
        RawIter {
            doc: self.bytes,
            pos: 4,
        }
    }

    /// First element named `key`.
    pub fn get(&self, key: &str) -> Option<RawElement<'a>> {
        self.iter().find(|element| element.key == key)
    }

    /// Copy the view into an owned [`Document`].
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for element in self.iter() {
            doc.push(element.key, element.to_value());
        }
        doc
    }
}

/// One element of a [`RawDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawElement<'a> {
    key: &'a str,
    element_type: ElementType,
    value: &'a [u8],
}

impl<'a> RawElement<'a> {
    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.element_type {
            ElementType::Int32 => self.value.try_into().ok().map(i32::from_le_bytes),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.element_type {
            ElementType::Int64 => self.value.try_into().ok().map(i64::from_le_bytes),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.element_type {
            ElementType::Double => self.value.try_into().ok().map(f64::from_le_bytes),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.element_type {
            ElementType::Boolean => self.value.first().map(|b| *b != 0),
            _ => None,
        }
    }

    pub fn as_decimal128(&self) -> Option<Decimal128> {
        match self.element_type {
            ElementType::Decimal128 => self.value.try_into().ok().map(Decimal128::from_le_bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.element_type {
            ElementType::String => {
                let text = self.value.get(4..self.value.len().checked_sub(1)?)?;
                std::str::from_utf8(text).ok()
            }
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<RawDocument<'a>> {
        match self.element_type {
            ElementType::Document | ElementType::Array => Some(RawDocument { bytes: self.value }),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self.element_type {
            ElementType::Double => self.as_f64().map_or(Value::Null, Value::Double),
            ElementType::String => self
                .as_str()
                .map_or(Value::Null, |s| Value::String(s.to_string())),
            ElementType::Document => self
                .as_document()
                .map_or(Value::Null, |d| Value::Document(d.to_document())),
            ElementType::Array => self.as_document().map_or(Value::Null, |d| {
                Value::Array(d.iter().map(|e| e.to_value()).collect())
            }),
            ElementType::Boolean => self.as_bool().map_or(Value::Null, Value::Boolean),
            ElementType::Null => Value::Null,
            ElementType::Int32 => self.as_i32().map_or(Value::Null, Value::Int32),
            ElementType::Int64 => self.as_i64().map_or(Value::Null, Value::Int64),
            ElementType::Decimal128 => self.as_decimal128().map_or(Value::Null, Value::Decimal128),
        }
    }
}

/// Iterator over the elements of a [`RawDocument`].
#[derive(Debug, Clone)]
pub struct RawIter<'a> {
    doc: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for RawIter<'a> {
    type Item = RawElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + 1 >= self.doc.len() {
            return None;
        }
        let (element, next) = parse_element(self.doc, self.pos, 0).ok()?;
        self.pos = next;
        Some(element)
    }
}

fn validate_document(doc: &[u8], base: usize, depth: usize) -> CodecResult<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::malformed(base, "nesting too deep"));
    }
    if doc.len() < MIN_DOCUMENT_LEN {
        return Err(CodecError::malformed(
            base,
            format!("document is {} bytes, minimum is {MIN_DOCUMENT_LEN}", doc.len()),
        ));
    }
    let declared = read_i32(doc, 0).unwrap_or(-1);
    if usize::try_from(declared).ok() != Some(doc.len()) {
        return Err(CodecError::malformed(
            base,
            format!(
                "length prefix {declared} does not match {} available bytes",
                doc.len()
            ),
        ));
    }
    if doc[doc.len() - 1] != 0 {
        return Err(CodecError::malformed(
            base + doc.len() - 1,
            "missing document terminator",
        ));
    }

    let mut pos = 4;
    while pos < doc.len() - 1 {
        let (element, next) = parse_element(doc, pos, base)?;
        if let Some(nested) = element.as_document() {
            let offset = next - element.value.len();
            validate_document(nested.bytes, base + offset, depth + 1)?;
        }
        pos = next;
    }
    Ok(())
}

/// Parse the element starting at `pos`; returns it with the offset of the next one.
fn parse_element(doc: &[u8], pos: usize, base: usize) -> CodecResult<(RawElement<'_>, usize)> {
    let end = doc.len() - 1;
    let tag = doc[pos];
    let key_start = pos + 1;
    let key_len = doc[key_start..end]
        .iter()
        .position(|b| *b == 0)
        .ok_or_else(|| CodecError::malformed(base + key_start, "unterminated key"))?;
    let key = std::str::from_utf8(&doc[key_start..key_start + key_len])
        .map_err(|_| CodecError::malformed(base + key_start, "key is not valid UTF-8"))?;
    let element_type =
        ElementType::from_tag(tag).ok_or_else(|| CodecError::UnsupportedElementType {
            tag,
            key: key.to_string(),
        })?;

    let value_start = key_start + key_len + 1;
    let rest = &doc[value_start..end];
    let value_len = value_length(element_type, rest, base + value_start)?;
    let value = &rest[..value_len];
    check_value(element_type, value, base + value_start)?;

    Ok((
        RawElement {
            key,
            element_type,
            value,
        },
        value_start + value_len,
    ))
}

fn value_length(element_type: ElementType, rest: &[u8], offset: usize) -> CodecResult<usize> {
    let len = match element_type {
        ElementType::Double | ElementType::Int64 => 8,
        ElementType::Int32 => 4,
        ElementType::Decimal128 => 16,
        ElementType::Boolean => 1,
        ElementType::Null => 0,
        ElementType::String => {
            let declared = read_i32(rest, 0)
                .ok_or_else(|| CodecError::malformed(offset, "truncated string length"))?;
            if declared < 1 {
                return Err(CodecError::malformed(
                    offset,
                    format!("string length {declared} is not positive"),
                ));
            }
            4 + declared as usize
        }
        ElementType::Document | ElementType::Array => {
            let declared = read_i32(rest, 0)
                .ok_or_else(|| CodecError::malformed(offset, "truncated embedded length"))?;
            if declared < MIN_DOCUMENT_LEN as i32 {
                return Err(CodecError::malformed(
                    offset,
                    format!("embedded document length {declared} is too small"),
                ));
            }
            declared as usize
        }
    };
    if len > rest.len() {
        return Err(CodecError::malformed(
            offset,
            format!(
                "{element_type} value needs {len} bytes, {} remain",
                rest.len()
            ),
        ));
    }
    Ok(len)
}

fn check_value(element_type: ElementType, value: &[u8], offset: usize) -> CodecResult<()> {
    match element_type {
        ElementType::Boolean if value[0] > 1 => Err(CodecError::malformed(
            offset,
            format!("invalid boolean byte 0x{:02x}", value[0]),
        )),
        ElementType::String => {
            let text = &value[4..value.len() - 1];
            if value.last() != Some(&0) {
                return Err(CodecError::malformed(offset, "string is not NUL-terminated"));
            }
            std::str::from_utf8(text)
                .map(|_| ())
                .map_err(|_| CodecError::malformed(offset, "string is not valid UTF-8"))
        }
        _ => Ok(()),
    }
}

fn read_i32(bytes: &[u8], at: usize) -> Option<i32> {
    let window = bytes.get(at..at + 4)?;
    window.try_into().ok().map(i32::from_le_bytes)
}
