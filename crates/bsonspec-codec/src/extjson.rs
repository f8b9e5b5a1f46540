//! Canonical extended JSON rendering and reading.
//!
//! Rendering is compact and deterministic: no whitespace, keys in document
//! order, one spelling per value. Two documents render to the same text
//! exactly when they hold the same typed values in the same order, so text
//! equality is the comparison the harness relies on.
//!
//! | Type | Rendering |
//! |------|-----------|
//! | int32 | bare integer |
//! | int64 | `{"$numberLong":"<n>"}` |
//! | double | `{"$numberDouble":"<repr>"}` |
//! | decimal128 | `{"$numberDecimal":"<canonical string>"}` |
//! | string, bool, null | JSON literal |
//! | document, array | JSON object, array |

use serde_json::{Map, Number, Value as JsonValue};

use crate::decimal128::Decimal128;
use crate::document::{Document, Value};
use crate::error::{CodecError, CodecResult};

/// Render a document to canonical extended JSON.
pub fn to_canonical_json(doc: &Document) -> String {
    let mut out = String::with_capacity(64);
    write_document(doc, &mut out);
    out
}

fn write_document(doc: &Document, out: &mut String) {
    out.push('{');
    for (i, (key, value)) in doc.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_json_string(key, out);
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Int32(v) => out.push_str(&v.to_string()),
        Value::Int64(v) => write_wrapper("$numberLong", &v.to_string(), out),
        Value::Double(v) => write_wrapper("$numberDouble", &double_repr(*v), out),
        Value::Decimal128(v) => write_wrapper("$numberDecimal", &v.to_string(), out),
        Value::String(s) => write_json_string(s, out),
        Value::Boolean(v) => out.push_str(if *v { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
        Value::Document(doc) => write_document(doc, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
    }
}

fn write_wrapper(key: &str, text: &str, out: &mut String) {
    out.push('{');
    write_json_string(key, out);
    out.push(':');
    write_json_string(text, out);
    out.push('}');
}

fn write_json_string(s: &str, out: &mut String) {
    out.push_str(&JsonValue::String(s.to_string()).to_string());
}

fn double_repr(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v.is_sign_negative() {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        }
    } else {
        format!("{v:?}")
    }
}

fn parse_double(text: &str) -> CodecResult<f64> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse()
            .map_err(|_| CodecError::extjson(format!("invalid $numberDouble {text:?}"))),
    }
}

/// Build a document from parsed extended JSON.
///
/// Plain JSON maps naturally (objects keep their key order, integers that fit
/// 32 bits become int32, larger ones int64, fractions double). The wrappers
/// `$numberInt`, `$numberLong`, `$numberDouble` and `$numberDecimal` select a
/// type explicitly.
pub fn document_from_extjson(value: &JsonValue) -> CodecResult<Document> {
    match value {
        JsonValue::Object(map) => document_from_map(map),
        other => Err(CodecError::extjson(format!(
            "expected a JSON object, found {}",
            json_kind(other)
        ))),
    }
}

fn document_from_map(map: &Map<String, JsonValue>) -> CodecResult<Document> {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.push(key.clone(), value_from_extjson(value)?);
    }
    Ok(doc)
}

fn value_from_extjson(value: &JsonValue) -> CodecResult<Value> {
    Ok(match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(v) => Value::Boolean(*v),
        JsonValue::Number(n) => number_value(n)?,
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(
            items
                .iter()
                .map(value_from_extjson)
                .collect::<CodecResult<_>>()?,
        ),
        JsonValue::Object(map) => match wrapped_value(map)? {
            Some(v) => v,
            None => Value::Document(document_from_map(map)?),
        },
    })
}

fn number_value(n: &Number) -> CodecResult<Value> {
    if let Some(v) = n.as_i64() {
        return Ok(i32::try_from(v).map_or(Value::Int64(v), Value::Int32));
    }
    n.as_f64()
        .map(Value::Double)
        .ok_or_else(|| CodecError::extjson(format!("number {n} is out of range")))
}

fn wrapped_value(map: &Map<String, JsonValue>) -> CodecResult<Option<Value>> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some((key, inner)) = map.iter().next() else {
        return Ok(None);
    };
    let text = || {
        inner
            .as_str()
            .ok_or_else(|| CodecError::extjson(format!("{key} expects a string value")))
    };

    let value = match key.as_str() {
        "$numberInt" => {
            let text = text()?;
            Value::Int32(
                text.parse()
                    .map_err(|_| CodecError::extjson(format!("invalid $numberInt {text:?}")))?,
            )
        }
        "$numberLong" => {
            let text = text()?;
            Value::Int64(
                text.parse()
                    .map_err(|_| CodecError::extjson(format!("invalid $numberLong {text:?}")))?,
            )
        }
        "$numberDouble" => Value::Double(parse_double(text()?)?),
        "$numberDecimal" => {
            let text = text()?;
            // NaN is a rendering, not a numeric literal the parser accepts.
            if text == "NaN" {
                Value::Decimal128(Decimal128::NAN)
            } else {
                Value::Decimal128(Decimal128::parse(text)?)
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
