//! Per-type validators.
//!
//! The set is closed: each variant knows the field its corpus stores values
//! under, the element type it expects there, and how the expected scalar text
//! is compared. All variants share the same rebuild-and-compare tail.

use std::fmt;

use bsonspec_codec::{Document, ElementType, RawDocument, RawElement, Value};
use serde::Serialize;

use crate::compare::assert_canonical_eq;
use crate::error::{HarnessError, HarnessResult};
use crate::parse_error::check_decimal128_parse_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeValidator {
    Int32,
    Bool,
    Decimal128,
}

impl TypeValidator {
    pub const ALL: [Self; 3] = [Self::Int32, Self::Bool, Self::Decimal128];

    pub fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Bool => "bool",
            Self::Decimal128 => "decimal128",
        }
    }

    /// Field the corpus subjects store the typed value under.
    pub fn test_key(self) -> &'static str {
        match self {
            Self::Int32 => "i",
            Self::Bool => "b",
            Self::Decimal128 => "d",
        }
    }

    pub fn element_type(self) -> ElementType {
        match self {
            Self::Int32 => ElementType::Int32,
            Self::Bool => ElementType::Boolean,
            Self::Decimal128 => ElementType::Decimal128,
        }
    }

    /// Resolve a corpus `bson_type` tag such as `"0x10"`.
    pub fn from_bson_type(tag: &str) -> Option<Self> {
        let digits = tag
            .strip_prefix("0x")
            .or_else(|| tag.strip_prefix("0X"))?;
        let tag = u8::from_str_radix(digits, 16).ok()?;
        Self::ALL
            .into_iter()
            .find(|v| v.element_type().tag() == tag)
    }

    /// Resolve a validator by name; accepts the corpus file stems too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int32" => Some(Self::Int32),
            "bool" | "boolean" => Some(Self::Bool),
            "decimal128" => Some(Self::Decimal128),
            _ => None,
        }
    }

    /// Validate one decoded subject against its expectations.
    ///
    /// Returns the rebuilt single-field document on success.
    pub fn validate(
        self,
        decoded: &RawDocument<'_>,
        expected_text: &str,
        expected_doc: &Document,
    ) -> HarnessResult<Document> {
        let element = self.typed_field(decoded)?;
        let value = match self {
            Self::Int32 => {
                let actual = element.as_i32().ok_or_else(|| self.type_mismatch(Some(&element)))?;
                let expected: i32 = expected_text.parse().map_err(|e| {
                    HarnessError::fixture(format!("expected int32 text {expected_text:?}: {e}"))
                })?;
                if actual != expected {
                    return Err(HarnessError::mismatch("int32 value", expected, actual));
                }
                Value::Int32(actual)
            }
            Self::Bool => {
                let actual = element.as_bool().ok_or_else(|| self.type_mismatch(Some(&element)))?;
                let expected = match expected_text {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(HarnessError::mismatch(
                            "bool text",
                            "\"true\" or \"false\"",
                            format!("{other:?}"),
                        ))
                    }
                };
                if actual != expected {
                    return Err(HarnessError::mismatch("bool value", expected, actual));
                }
                Value::Boolean(actual)
            }
            Self::Decimal128 => {
                let actual = element
                    .as_decimal128()
                    .ok_or_else(|| self.type_mismatch(Some(&element)))?;
                let rendered = actual.to_string();
                if rendered != expected_text {
                    return Err(HarnessError::mismatch(
                        "decimal128 string",
                        format!("{expected_text:?}"),
                        format!("{rendered:?}"),
                    ));
                }
                Value::Decimal128(actual)
            }
        };

        let rebuilt = Document::single(self.test_key(), value);
        assert_canonical_eq(&rebuilt, expected_doc)?;
        Ok(rebuilt)
    }

    /// Require that `subject` is rejected by this type's text parser.
    pub fn check_parse_error(self, subject: &str) -> HarnessResult<()> {
        let accepted = match self {
            Self::Decimal128 => return check_decimal128_parse_error(subject),
            Self::Int32 => subject.parse::<i32>().ok().map(|v| v.to_string()),
            Self::Bool => matches!(subject, "true" | "false").then(|| subject.to_string()),
        };
        match accepted {
            Some(value) => Err(HarnessError::ParseErrorExpectationViolated {
                subject: subject.to_string(),
                message: format!("parsed successfully as {} {value}", self.name()),
            }),
            None => Ok(()),
        }
    }

    fn typed_field<'a>(self, decoded: &RawDocument<'a>) -> HarnessResult<RawElement<'a>> {
        let element = decoded
            .get(self.test_key())
            .ok_or_else(|| self.type_mismatch(None))?;
        if element.element_type() != self.element_type() {
            return Err(self.type_mismatch(Some(&element)));
        }
        Ok(element)
    }

    fn type_mismatch(self, found: Option<&RawElement<'_>>) -> HarnessError {
        HarnessError::mismatch(
            format!("field {:?}", self.test_key()),
            self.element_type(),
            found.map_or("missing".to_string(), |e| e.element_type().to_string()),
        )
    }
}

impl fmt::Display for TypeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
