//! Corpus documents and the vector loader.
//!
//! A corpus is one JSON file of test vectors for a single element type:
//!
//! ```json
//! {
//!   "description": "Int32 type",
//!   "bson_type": "0x10",
//!   "test_key": "i",
//!   "valid": [
//!     {"description": "42", "subject": "0C0000001069002A00000000",
//!      "string": "42", "extjson": {"i": 42}}
//!   ],
//!   "parseErrors": [{"description": "junk", "subject": "4x2"}]
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Number, Value as JsonValue};

use crate::digest::sha256_prefixed;
use crate::error::LoadError;

/// Root of a corpus file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CorpusDocument {
    #[serde(default)]
    pub description: Option<String>,

    /// Type tag of the corpus, e.g. `"0x10"`.
    #[serde(default)]
    pub bson_type: Option<String>,

    /// Field name the subjects store their value under.
    #[serde(default)]
    pub test_key: Option<String>,

    #[serde(default)]
    pub valid: Option<Vec<ValidCase>>,

    #[serde(default, rename = "parseErrors")]
    pub parse_errors: Option<Vec<ErrorCase>>,

    /// Recognized but not run; any entry fails the corpus.
    #[serde(default, rename = "decodeErrors")]
    pub decode_errors: Option<Vec<JsonValue>>,
}

/// A subject that must decode and re-render exactly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidCase {
    #[serde(default)]
    pub description: String,

    /// Hex-encoded document bytes.
    pub subject: String,

    /// Expected scalar text of the typed field.
    pub string: String,

    /// Expected full document, as extended JSON. Duplicate keys at any depth
    /// are rejected when the corpus is parsed.
    #[serde(deserialize_with = "unique_keys")]
    pub extjson: JsonValue,
}

/// A literal the type's parser must reject.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorCase {
    #[serde(default)]
    pub description: String,

    pub subject: String,
}

fn unique_keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<JsonValue, D::Error> {
    UniqueKeys::deserialize(deserializer).map(|v| v.0)
}

/// JSON value whose objects never repeat a key.
struct UniqueKeys(JsonValue);

impl<'de> Deserialize<'de> for UniqueKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UniqueKeysVisitor).map(UniqueKeys)
    }
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<JsonValue, E> {
        Ok(Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v))
    }

    fn visit_unit<E>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut items = Vec::new();
        while let Some(UniqueKeys(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonValue, A::Error> {
        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if object.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key {key:?} in extjson")));
            }
            let UniqueKeys(value) = map.next_value()?;
            object.insert(key, value);
        }
        Ok(JsonValue::Object(object))
    }
}

impl CorpusDocument {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// A loaded corpus together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusFile {
    pub path: PathBuf,
    /// `sha256:<hex>` of the file bytes.
    pub digest: String,
    pub corpus: CorpusDocument,
}

impl CorpusFile {
    /// Read and parse a corpus file; the whole file is read into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let corpus = serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            digest: sha256_prefixed(&bytes),
            corpus,
        })
    }
}

/// Load just the corpus document from `path`.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<CorpusDocument, LoadError> {
    CorpusFile::load(path).map(|file| file.corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_all_sections() {
        let corpus = CorpusDocument::from_json_str(
            r#"{
                "description": "Int32 type",
                "bson_type": "0x10",
                "test_key": "i",
                "valid": [{"description": "one", "subject": "0C0000001069000100000000",
                           "string": "1", "extjson": {"i": 1}}],
                "parseErrors": [{"description": "junk", "subject": "x"}],
                "decodeErrors": [{"description": "short", "bson": "0500"}]
            }"#,
        )
        .unwrap();
        assert_eq!(corpus.bson_type.as_deref(), Some("0x10"));
        assert_eq!(corpus.valid.as_ref().map(Vec::len), Some(1));
        assert_eq!(corpus.parse_errors.as_ref().map(Vec::len), Some(1));
        assert_eq!(corpus.decode_errors.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn missing_sections_are_none() {
        let corpus = CorpusDocument::from_json_str("{}").unwrap();
        assert_eq!(corpus, CorpusDocument::default());
    }

    #[test]
    fn valid_case_requires_subject_string_and_extjson() {
        let err = CorpusDocument::from_json_str(
            r#"{"valid": [{"description": "no string", "subject": "00", "extjson": {}}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn duplicate_extjson_keys_are_rejected() {
        let err = CorpusDocument::from_json_str(
            r#"{"valid": [{"subject": "00", "string": "42", "extjson": {"i": 7, "i": 42}}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate key \"i\""));

        let nested = CorpusDocument::from_json_str(
            r#"{"valid": [{"subject": "00", "string": "1",
                           "extjson": {"d": {"$numberDecimal": "1", "$numberDecimal": "2"}}}]}"#,
        );
        assert!(nested.is_err());
    }

    #[test]
    fn extjson_keeps_key_order_and_values() {
        let corpus = CorpusDocument::from_json_str(
            r#"{"valid": [{"subject": "00", "string": "1",
                           "extjson": {"z": [1, -2, 1.5, null, true], "a": {"s": "x"}}}]}"#,
        )
        .unwrap();
        let extjson = &corpus.valid.unwrap()[0].extjson;
        assert_eq!(
            extjson.to_string(),
            r#"{"z":[1,-2,1.5,null,true],"a":{"s":"x"}}"#
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_corpus(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn load_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"valid\": [").unwrap();
        let err = load_corpus(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn load_records_digest_of_file_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        let loaded = CorpusFile::load(file.path()).unwrap();
        assert_eq!(loaded.digest, sha256_prefixed(b"{}"));
        assert_eq!(loaded.corpus, CorpusDocument::default());
    }
}
