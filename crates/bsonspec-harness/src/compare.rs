use bsonspec_codec::{to_canonical_json, Document};

use crate::error::{HarnessError, HarnessResult};

/// Compare two documents by their canonical JSON text.
///
/// Text inequality is value inequality: differing key order or differing
/// decimal exponents fail even when the values are numerically equal.
pub fn assert_canonical_eq(actual: &Document, expected: &Document) -> HarnessResult<()> {
    let actual = to_canonical_json(actual);
    let expected = to_canonical_json(expected);
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::mismatch("canonical extjson", expected, actual))
    }
}
