//! End-to-end checks of the codec surface the harness depends on.

use bsonspec_codec::{
    document_from_extjson, to_canonical_json, Decimal128, Document, ElementType, RawDocument,
};
use serde_json::json;

#[test]
fn decimal_subject_rebuilds_to_expected_extjson() {
    let bytes = hex::decode("180000001364000A000000000000000000000000003E3000").unwrap();
    let view = RawDocument::from_bytes(&bytes).unwrap();
    let element = view.get("d").unwrap();
    assert_eq!(element.element_type(), ElementType::Decimal128);

    let value = element.as_decimal128().unwrap();
    assert_eq!(value.to_string(), "1.0");

    let rebuilt = Document::single("d", value);
    let expected = document_from_extjson(&json!({"d": {"$numberDecimal": "1.0"}})).unwrap();
    assert_eq!(to_canonical_json(&rebuilt), to_canonical_json(&expected));
}

#[test]
fn rebuilt_bytes_match_subject_bytes() {
    let subject = hex::decode("090000000862000000").unwrap();
    let view = RawDocument::from_bytes(&subject).unwrap();
    let b = view.get("b").and_then(|e| e.as_bool()).unwrap();
    assert_eq!(Document::single("b", b).to_bytes().unwrap(), subject);
}

#[test]
fn poison_value_is_quiet_nan() {
    let err = Decimal128::parse("NaN").unwrap_err();
    assert_eq!(err.value(), Decimal128::NAN);
    assert_eq!(err.value().high(), 0x7c00_0000_0000_0000);
    assert!(err.value().is_nan());
}
