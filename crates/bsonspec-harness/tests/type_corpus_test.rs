//! Runs the bundled type corpora and the documented failure scenarios.

use std::path::{Path, PathBuf};

use bsonspec_harness::{
    check_decimal128_parse_error, load_corpus, run_corpus, CaseStatus, FailureKind,
    HarnessConfig, HarnessError, SpecSuite, TypeValidator, POISON_HIGH,
};
use serde_json::json;

fn corpus_root() -> PathBuf {
    HarnessConfig::default().corpus_root
}

fn write_corpus(dir: &Path, name: &str, corpus: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(corpus).unwrap()).unwrap();
    path
}

#[test]
fn default_corpora_pass() {
    let config = HarnessConfig::default();
    let mut suite = SpecSuite::new("type");
    suite.install_defaults(&config.corpus_root).unwrap();
    let report = suite.run(&config).unwrap();

    let names: Vec<_> = report.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["boolean", "int32", "decimal128"]);
    for case in &report.cases {
        assert_eq!(
            case.status,
            CaseStatus::Passed,
            "{}: {:?}",
            case.name,
            case.failure
        );
        assert!(case.valid_cases > 0);
        assert!(case.parse_error_cases > 0);
        assert!(case
            .corpus_digest
            .as_deref()
            .is_some_and(|d| d.starts_with("sha256:") && d.len() == 7 + 64));
    }
    assert!(report.all_passed());
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn discovery_finds_the_same_corpora() {
    let mut suite = SpecSuite::new("type");
    assert_eq!(suite.register_dir(corpus_root()).unwrap(), 3);
    let mut pairs: Vec<_> = suite
        .cases()
        .iter()
        .map(|c| (c.name.clone(), c.validator))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        pairs,
        [
            ("boolean".to_string(), TypeValidator::Bool),
            ("decimal128".to_string(), TypeValidator::Decimal128),
            ("int32".to_string(), TypeValidator::Int32),
        ]
    );
}

#[test]
fn int32_answer_and_off_by_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut case = json!({
        "valid": [{
            "description": "answer",
            "subject": "0C0000001069002A00000000",
            "string": "42",
            "extjson": {"i": 42}
        }]
    });
    let path = write_corpus(dir.path(), "int32.json", &case);
    let corpus = load_corpus(&path).unwrap();
    run_corpus(&corpus, TypeValidator::Int32, &HarnessConfig::default()).unwrap();

    case["valid"][0]["string"] = json!("43");
    let path = write_corpus(dir.path(), "int32.json", &case);
    let corpus = load_corpus(&path).unwrap();
    let err = run_corpus(&corpus, TypeValidator::Int32, &HarnessConfig::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::AssertionMismatch);
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn any_decode_errors_entry_fails_the_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_corpus(
        dir.path(),
        "int32.json",
        &json!({"valid": [], "decodeErrors": [{"description": "whatever", "bson": "00"}]}),
    );
    let mut suite = SpecSuite::new("t");
    suite.register(&path, TypeValidator::Int32).unwrap();
    let report = suite.run(&HarnessConfig::default()).unwrap();
    let failure = report.cases[0].failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::UnimplementedSection);
    assert!(!report.all_passed());
}

#[test]
fn decimal_text_must_match_exactly() {
    // subject encodes 1.0; corpus claims 1.00
    let corpus = serde_json::from_value(json!({
        "valid": [{
            "description": "precision",
            "subject": "180000001364000A000000000000000000000000003E3000",
            "string": "1.00",
            "extjson": {"d": {"$numberDecimal": "1.00"}}
        }]
    }))
    .unwrap();
    let err = run_corpus(&corpus, TypeValidator::Decimal128, &HarnessConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::AssertionMismatch);
}

#[test]
fn bool_accepts_only_literal_text() {
    let corpus = serde_json::from_value(json!({
        "valid": [{
            "description": "yes",
            "subject": "090000000862000100",
            "string": "yes",
            "extjson": {"b": true}
        }]
    }))
    .unwrap();
    let err = run_corpus(&corpus, TypeValidator::Bool, &HarnessConfig::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::AssertionMismatch);
}

#[test]
fn nan_literal_is_rejected_with_poison() {
    check_decimal128_parse_error("NaN").unwrap();
    assert_eq!(POISON_HIGH, 0x7c00_0000_0000_0000);
}

#[test]
fn bad_subject_hex_is_a_fixture_error() {
    let corpus = serde_json::from_value(json!({
        "valid": [{
            "description": "odd",
            "subject": "0C0000001069002A0000000",
            "string": "42",
            "extjson": {"i": 42}
        }]
    }))
    .unwrap();
    let err = run_corpus(&corpus, TypeValidator::Int32, &HarnessConfig::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Fixture);
}

#[test]
fn malformed_corpus_fails_registration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("int32.json");
    std::fs::write(&path, "{\"valid\": 5}").unwrap();
    let mut suite = SpecSuite::new("t");
    let err = suite.register(&path, TypeValidator::Int32).unwrap_err();
    assert!(matches!(err, HarnessError::Load(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn debug_output_does_not_change_outcome() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
    let config = HarnessConfig::default().with_debug_output(true);
    let mut suite = SpecSuite::new("type");
    suite.install_defaults(&config.corpus_root).unwrap();
    assert!(suite.run(&config).unwrap().all_passed());
}
