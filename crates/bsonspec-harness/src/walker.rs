//! Walks the sections of one corpus document.

use bsonspec_codec::{document_from_extjson, to_canonical_json};
use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::corpus::{CorpusDocument, ValidCase};
use crate::error::{HarnessError, HarnessResult};
use crate::subject::Subject;
use crate::validator::TypeValidator;

/// Counts of the cases a walk ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub valid_cases: usize,
    pub parse_error_cases: usize,
}

/// Run every recognized section of `corpus` through `validator`.
///
/// Sections run in the order `valid`, `decodeErrors`, `parseErrors`; absent
/// sections are skipped. The first failure stops the walk and is returned
/// with the failing case attached.
pub fn run_corpus(
    corpus: &CorpusDocument,
    validator: TypeValidator,
    config: &HarnessConfig,
) -> HarnessResult<WalkSummary> {
    let mut summary = WalkSummary::default();

    if let Some(key) = corpus.test_key.as_deref() {
        if key != validator.test_key() {
            return Err(HarnessError::fixture(format!(
                "corpus test_key {key:?} does not match {validator} field {:?}",
                validator.test_key()
            )));
        }
    }

    if let Some(cases) = &corpus.valid {
        for (index, case) in cases.iter().enumerate() {
            if config.debug_output {
                info!(validator = %validator, index, "{}", case.description);
            }
            run_valid_case(case, validator, config)
                .map_err(|e| e.in_case("valid", index, &case.description))?;
            summary.valid_cases += 1;
        }
    }

    if let Some(entries) = &corpus.decode_errors {
        if !entries.is_empty() {
            return Err(HarnessError::UnimplementedSection {
                section: "decodeErrors",
                entries: entries.len(),
            });
        }
    }

    if let Some(cases) = &corpus.parse_errors {
        for (index, case) in cases.iter().enumerate() {
            if config.debug_output {
                info!(validator = %validator, index, "{}", case.description);
            }
            validator
                .check_parse_error(&case.subject)
                .map_err(|e| e.in_case("parseErrors", index, &case.description))?;
            summary.parse_error_cases += 1;
        }
    }

    debug!(
        validator = %validator,
        valid = summary.valid_cases,
        parse_errors = summary.parse_error_cases,
        "corpus walk complete"
    );
    Ok(summary)
}

fn run_valid_case(
    case: &ValidCase,
    validator: TypeValidator,
    config: &HarnessConfig,
) -> HarnessResult<()> {
    let subject = Subject::decode(&case.subject)?;
    let decoded = subject.document()?;
    if config.debug_output {
        info!(subject = %to_canonical_json(&decoded.to_document()), "decoded subject");
    }
    let expected = document_from_extjson(&case.extjson)
        .map_err(|e| HarnessError::fixture(format!("extjson: {e}")))?;
    validator.validate(&decoded, &case.string, &expected)?;
    Ok(())
}
