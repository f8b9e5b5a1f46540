//! Suite run reports.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{FailureKind, HarnessError};
use crate::validator::TypeValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed,
    /// Not run: excluded by the filter or skipped after a fail-fast stop.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
    pub exit_code: i32,
}

impl From<&HarnessError> for FailureReport {
    fn from(err: &HarnessError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            exit_code: err.exit_code(),
        }
    }
}

/// Outcome of one registered corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub validator: TypeValidator,
    pub path: PathBuf,
    /// `sha256:<hex>` of the corpus file, when it could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_digest: Option<String>,
    pub status: CaseStatus,
    pub valid_cases: usize,
    pub parse_error_cases: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReport>,
}

impl CaseReport {
    pub(crate) fn skipped(name: &str, validator: TypeValidator, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            validator,
            path,
            corpus_digest: None,
            status: CaseStatus::Skipped,
            valid_cases: 0,
            parse_error_cases: 0,
            failure: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn count(&self, status: CaseStatus) -> usize {
        self.cases.iter().filter(|c| c.status == status).count()
    }

    pub fn pass_count(&self) -> usize {
        self.count(CaseStatus::Passed)
    }

    pub fn failure_count(&self) -> usize {
        self.count(CaseStatus::Failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| c.status == CaseStatus::Failed)
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Highest exit code among failures; 0 when everything passed.
    pub fn exit_code(&self) -> i32 {
        self.failures()
            .filter_map(|c| c.failure.as_ref().map(|f| f.exit_code))
            .max()
            .unwrap_or(0)
    }
}
