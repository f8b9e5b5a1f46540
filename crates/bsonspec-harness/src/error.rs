//! Error types for the conformance harness.
//!
//! Every failure is a hard-fail: the current corpus file stops at the first
//! error and the suite records it. [`FailureKind`] keeps the classification
//! for reports; it does not change how a failure propagates.

use std::path::PathBuf;

use serde::Serialize;

/// Corpus files that cannot be turned into a [`crate::CorpusDocument`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("corpus file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Harness failures.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The corpus file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The corpus itself is wrong (bad hex, invalid document, bad extjson).
    #[error("fixture error: {message}")]
    Fixture { message: String },

    /// Decoded or rendered output diverges from the corpus expectation.
    #[error("{what} mismatch: expected {expected}, got {actual}")]
    AssertionMismatch {
        what: String,
        expected: String,
        actual: String,
    },

    /// A corpus section the harness recognizes but does not run.
    #[error("{section} is not implemented ({entries} entries)")]
    UnimplementedSection { section: &'static str, entries: usize },

    /// An input expected to be rejected was accepted, or rejected wrongly.
    #[error("parse error expected for {subject:?}: {message}")]
    ParseErrorExpectationViolated { subject: String, message: String },

    /// Invalid harness configuration or registration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A failure attributed to one case of a corpus section.
    #[error("{section}[{index}] {description:?}: {source}")]
    InCase {
        section: &'static str,
        index: usize,
        description: String,
        #[source]
        source: Box<HarnessError>,
    },
}

/// Report-level classification of a [`HarnessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fixture,
    AssertionMismatch,
    UnimplementedSection,
    ParseErrorExpectationViolated,
    Config,
}

impl HarnessError {
    pub(crate) fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    pub(crate) fn mismatch(
        what: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::AssertionMismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Attach the failing case's position and description.
    pub(crate) fn in_case(self, section: &'static str, index: usize, description: &str) -> Self {
        Self::InCase {
            section,
            index,
            description: description.to_string(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Load(_) | Self::Fixture { .. } => FailureKind::Fixture,
            Self::AssertionMismatch { .. } => FailureKind::AssertionMismatch,
            Self::UnimplementedSection { .. } => FailureKind::UnimplementedSection,
            Self::ParseErrorExpectationViolated { .. } => {
                FailureKind::ParseErrorExpectationViolated
            }
            Self::Config { .. } => FailureKind::Config,
            Self::InCase { source, .. } => source.kind(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Load(_) | Self::Config { .. } => 2,
            Self::InCase { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_context_keeps_inner_kind() {
        let err = HarnessError::mismatch("int32 value", 43, 42).in_case("valid", 0, "answer");
        assert_eq!(err.kind(), FailureKind::AssertionMismatch);
        assert_eq!(
            err.to_string(),
            "valid[0] \"answer\": int32 value mismatch: expected 43, got 42"
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn load_errors_are_fixture_failures_with_config_exit_code() {
        let err = HarnessError::from(LoadError::NotFound {
            path: PathBuf::from("missing.json"),
        });
        assert_eq!(err.kind(), FailureKind::Fixture);
        assert_eq!(err.exit_code(), 2);
    }
}
