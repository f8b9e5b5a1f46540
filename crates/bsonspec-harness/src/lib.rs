//! Conformance harness for per-type document codecs.
//!
//! Corpus files describe, for one element type, subjects that must decode and
//! re-render to an exact canonical JSON text, and literals the type's parser
//! must reject. The harness loads each file, walks its sections and reports
//! the first divergence per file.
//!
//! ```no_run
//! use bsonspec_harness::{HarnessConfig, SpecSuite};
//!
//! let config = HarnessConfig::from_env();
//! let mut suite = SpecSuite::new("type");
//! suite.install_defaults(&config.corpus_root)?;
//! let report = suite.run(&config)?;
//! assert!(report.all_passed());
//! # Ok::<(), bsonspec_harness::HarnessError>(())
//! ```

pub mod compare;
pub mod config;
pub mod corpus;
mod digest;
pub mod error;
pub mod parse_error;
pub mod registrar;
pub mod report;
pub mod subject;
pub mod validator;
pub mod walker;

pub use compare::assert_canonical_eq;
pub use config::HarnessConfig;
pub use corpus::{load_corpus, CorpusDocument, CorpusFile, ErrorCase, ValidCase};
pub use error::{FailureKind, HarnessError, HarnessResult, LoadError};
pub use parse_error::{check_decimal128_parse_error, check_rejection, POISON_HIGH};
pub use registrar::{case_name_from_path, RegisteredCase, SpecSuite, DEFAULT_CORPORA};
pub use report::{CaseReport, CaseStatus, FailureReport, SuiteReport};
pub use subject::Subject;
pub use validator::TypeValidator;
pub use walker::{run_corpus, WalkSummary};
