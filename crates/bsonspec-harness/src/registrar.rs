//! Case registration and suite execution.
//!
//! One corpus file is one case. Registration loads the file once; running a
//! case walks the whole file and stops at its first failure.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::corpus::CorpusFile;
use crate::error::{HarnessError, HarnessResult, LoadError};
use crate::report::{CaseReport, CaseStatus, FailureReport, SuiteReport};
use crate::validator::TypeValidator;
use crate::walker::run_corpus;

/// Corpus files installed by [`SpecSuite::install_defaults`].
pub const DEFAULT_CORPORA: [(&str, TypeValidator); 3] = [
    ("boolean.json", TypeValidator::Bool),
    ("int32.json", TypeValidator::Int32),
    ("decimal128.json", TypeValidator::Decimal128),
];

/// Case name for a corpus path: `.../<name>.json` becomes `<name>`.
pub fn case_name_from_path(path: &Path) -> HarnessResult<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| HarnessError::config(format!("no file name in {}", path.display())))?;
    let name = file_name.strip_suffix(".json").unwrap_or(file_name);
    if name.is_empty() {
        return Err(HarnessError::config(format!(
            "empty case name for {}",
            path.display()
        )));
    }
    Ok(name.to_string())
}

/// A loaded corpus paired with the validator that runs it.
#[derive(Debug, Clone)]
pub struct RegisteredCase {
    pub name: String,
    pub validator: TypeValidator,
    pub file: CorpusFile,
}

#[derive(Debug, Clone)]
pub struct SpecSuite {
    name: String,
    cases: Vec<RegisteredCase>,
    names: HashSet<String>,
}

impl SpecSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            names: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[RegisteredCase] {
        &self.cases
    }

    /// Load `path` and register it under its derived case name.
    pub fn register(
        &mut self,
        path: impl AsRef<Path>,
        validator: TypeValidator,
    ) -> HarnessResult<&RegisteredCase> {
        let path = path.as_ref();
        let name = self.unused_name(path)?;
        let file = CorpusFile::load(path)?;
        Ok(self.push(name, validator, file))
    }

    fn unused_name(&self, path: &Path) -> HarnessResult<String> {
        let name = case_name_from_path(path)?;
        if self.names.contains(&name) {
            return Err(HarnessError::config(format!(
                "duplicate case name {name:?} ({})",
                path.display()
            )));
        }
        Ok(name)
    }

    fn push(
        &mut self,
        name: String,
        validator: TypeValidator,
        file: CorpusFile,
    ) -> &RegisteredCase {
        debug!(case = %name, validator = %validator, digest = %file.digest, "registered corpus");
        self.names.insert(name.clone());
        self.cases.push(RegisteredCase {
            name,
            validator,
            file,
        });
        &self.cases[self.cases.len() - 1]
    }

    /// Register the fixed boolean, int32 and decimal128 corpora under `root`.
    pub fn install_defaults(&mut self, root: impl AsRef<Path>) -> HarnessResult<()> {
        let root = root.as_ref();
        for (file, validator) in DEFAULT_CORPORA {
            self.register(root.join(file), validator)?;
        }
        Ok(())
    }

    /// Register every `*.json` file in `dir`, picking the validator from the
    /// corpus `bson_type`. Returns the number of cases registered.
    ///
    /// Files without a supported `bson_type` are skipped with a warning.
    pub fn register_dir(&mut self, dir: impl AsRef<Path>) -> HarnessResult<usize> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: dir.to_path_buf(),
                }
            } else {
                LoadError::Io {
                    path: dir.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registered = 0;
        for path in paths {
            let file = CorpusFile::load(&path)?;
            let bson_type = file.corpus.bson_type.clone();
            match bson_type.as_deref().and_then(TypeValidator::from_bson_type) {
                Some(validator) => {
                    let name = self.unused_name(&path)?;
                    self.push(name, validator, file);
                    registered += 1;
                }
                None => warn!(
                    path = %path.display(),
                    bson_type = bson_type.as_deref().unwrap_or("<none>"),
                    "skipping corpus with unsupported type"
                ),
            }
        }
        Ok(registered)
    }

    /// Run every registered case in registration order.
    ///
    /// Case failures are recorded in the report; only an invalid
    /// configuration fails the run itself.
    pub fn run(&self, config: &HarnessConfig) -> HarnessResult<SuiteReport> {
        let filter = config.compiled_filter()?;
        let mut stopped = false;
        let mut reports = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            let selected = filter.as_ref().map_or(true, |re| re.is_match(&case.name));
            if stopped || !selected {
                debug!(case = %case.name, "skipped");
                reports.push(CaseReport::skipped(
                    &case.name,
                    case.validator,
                    case.file.path.clone(),
                ));
                continue;
            }

            let mut report = CaseReport {
                corpus_digest: Some(case.file.digest.clone()),
                ..CaseReport::skipped(&case.name, case.validator, case.file.path.clone())
            };
            match run_corpus(&case.file.corpus, case.validator, config) {
                Ok(summary) => {
                    info!(
                        case = %case.name,
                        valid = summary.valid_cases,
                        parse_errors = summary.parse_error_cases,
                        "passed"
                    );
                    report.status = CaseStatus::Passed;
                    report.valid_cases = summary.valid_cases;
                    report.parse_error_cases = summary.parse_error_cases;
                }
                Err(err) => {
                    warn!(case = %case.name, kind = ?err.kind(), "{err}");
                    report.status = CaseStatus::Failed;
                    report.failure = Some(FailureReport::from(&err));
                    stopped = config.fail_fast;
                }
            }
            reports.push(report);
        }

        Ok(SuiteReport {
            suite: self.name.clone(),
            cases: reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn case_name_strips_directory_and_suffix() {
        assert_eq!(
            case_name_from_path(Path::new("tests/json/type/int32.json")).unwrap(),
            "int32"
        );
        assert_eq!(case_name_from_path(Path::new("boolean")).unwrap(), "boolean");
        assert!(case_name_from_path(Path::new(".json")).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "int32.json", "{}");
        std::fs::create_dir(dir.path().join("other")).unwrap();
        let b = write(&dir.path().join("other"), "int32.json", "{}");

        let mut suite = SpecSuite::new("t");
        suite.register(&a, TypeValidator::Int32).unwrap();
        let err = suite.register(&b, TypeValidator::Int32).unwrap_err();
        assert!(matches!(err, HarnessError::Config { .. }));
        assert_eq!(suite.cases().len(), 1);
    }

    #[test]
    fn missing_file_fails_registration() {
        let dir = tempfile::tempdir().unwrap();
        let mut suite = SpecSuite::new("t");
        let err = suite.install_defaults(dir.path()).unwrap_err();
        assert!(matches!(err, HarnessError::Load(LoadError::NotFound { .. })));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn register_dir_picks_validator_from_bson_type() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.json", r#"{"bson_type": "0x08"}"#);
        write(dir.path(), "a.json", r#"{"bson_type": "0x10"}"#);
        write(dir.path(), "double.json", r#"{"bson_type": "0x01"}"#);
        write(dir.path(), "notes.txt", "ignored");

        let mut suite = SpecSuite::new("t");
        assert_eq!(suite.register_dir(dir.path()).unwrap(), 2);
        let registered: Vec<_> = suite
            .cases()
            .iter()
            .map(|c| (c.name.as_str(), c.validator))
            .collect();
        assert_eq!(
            registered,
            [("a", TypeValidator::Int32), ("b", TypeValidator::Bool)]
        );
    }

    #[test]
    fn fail_fast_skips_remaining_cases() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.json", r#"{"decodeErrors": [{}]}"#);
        let good = write(dir.path(), "good.json", "{}");

        let mut suite = SpecSuite::new("t");
        suite.register(&bad, TypeValidator::Int32).unwrap();
        suite.register(&good, TypeValidator::Int32).unwrap();

        let report = suite
            .run(&HarnessConfig::default().with_fail_fast(true))
            .unwrap();
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.cases[1].status, CaseStatus::Skipped);

        let report = suite.run(&HarnessConfig::default()).unwrap();
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.pass_count(), 1);
    }

    #[test]
    fn filter_selects_cases_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut suite = SpecSuite::new("t");
        suite
            .register(write(dir.path(), "int32.json", "{}"), TypeValidator::Int32)
            .unwrap();
        suite
            .register(write(dir.path(), "boolean.json", "{}"), TypeValidator::Bool)
            .unwrap();

        let report = suite
            .run(&HarnessConfig::default().with_filter("^bool"))
            .unwrap();
        assert_eq!(report.cases[0].status, CaseStatus::Skipped);
        assert_eq!(report.cases[1].status, CaseStatus::Passed);
        assert!(report.cases[1].corpus_digest.is_some());
    }
}
