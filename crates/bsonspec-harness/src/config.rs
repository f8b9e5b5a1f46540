//! Harness configuration.

use std::path::PathBuf;

use regex::Regex;

use crate::error::{HarnessError, HarnessResult};

/// Runtime options for a suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory holding the `<name>.json` corpus files.
    pub corpus_root: PathBuf,

    /// Emit case descriptions and decoded subjects on the diagnostic channel.
    pub debug_output: bool,

    /// Stop the suite after the first failing corpus file.
    pub fail_fast: bool,

    /// Only run cases whose name matches this regular expression.
    pub filter: Option<String>,
}

fn default_corpus_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/json/type")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            corpus_root: default_corpus_root(),
            debug_output: false,
            fail_fast: false,
            filter: None,
        }
    }
}

impl HarnessConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `BSONSPEC_CORPUS_DIR` | Corpus directory |
    /// | `BSONSPEC_DEBUG` | Diagnostic output (`1`/`true`) |
    /// | `BSONSPEC_FAIL_FAST` | Stop at the first failing case (`1`/`true`) |
    /// | `BSONSPEC_FILTER` | Case-name regular expression |
    pub fn from_env() -> Self {
        Self {
            corpus_root: std::env::var_os("BSONSPEC_CORPUS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_corpus_root),
            debug_output: env_flag("BSONSPEC_DEBUG"),
            fail_fast: env_flag("BSONSPEC_FAIL_FAST"),
            filter: std::env::var("BSONSPEC_FILTER")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    pub fn with_corpus_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.corpus_root = root.into();
        self
    }

    pub fn with_debug_output(mut self, enabled: bool) -> Self {
        self.debug_output = enabled;
        self
    }

    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    pub(crate) fn compiled_filter(&self) -> HarnessResult<Option<Regex>> {
        self.filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    HarnessError::config(format!("invalid case filter {pattern:?}: {e}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_bundled_corpus() {
        let cfg = HarnessConfig::default();
        assert!(cfg.corpus_root.ends_with("tests/json/type"));
        assert!(!cfg.debug_output);
        assert!(cfg.filter.is_none());
    }

    #[test]
    fn invalid_filter_is_a_config_error() {
        let cfg = HarnessConfig::default().with_filter("(");
        assert!(matches!(
            cfg.compiled_filter(),
            Err(HarnessError::Config { .. })
        ));
        let cfg = HarnessConfig::default().with_filter("^int");
        assert!(cfg.compiled_filter().unwrap().unwrap().is_match("int32"));
    }
}
