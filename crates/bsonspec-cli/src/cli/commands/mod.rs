pub mod dispatch;
pub mod list;
pub mod render;
pub mod run;

pub use dispatch::dispatch;

use bsonspec_harness::HarnessConfig;

use super::args::CorpusArgs;

/// Environment config with the command line's corpus directory applied.
pub(crate) fn base_config(corpus: &CorpusArgs) -> HarnessConfig {
    let config = HarnessConfig::from_env();
    match &corpus.corpus_dir {
        Some(dir) => config.with_corpus_root(dir.clone()),
        None => config,
    }
}
