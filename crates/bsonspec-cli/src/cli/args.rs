use std::path::PathBuf;

use bsonspec_harness::TypeValidator;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bsonspec",
    version,
    about = "Conformance harness for per-type document codecs against canonical-JSON test vectors"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run corpus files and report pass/fail per file
    Run(RunArgs),
    /// List the cases found in the corpus directory
    List(ListArgs),
    /// Decode a hex subject and print its canonical JSON
    Render(RenderArgs),
    Version,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Clone, Debug)]
pub struct CorpusArgs {
    /// Directory holding `<name>.json` corpus files
    #[arg(long, env = "BSONSPEC_CORPUS_DIR")]
    pub corpus_dir: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Corpus file to run; pair each with a --type
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Validator for the matching --file (int32|bool|decimal128)
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_validator)]
    pub types: Vec<TypeValidator>,

    /// Register every corpus in the directory by its bson_type instead of the default set
    #[arg(long, conflicts_with = "files")]
    pub discover: bool,

    /// Only run cases whose name matches this regular expression
    #[arg(long, env = "BSONSPEC_FILTER")]
    pub filter: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log case descriptions and decoded subjects
    #[arg(long)]
    pub debug: bool,

    /// Stop at the first failing case
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct RenderArgs {
    /// Hex-encoded document bytes
    pub hex: String,
}

fn parse_validator(s: &str) -> Result<TypeValidator, String> {
    TypeValidator::from_name(s)
        .or_else(|| TypeValidator::from_bson_type(s))
        .ok_or_else(|| format!("unknown type {s:?} (expected int32, bool or decimal128)"))
}
