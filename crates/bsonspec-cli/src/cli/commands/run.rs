use anyhow::Context;
use bsonspec_harness::{CaseStatus, SpecSuite, SuiteReport};

use super::super::args::{OutputFormat, RunArgs};
use super::base_config;
use crate::exit_codes::{CASE_FAILED, SUCCESS};

pub fn run(args: RunArgs) -> anyhow::Result<i32> {
    if args.files.len() != args.types.len() {
        anyhow::bail!(
            "every --file needs a matching --type ({} files, {} types)",
            args.files.len(),
            args.types.len()
        );
    }

    let mut config = base_config(&args.corpus);
    if args.debug {
        config = config.with_debug_output(true);
    }
    if args.fail_fast {
        config = config.with_fail_fast(true);
    }
    if let Some(filter) = args.filter {
        config = config.with_filter(filter);
    }

    let mut suite = SpecSuite::new("type");
    if !args.files.is_empty() {
        for (path, validator) in args.files.iter().zip(args.types) {
            suite
                .register(path, validator)
                .with_context(|| format!("registering {}", path.display()))?;
        }
    } else if args.discover {
        let registered = suite.register_dir(&config.corpus_root)?;
        tracing::debug!(registered, "discovered corpora");
    } else {
        suite.install_defaults(&config.corpus_root)?;
    }

    let report = suite.run(&config)?;
    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.all_passed() {
        SUCCESS
    } else {
        report.exit_code().max(CASE_FAILED)
    })
}

fn print_text(report: &SuiteReport) {
    for case in &report.cases {
        match case.status {
            CaseStatus::Passed => println!(
                "PASS {} ({} valid, {} parseErrors)",
                case.name, case.valid_cases, case.parse_error_cases
            ),
            CaseStatus::Skipped => println!("SKIP {}", case.name),
            CaseStatus::Failed => match &case.failure {
                Some(failure) => println!("FAIL {}: {}", case.name, failure.message),
                None => println!("FAIL {}", case.name),
            },
        }
    }
    println!(
        "{}: {} passed, {} failed, {} skipped",
        report.suite,
        report.pass_count(),
        report.failure_count(),
        report.count(CaseStatus::Skipped)
    );
}
