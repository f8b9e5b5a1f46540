use bsonspec_harness::SpecSuite;

use super::super::args::ListArgs;
use super::base_config;
use crate::exit_codes::SUCCESS;

pub fn run(args: ListArgs) -> anyhow::Result<i32> {
    let config = base_config(&args.corpus);
    let mut suite = SpecSuite::new("type");
    suite.register_dir(&config.corpus_root)?;
    for case in suite.cases() {
        println!(
            "{}\t{}\t{}",
            case.name,
            case.validator,
            case.file.path.display()
        );
    }
    Ok(SUCCESS)
}
