use bsonspec_codec::to_canonical_json;
use bsonspec_harness::{HarnessResult, Subject};

use super::super::args::RenderArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: &RenderArgs) -> i32 {
    match render(&args.hex) {
        Ok(json) => {
            println!("{json}");
            SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

fn render(hex_subject: &str) -> HarnessResult<String> {
    let subject = Subject::decode(hex_subject.trim())?;
    Ok(to_canonical_json(&subject.document()?.to_document()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_int32_subject() {
        assert_eq!(render("0C0000001069002A00000000").unwrap(), r#"{"i":42}"#);
    }

    #[test]
    fn rejects_truncated_subject() {
        assert!(render("0C00000010").is_err());
    }
}
