//! Pre-assembly copy check

use super::{load_validator, print_json, print_result_text, RuleSelection};
use anyhow::Result;
use placard_constraint::QuickCheckRequest;

pub struct QuickCheckArgs {
    pub headline: Option<String>,
    pub subhead: Option<String>,
    pub tag: Option<String>,
    pub alcohol: bool,
    pub profiles: Option<String>,
    pub format: String,
}

pub fn run(args: QuickCheckArgs) -> Result<()> {
    let validator = load_validator(args.profiles.as_deref(), &RuleSelection::default())?;
    let request = QuickCheckRequest {
        headline: args.headline,
        subhead: args.subhead,
        retailer_tag: args.tag,
        is_alcohol: args.alcohol,
    };
    let result = validator.quick_check(&request);

    if args.format == "json" {
        print_json(&result)?;
    } else {
        print_result_text(&result, validator.resolver());
    }

    if !result.ok {
        std::process::exit(1);
    }
    Ok(())
}
