//! Rule catalog command

use super::print_json;
use anyhow::Result;
use placard_constraint::RuleRegistry;

pub fn run(format: &str) -> Result<()> {
    let catalog = RuleRegistry::comprehensive().catalog();

    if format == "json" {
        return print_json(&catalog);
    }

    for rule in &catalog.rules {
        println!(
            "  {:<34} {:<5} {}",
            rule.code.as_str(),
            rule.severity.as_str(),
            rule.description
        );
    }
    println!("\n{} rule code(s)", catalog.rules.len());
    Ok(())
}
