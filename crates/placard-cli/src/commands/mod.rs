//! CLI command implementations

pub mod quick_check;
pub mod rules;
pub mod snap;
pub mod validate;

use anyhow::{Context, Result};
use placard_constraint::{
    ProfileRegistry, Resolver, RuleRegistry, Severity, ValidationResult, Validator,
};
use placard_core::{CanvasContext, CanvasSize, Channel};
use serde::Serialize;

/// Which rules a command runs and which brand palette they check against
#[derive(Debug, Default)]
pub struct RuleSelection {
    /// Add the advisory brand checks to the built-in rules
    pub comprehensive: bool,
    /// Overrides the profile's brand palette when non-empty
    pub brand_colors: Vec<String>,
}

/// Built-in validator, with profile overrides from `dir` when given
pub fn load_validator(profiles: Option<&str>, selection: &RuleSelection) -> Result<Validator> {
    let mut profiles = match profiles {
        Some(dir) => ProfileRegistry::load_from_directory(dir)
            .with_context(|| format!("loading profiles from {}", dir))?,
        None => ProfileRegistry::builtin(),
    };
    if !selection.brand_colors.is_empty() {
        let mut brand = profiles.brand().clone();
        brand.colors = selection.brand_colors.clone();
        profiles.set_brand(brand);
    }
    let rules = if selection.comprehensive {
        RuleRegistry::comprehensive()
    } else {
        RuleRegistry::builtin()
    };
    tracing::debug!(rules = rules.len(), comprehensive = selection.comprehensive, "rule set loaded");
    Ok(Validator::new(rules, profiles, Resolver::builtin())?)
}

pub fn parse_context(canvas_size: &str, channel: &str, regulated: bool) -> Result<CanvasContext> {
    let canvas = CanvasSize::parse(canvas_size)?;
    let channel: Channel = channel.parse()?;
    if channel == Channel::Unknown {
        tracing::warn!("unknown channel, using the most conservative profile");
    }
    Ok(CanvasContext::new(canvas, channel, regulated))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_result_text(result: &ValidationResult, resolver: &Resolver) {
    if result.issues.is_empty() {
        println!("All rules passed.");
        return;
    }

    println!("{}", result.summary());
    println!();

    for issue in &result.issues {
        let severity = match issue.severity {
            Severity::Hard => "HARD",
            Severity::Warn => "WARN",
        };
        let target = match (&issue.element_id, issue.element_index) {
            (Some(id), _) => format!(" {}", id),
            (None, Some(index)) => format!(" #{}", index),
            (None, None) => String::new(),
        };
        let fix_marker = if resolver.has_transform(issue.code) {
            " [fixable]"
        } else {
            ""
        };

        println!(
            "  [{}] {}{}: {}{}",
            severity, issue.code, target, issue.message, fix_marker
        );
        if let Some(suggestion) = &issue.fix_suggestion {
            println!("         {}", suggestion);
        }
    }
}
