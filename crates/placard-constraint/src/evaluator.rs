//! Validation orchestrator

use crate::fixer::Resolver;
use crate::profiles::ProfileRegistry;
use crate::registry::RuleRegistry;
use crate::report::{Issue, ValidationResult};
use crate::request::QuickCheckRequest;
use crate::rules::{Rule, RuleContext};
use crate::types::{IssueCode, RuleGroup};
use placard_core::{CanvasContext, ChannelProfile, PlacardError, Result};
use placard_scene::Scene;
use std::panic::{self, AssertUnwindSafe};

/// Runs the rule registry over scene snapshots.
///
/// Validation is a pure function of `(scene, context)`: no rule sees another
/// rule's output and nothing depends on time or randomness.
pub struct Validator {
    rules: RuleRegistry,
    profiles: ProfileRegistry,
    resolver: Resolver,
}

impl Validator {
    /// Build a validator. Refuses if any rule code has no resolver entry.
    pub fn new(rules: RuleRegistry, profiles: ProfileRegistry, resolver: Resolver) -> Result<Self> {
        let missing = resolver.check_coverage(&rules.codes());
        if !missing.is_empty() {
            return Err(PlacardError::FixCoverageIncomplete(
                missing.iter().map(|c| c.as_str().to_string()).collect(),
            ));
        }
        Ok(Self {
            rules,
            profiles,
            resolver,
        })
    }

    /// Built-in rules, profiles and fixes
    pub fn builtin() -> Result<Self> {
        Self::new(
            RuleRegistry::builtin(),
            ProfileRegistry::builtin(),
            Resolver::builtin(),
        )
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolved channel profile for a context
    pub fn profile_for(&self, ctx: &CanvasContext) -> ChannelProfile {
        self.profiles.profile(ctx.channel)
    }

    /// Run every registered rule and aggregate the issues
    pub fn validate(&self, scene: &Scene, ctx: &CanvasContext) -> ValidationResult {
        let profile = self.profile_for(ctx);
        let rule_ctx = RuleContext {
            canvas: ctx.canvas,
            regulated: ctx.regulated,
            profile: &profile,
            retailer: self.profiles.retailer(),
            brand: self.profiles.brand(),
        };
        let result = self.run(self.rules.all().iter().map(|r| r.as_ref()), scene, &rule_ctx);

        tracing::info!(
            scene = %scene.id,
            channel = %ctx.channel,
            ok = result.ok,
            hard = result.hard_count(),
            warn = result.warn_count(),
            rules = self.rules.len(),
            "layout validated"
        );
        result
    }

    /// Pre-assembly check of loose copy strings.
    ///
    /// Runs the copy rules and retailer tag text check over a throwaway scene
    /// built from the request. A regulated product adds a reminder that a
    /// disclaimer will be needed.
    pub fn quick_check(&self, request: &QuickCheckRequest) -> ValidationResult {
        let scene = request.scene(self.profiles.retailer());

        let ctx = CanvasContext::default();
        let profile = self.profile_for(&ctx);
        let rule_ctx = RuleContext {
            canvas: ctx.canvas,
            regulated: request.is_alcohol,
            profile: &profile,
            retailer: self.profiles.retailer(),
            brand: self.profiles.brand(),
        };

        let rules = self
            .rules
            .by_group(RuleGroup::Copy)
            .chain(self.rules.find("retailer_tag_text"));
        let mut result = self.run(rules, &scene, &rule_ctx);

        if request.is_alcohol {
            result.issues.push(
                Issue::new(
                    IssueCode::DisclaimerRequired,
                    "Alcohol creatives will need a disclaimer",
                )
                .with_fix("Add a black disclaimer before export"),
            );
            result
                .checked_rules
                .push(IssueCode::DisclaimerRequired.as_str().to_string());
        }

        tracing::debug!(ok = result.ok, issues = result.issues.len(), "quick check");
        result
    }

    fn run<'r>(
        &self,
        rules: impl Iterator<Item = &'r dyn Rule>,
        scene: &Scene,
        ctx: &RuleContext<'_>,
    ) -> ValidationResult {
        let mut issues = Vec::new();
        let mut checked = Vec::new();

        for rule in rules {
            checked.extend(rule.codes().iter().map(|c| c.as_str().to_string()));
            match evaluate_isolated(rule, scene, ctx) {
                Ok(found) => {
                    tracing::debug!(rule = rule.name(), issues = found.len(), "rule evaluated");
                    issues.extend(found);
                }
                Err(message) => {
                    tracing::warn!(rule = rule.name(), error = %message, "rule evaluation failed");
                    issues.push(
                        Issue::new(
                            IssueCode::RuleEvaluationFailed,
                            format!("Rule '{}' could not be evaluated: {}", rule.name(), message),
                        )
                        .with_fix("Re-run validation; contact support if this persists"),
                    );
                }
            }
        }

        ValidationResult::new(issues, checked)
    }
}

/// Evaluate one rule so that neither an error nor a panic escapes
fn evaluate_isolated(
    rule: &dyn Rule,
    scene: &Scene,
    ctx: &RuleContext<'_>,
) -> std::result::Result<Vec<Issue>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(scene, ctx))) {
        Ok(Ok(issues)) => Ok(issues),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string())),
    }
}
