//! Rule registry and the static rule catalog

use crate::rules::{
    BackgroundRule, BalanceRule, BrandPaletteRule, ContrastRule, CtaSafeGapRule,
    DisclaimerColorRule, DisclaimerRequiredRule, DisclaimerSizeRule, ElementCountRule,
    ElementOverlapRule, FontSizeRule, GuaranteeRule, HierarchyRule, KeywordRule,
    LogoClearSpaceRule, LogoRule, LogoSizeRule, OutOfBoundsRule, PeopleInPhotographyRule,
    PriceTileOverlapRule, PriceVisibilityRule, RequiredElementsRule, RetailerTagRequiredRule,
    RetailerTagTextRule, Rule, SafeZoneRule,
};
use crate::types::{IssueCode, RuleGroup, Severity};
use serde::{Deserialize, Serialize};

/// Ordered set of rules the validator runs
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The full built-in rule set
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RetailerTagRequiredRule));
        registry.register(Box::new(RetailerTagTextRule));
        registry.register(Box::new(DisclaimerRequiredRule));
        registry.register(Box::new(DisclaimerColorRule));
        registry.register(Box::new(DisclaimerSizeRule));
        registry.register(Box::new(KeywordRule::terms()));
        registry.register(Box::new(KeywordRule::competition()));
        registry.register(Box::new(KeywordRule::sustainability()));
        registry.register(Box::new(KeywordRule::charity()));
        registry.register(Box::new(PriceVisibilityRule));
        registry.register(Box::new(KeywordRule::claims()));
        registry.register(Box::new(GuaranteeRule));
        registry.register(Box::new(SafeZoneRule));
        registry.register(Box::new(FontSizeRule));
        registry.register(Box::new(ContrastRule));
        registry.register(Box::new(RequiredElementsRule));
        registry.register(Box::new(ElementCountRule));
        registry.register(Box::new(BackgroundRule));
        registry.register(Box::new(LogoRule));
        registry.register(Box::new(PriceTileOverlapRule));
        registry.register(Box::new(OutOfBoundsRule));
        registry.register(Box::new(CtaSafeGapRule));
        registry.register(Box::new(PeopleInPhotographyRule));
        registry
    }

    /// Built-in rules plus the advisory brand checks
    pub fn comprehensive() -> Self {
        let mut registry = Self::builtin();
        registry.register(Box::new(LogoSizeRule));
        registry.register(Box::new(LogoClearSpaceRule));
        registry.register(Box::new(HierarchyRule));
        registry.register(Box::new(ElementOverlapRule));
        registry.register(Box::new(BalanceRule));
        registry.register(Box::new(BrandPaletteRule));
        registry
    }

    /// Register a rule directly
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Get all rules
    pub fn all(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Rules of one group
    pub fn by_group(&self, group: RuleGroup) -> impl Iterator<Item = &dyn Rule> {
        self.rules
            .iter()
            .filter(move |r| r.group() == group)
            .map(|r| r.as_ref())
    }

    pub fn find(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    /// Every code any registered rule can emit, in registration order
    pub fn codes(&self) -> Vec<IssueCode> {
        self.rules
            .iter()
            .flat_map(|r| r.codes().iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Static projection of the rule set for documentation and UI display
    pub fn catalog(&self) -> RuleCatalog {
        RuleCatalog {
            rules: self
                .codes()
                .into_iter()
                .map(|code| RuleInfo {
                    code,
                    severity: code.severity(),
                    description: code.description().to_string(),
                })
                .collect(),
        }
    }
}

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub code: IssueCode,
    pub severity: Severity,
    pub description: String,
}

/// `{ "rules": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub rules: Vec<RuleInfo>,
}
