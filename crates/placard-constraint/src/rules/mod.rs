//! The fixed rule set
//!
//! Every rule is a pure function of a scene and a [`RuleContext`]. Rules share
//! no state, so the order they run in never changes the outcome.

mod brand;
mod compliance;
mod copy;
mod layout;

pub use brand::{
    BalanceRule, BrandPaletteRule, ElementOverlapRule, HierarchyRule, LogoClearSpaceRule,
    LogoSizeRule,
};
pub use compliance::{
    DisclaimerColorRule, DisclaimerRequiredRule, DisclaimerSizeRule, RetailerTagRequiredRule,
    RetailerTagTextRule,
};
pub use copy::{GuaranteeRule, KeywordRule, PriceVisibilityRule};
pub use layout::{
    BackgroundRule, ContrastRule, CtaSafeGapRule, ElementCountRule, FontSizeRule, LogoRule,
    OutOfBoundsRule, PeopleInPhotographyRule, PriceTileOverlapRule, RequiredElementsRule,
    SafeZoneRule,
};

use crate::report::Issue;
use crate::types::{IssueCode, RuleGroup};
use placard_core::{BrandPolicy, CanvasSize, ChannelProfile, Result, RetailerPolicy};
use placard_scene::Scene;

/// Evaluation parameters shared by every rule and fix
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub canvas: CanvasSize,
    pub regulated: bool,
    pub profile: &'a ChannelProfile,
    pub retailer: &'a RetailerPolicy,
    pub brand: &'a BrandPolicy,
}

/// A single validation rule
pub trait Rule: Send + Sync {
    /// Stable rule name used in logs
    fn name(&self) -> &'static str;

    fn group(&self) -> RuleGroup;

    /// Every code this rule can emit
    fn codes(&self) -> &'static [IssueCode];

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>>;
}

/// Lowercased concatenation of every text element
pub(crate) fn copy_text(scene: &Scene) -> String {
    scene.text_content().to_lowercase()
}

/// Case-insensitive substring search for any of `needles` in lowercased text
pub(crate) fn mentions_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use placard_core::{BrandPolicy, Channel, ChannelProfile, RetailerPolicy};

    /// Owned profile and retailer so tests can borrow a context
    pub struct Fixture {
        pub profile: ChannelProfile,
        pub retailer: RetailerPolicy,
        pub brand: BrandPolicy,
        pub canvas: CanvasSize,
        pub regulated: bool,
    }

    impl Fixture {
        pub fn stories() -> Self {
            Self::channel(Channel::Stories)
        }

        pub fn channel(channel: Channel) -> Self {
            Self {
                profile: ChannelProfile::builtin(channel),
                retailer: RetailerPolicy::default(),
                brand: BrandPolicy::default(),
                canvas: CanvasSize::STORY,
                regulated: false,
            }
        }

        pub fn with_brand(mut self, brand: BrandPolicy) -> Self {
            self.brand = brand;
            self
        }

        pub fn regulated(mut self) -> Self {
            self.regulated = true;
            self
        }

        pub fn ctx(&self) -> RuleContext<'_> {
            RuleContext {
                canvas: self.canvas,
                regulated: self.regulated,
                profile: &self.profile,
                retailer: &self.retailer,
                brand: &self.brand,
            }
        }
    }

    pub fn codes(issues: &[Issue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }
}
