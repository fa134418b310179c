//! Retailer branding and regulated-product rules

use super::{Rule, RuleContext};
use crate::report::Issue;
use crate::types::{IssueCode, RuleGroup};
use placard_core::geometry::to_absolute;
use placard_core::{Result, Rgb};
use placard_scene::{ElementKind, Positioned, Scene};

/// Retailer-specific channels need a tag (or any element naming the retailer)
pub struct RetailerTagRequiredRule;

impl Rule for RetailerTagRequiredRule {
    fn name(&self) -> &'static str {
        "retailer_tag_required"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Compliance
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::RetailerTagMissing]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        if !ctx.profile.retailer_specific || scene.has(ElementKind::RetailerTag) {
            return Ok(vec![]);
        }

        let name = ctx.retailer.name.to_lowercase();
        let named = !name.is_empty()
            && scene.elements.iter().any(|e| {
                e.text_content()
                    .into_iter()
                    .chain(e.asset())
                    .any(|s| s.to_lowercase().contains(&name))
            });
        if named {
            return Ok(vec![]);
        }

        Ok(vec![Issue::new(
            IssueCode::RetailerTagMissing,
            format!("{} channel requires a {} tag", ctx.profile.channel, ctx.retailer.name),
        )
        .with_fix(format!("Add a tag reading '{}'", ctx.retailer.canonical_tag))])
    }
}

/// Tag text must be one of the approved strings
pub struct RetailerTagTextRule;

impl Rule for RetailerTagTextRule {
    fn name(&self) -> &'static str {
        "retailer_tag_text"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Compliance
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::RetailerTagInvalid]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        for (index, tag) in scene.of_kind(ElementKind::RetailerTag) {
            // Artwork tags carry no text to check
            if tag.text_content().is_none() && tag.asset().is_some() {
                continue;
            }
            let text = tag.text_content().unwrap_or("");
            if !ctx.retailer.is_approved(text) {
                issues.push(
                    Issue::new(
                        IssueCode::RetailerTagInvalid,
                        format!(
                            "Tag text '{}' is not allowed. Must be one of: {}",
                            text.trim(),
                            ctx.retailer.approved_tags.join(", ")
                        ),
                    )
                    .with_fix(format!("Change text to '{}'", ctx.retailer.canonical_tag))
                    .at(index, tag),
                );
            }
        }
        Ok(issues)
    }
}

/// Regulated products need a disclaimer element
pub struct DisclaimerRequiredRule;

impl Rule for DisclaimerRequiredRule {
    fn name(&self) -> &'static str {
        "disclaimer_required"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Compliance
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::DisclaimerMissing]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        if !ctx.regulated || scene.has(ElementKind::Disclaimer) {
            return Ok(vec![]);
        }
        Ok(vec![Issue::new(
            IssueCode::DisclaimerMissing,
            "A disclaimer is required for regulated products",
        )
        .with_fix("Add a black disclaimer element")])
    }
}

/// Disclaimers are always black. An absent color counts as black.
pub struct DisclaimerColorRule;

impl Rule for DisclaimerColorRule {
    fn name(&self) -> &'static str {
        "disclaimer_color"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Compliance
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::DisclaimerColorInvalid]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        for (index, disclaimer) in scene.of_kind(ElementKind::Disclaimer) {
            let Some(color) = disclaimer.color() else {
                continue;
            };
            if Rgb::parse(color).ok() != Some(Rgb::BLACK) {
                issues.push(
                    Issue::new(
                        IssueCode::DisclaimerColorInvalid,
                        format!("Disclaimer color must be black (#000000), got {}", color),
                    )
                    .with_fix("Change disclaimer color to #000000")
                    .at(index, disclaimer),
                );
            }
        }
        Ok(issues)
    }
}

/// Disclaimer height in canvas pixels must meet the channel minimum
pub struct DisclaimerSizeRule;

impl Rule for DisclaimerSizeRule {
    fn name(&self) -> &'static str {
        "disclaimer_size"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Compliance
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::DisclaimerTooSmall]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let min_px = ctx.profile.disclaimer_min_px;
        let mut issues = Vec::new();
        for (index, disclaimer) in scene.of_kind(ElementKind::Disclaimer) {
            let height_pct = disclaimer.frame().height.unwrap_or(0.0);
            let height_px = to_absolute(height_pct, ctx.canvas.height);
            if height_px < min_px {
                issues.push(
                    Issue::new(
                        IssueCode::DisclaimerTooSmall,
                        format!(
                            "Disclaimer height must be at least {}px, currently {:.0}px",
                            min_px, height_px
                        ),
                    )
                    .with_fix(format!(
                        "Increase disclaimer height to at least {:.1}%",
                        min_px / ctx.canvas.height * 100.0
                    ))
                    .at(index, disclaimer),
                );
            }
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, Fixture};
    use placard_core::Channel;
    use placard_scene::Element;

    fn tag(text: &str) -> Element {
        Element::text(ElementKind::RetailerTag, text).with_rect(5.0, 80.0, 30.0, 5.0)
    }

    #[test]
    fn test_tag_required_on_retailer_channel() {
        let fx = Fixture::stories();
        let scene = Scene::new("s").with(Element::headline("Fresh"));
        let issues = RetailerTagRequiredRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(codes(&issues), vec![IssueCode::RetailerTagMissing]);

        let with_tag = scene.clone().with(tag("Only at Tesco"));
        assert!(RetailerTagRequiredRule
            .evaluate(&with_tag, &fx.ctx())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_tag_satisfied_by_retailer_name() {
        let fx = Fixture::stories();
        let by_text = Scene::new("s").with(Element::subhead("Now at TESCO"));
        assert!(RetailerTagRequiredRule
            .evaluate(&by_text, &fx.ctx())
            .unwrap()
            .is_empty());

        let by_asset = Scene::new("s").with(Element::logo("brand/tesco-lockup.png"));
        assert!(RetailerTagRequiredRule
            .evaluate(&by_asset, &fx.ctx())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_tag_not_required_off_retailer_channel() {
        let mut fx = Fixture::channel(Channel::Facebook);
        fx.profile.retailer_specific = false;
        let scene = Scene::new("s");
        assert!(RetailerTagRequiredRule
            .evaluate(&scene, &fx.ctx())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_tag_text() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(tag(" Available at Tesco "))
            .with(tag("Buy at Tesco"));
        let issues = RetailerTagTextRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element_index, Some(1));
    }

    #[test]
    fn test_disclaimer_required_only_when_regulated() {
        let scene = Scene::new("s");
        let plain = Fixture::stories();
        assert!(DisclaimerRequiredRule
            .evaluate(&scene, &plain.ctx())
            .unwrap()
            .is_empty());

        let regulated = Fixture::stories().regulated();
        let issues = DisclaimerRequiredRule.evaluate(&scene, &regulated.ctx()).unwrap();
        assert_eq!(codes(&issues), vec![IssueCode::DisclaimerMissing]);
        assert!(issues[0].is_hard());
    }

    #[test]
    fn test_disclaimer_color() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::text(ElementKind::Disclaimer, "a").with_color("#000"))
            .with(Element::text(ElementKind::Disclaimer, "b").with_color("#FFFFFF"))
            .with(Element::text(ElementKind::Disclaimer, "c"))
            .with(Element::text(ElementKind::Disclaimer, "d").with_color("black"));
        let issues = DisclaimerColorRule.evaluate(&scene, &fx.ctx()).unwrap();
        let flagged: Vec<_> = issues.iter().filter_map(|i| i.element_index).collect();
        assert_eq!(flagged, vec![1, 3]);
    }

    #[test]
    fn test_disclaimer_size() {
        let fx = Fixture::stories();
        // 1% of 1920 = 19.2px, 2% = 38.4px
        let scene = Scene::new("s")
            .with(Element::text(ElementKind::Disclaimer, "a").with_rect(5.0, 80.0, 40.0, 1.0))
            .with(Element::text(ElementKind::Disclaimer, "b").with_rect(5.0, 85.0, 40.0, 2.0))
            .with(Element::text(ElementKind::Disclaimer, "c"));
        let issues = DisclaimerSizeRule.evaluate(&scene, &fx.ctx()).unwrap();
        let flagged: Vec<_> = issues.iter().filter_map(|i| i.element_index).collect();
        assert_eq!(flagged, vec![0, 2]);
    }
}
