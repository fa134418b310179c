//! Presence, placement, typography and contrast rules

use super::{mentions_any, Rule, RuleContext};
use crate::report::Issue;
use crate::types::{IssueCode, RuleGroup};
use placard_core::geometry::band_hits;
use placard_core::{contrast_ratio, required_ratio, Rect, Result};
use placard_scene::{Element, ElementKind, Positioned, Scene};

/// Font size (reference pixels) from which text counts as large for WCAG
pub const LARGE_TEXT_PX: f64 = 24.0;

/// Minimum clearance in pixels between a packshot and call-to-action copy
pub const CTA_SAFE_GAP_PX: f64 = 24.0;

const CTA_KEYWORDS: &[&str] = &["shop", "buy", "get", "discover"];

/// Kinds the safe-zone bands do not apply to
fn exempt_from_safe_zone(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Background | ElementKind::RetailerTag | ElementKind::Disclaimer
    )
}

/// Content must stay out of the channel's cropped top and bottom bands
pub struct SafeZoneRule;

impl Rule for SafeZoneRule {
    fn name(&self) -> &'static str {
        "safe_zone"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[
            IssueCode::SafeZoneTopViolation,
            IssueCode::SafeZoneBottomViolation,
        ]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let zone = &ctx.profile.safe_zone;
        if zone.is_empty() {
            return Ok(vec![]);
        }

        let mut issues = Vec::new();
        for (index, element) in scene.elements.iter().enumerate() {
            if exempt_from_safe_zone(element.kind()) {
                continue;
            }
            let Some(rect) = element.rect() else {
                continue;
            };

            let hits = band_hits(&rect, ctx.canvas, zone);
            if hits.top {
                let band = zone.top_px(ctx.canvas.height);
                issues.push(
                    Issue::new(
                        IssueCode::SafeZoneTopViolation,
                        format!("{} is in the top safe zone (top {:.0}px)", element.kind(), band),
                    )
                    .with_fix(format!("Move element below {:.0}px from top", band))
                    .at(index, element),
                );
            }
            if hits.bottom {
                let band = ctx.canvas.height - zone.bottom_start_px(ctx.canvas.height);
                issues.push(
                    Issue::new(
                        IssueCode::SafeZoneBottomViolation,
                        format!(
                            "{} is in the bottom safe zone (bottom {:.0}px)",
                            element.kind(),
                            band
                        ),
                    )
                    .with_fix(format!("Move element above {:.0}px from bottom", band))
                    .at(index, element),
                );
            }
        }
        Ok(issues)
    }
}

/// Headline and body copy minimum sizes
pub struct FontSizeRule;

impl Rule for FontSizeRule {
    fn name(&self) -> &'static str {
        "font_size"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Typography
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::FontSizeTooSmall]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        for (index, element) in scene.elements.iter().enumerate() {
            let min = match element.kind() {
                ElementKind::Headline => ctx.profile.headline_min_font,
                ElementKind::Subhead => ctx.profile.body_min_font,
                _ => continue,
            };
            let size = element.effective_font_size().unwrap_or(0.0);
            if size < min {
                issues.push(
                    Issue::new(
                        IssueCode::FontSizeTooSmall,
                        format!(
                            "{} font size ({}px) is below minimum ({}px)",
                            element.kind(),
                            size,
                            min
                        ),
                    )
                    .with_fix(format!("Increase font size to at least {}px", min))
                    .at(index, element),
                );
            }
        }
        Ok(issues)
    }
}

/// WCAG AA contrast of headline and subhead against the background
pub struct ContrastRule;

impl Rule for ContrastRule {
    fn name(&self) -> &'static str {
        "contrast"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Typography
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::ContrastFailure]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let background = scene.background_color();
        let mut issues = Vec::new();

        for (index, element) in scene.elements.iter().enumerate() {
            if !matches!(element.kind(), ElementKind::Headline | ElementKind::Subhead) {
                continue;
            }
            let Some(color) = element.effective_color() else {
                continue;
            };
            let is_large = element.effective_font_size().unwrap_or(0.0) >= LARGE_TEXT_PX;
            let ratio = contrast_ratio(color, background);
            let threshold = required_ratio(is_large);

            if ratio < threshold {
                issues.push(
                    Issue::new(
                        IssueCode::ContrastFailure,
                        format!(
                            "{} contrast ratio ({:.2}:1) is below WCAG AA threshold ({}:1)",
                            element.kind(),
                            ratio,
                            threshold
                        ),
                    )
                    .with_fix(format!(
                        "Change text color to improve contrast with background {}",
                        background
                    ))
                    .at(index, element),
                );
            }
        }
        Ok(issues)
    }
}

/// A creative needs a background, at least one packshot and a logo
pub struct RequiredElementsRule;

impl Rule for RequiredElementsRule {
    fn name(&self) -> &'static str {
        "required_elements"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::RequiredElementsMissing]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let missing: Vec<&str> = [
            ElementKind::Background,
            ElementKind::Packshot,
            ElementKind::Logo,
        ]
        .into_iter()
        .filter(|k| !scene.has(*k))
        .map(|k| k.as_str())
        .collect();

        if missing.is_empty() {
            return Ok(vec![]);
        }
        Ok(vec![Issue::new(
            IssueCode::RequiredElementsMissing,
            format!("Missing required elements: {}", missing.join(", ")),
        )
        .with_fix("Add the missing elements")])
    }
}

pub struct BackgroundRule;

impl Rule for BackgroundRule {
    fn name(&self) -> &'static str {
        "background"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::BackgroundMissing]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        if scene.has(ElementKind::Background) {
            return Ok(vec![]);
        }
        Ok(vec![Issue::new(IssueCode::BackgroundMissing, "No background element")
            .with_fix("Add a background")])
    }
}

pub struct LogoRule;

impl Rule for LogoRule {
    fn name(&self) -> &'static str {
        "logo"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::LogoMissing]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        if scene.has(ElementKind::Logo) {
            return Ok(vec![]);
        }
        Ok(vec![
            Issue::new(IssueCode::LogoMissing, "No logo element").with_fix("Add a brand logo")
        ])
    }
}

/// Too many foreground elements for the channel
pub struct ElementCountRule;

impl Rule for ElementCountRule {
    fn name(&self) -> &'static str {
        "element_count"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::TooManyElements]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let count = scene.foreground_count();
        let ceiling = ctx.profile.max_elements;
        if count <= ceiling {
            return Ok(vec![]);
        }
        Ok(vec![Issue::new(
            IssueCode::TooManyElements,
            format!(
                "{} elements exceeds the {} ceiling of {}",
                count, ctx.profile.channel, ceiling
            ),
        )
        .with_fix(format!("Remove {} element(s)", count - ceiling))])
    }
}

/// Price tiles must sit clear of every other foreground element
pub struct PriceTileOverlapRule;

impl Rule for PriceTileOverlapRule {
    fn name(&self) -> &'static str {
        "price_tile_overlap"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::PriceTileOverlap]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let placed: Vec<(usize, &Element, Rect)> = scene
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind() != ElementKind::Background)
            .filter_map(|(i, e)| e.rect().map(|r| (i, e, r)))
            .collect();

        let mut issues = Vec::new();
        for (tile_index, tile, tile_rect) in &placed {
            if tile.kind() != ElementKind::PriceTile {
                continue;
            }
            for (index, other, rect) in &placed {
                if other.kind() == ElementKind::PriceTile || !tile_rect.intersects(rect) {
                    continue;
                }
                issues.push(
                    Issue::new(
                        IssueCode::PriceTileOverlap,
                        format!(
                            "Price tile {} overlaps {}",
                            tile.label(*tile_index),
                            other.label(*index)
                        ),
                    )
                    .with_fix(format!("Move {} away from the price tile", other.kind()))
                    .at(*index, other),
                );
            }
        }
        Ok(issues)
    }
}

/// Call-to-action copy needs clearance from every packshot
pub struct CtaSafeGapRule;

impl Rule for CtaSafeGapRule {
    fn name(&self) -> &'static str {
        "cta_safe_gap"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::CtaSafeGapViolation]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let ctas: Vec<(usize, &Element, Rect)> = scene
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.kind(), ElementKind::Headline | ElementKind::Subhead))
            .filter(|(_, e)| {
                e.text_content()
                    .is_some_and(|t| mentions_any(&t.to_lowercase(), CTA_KEYWORDS))
            })
            .filter_map(|(i, e)| e.rect().map(|r| (i, e, r.to_absolute(ctx.canvas))))
            .collect();
        if ctas.is_empty() {
            return Ok(vec![]);
        }

        let mut issues = Vec::new();
        for (_, packshot) in scene.of_kind(ElementKind::Packshot) {
            let Some(packshot_px) = packshot.rect().map(|r| r.to_absolute(ctx.canvas)) else {
                continue;
            };
            for (index, cta, cta_px) in &ctas {
                let gap = packshot_px.gap(cta_px);
                if gap < CTA_SAFE_GAP_PX {
                    issues.push(
                        Issue::new(
                            IssueCode::CtaSafeGapViolation,
                            format!(
                                "Gap between packshot and CTA ({:.0}px) is less than required ({}px)",
                                gap, CTA_SAFE_GAP_PX
                            ),
                        )
                        .with_fix(format!("Increase gap to at least {}px", CTA_SAFE_GAP_PX))
                        .at(*index, cta),
                    );
                }
            }
        }
        Ok(issues)
    }
}

/// Packshots may show people, which needs model consent. Raised once.
pub struct PeopleInPhotographyRule;

impl Rule for PeopleInPhotographyRule {
    fn name(&self) -> &'static str {
        "people_in_photography"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Compliance
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::PeopleInPhotography]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let Some((index, packshot)) = scene.of_kind(ElementKind::Packshot).next() else {
            return Ok(vec![]);
        };
        Ok(vec![Issue::new(
            IssueCode::PeopleInPhotography,
            "If packshot contains people, ensure model consent is obtained",
        )
        .with_fix("Verify model consent documentation is on file")
        .at(index, packshot)])
    }
}

/// Foreground elements must lie inside the canvas
pub struct OutOfBoundsRule;

impl Rule for OutOfBoundsRule {
    fn name(&self) -> &'static str {
        "out_of_bounds"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Layout
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::OutOfBounds]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        for (index, element) in scene.elements.iter().enumerate() {
            if element.kind() == ElementKind::Background {
                continue;
            }
            let Some(rect) = element.rect() else {
                continue;
            };
            if !rect.is_finite() || !Rect::FULL.contains(&rect) {
                issues.push(
                    Issue::new(
                        IssueCode::OutOfBounds,
                        format!("{} extends outside the canvas", element.kind()),
                    )
                    .with_fix("Move the element back inside the canvas")
                    .at(index, element),
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

    #[test]
    fn test_safe_zone_top_and_bottom() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF").with_rect(0.0, 0.0, 100.0, 100.0))
            .with(Element::headline("Top").with_rect(10.0, 5.0, 80.0, 10.0))
            .with(Element::logo("l").with_rect(10.0, 85.0, 20.0, 10.0))
            .with(Element::packshot("p").with_rect(20.0, 30.0, 60.0, 40.0));
        let issues = SafeZoneRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(
            codes(&issues),
            vec![
                IssueCode::SafeZoneTopViolation,
                IssueCode::SafeZoneBottomViolation
            ]
        );
        assert_eq!(issues[0].element_index, Some(1));
        assert_eq!(issues[1].element_index, Some(2));
    }

    #[test]
    fn test_safe_zone_exemptions() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::text(ElementKind::RetailerTag, "Only at Tesco").with_rect(5.0, 2.0, 30.0, 5.0))
            .with(Element::text(ElementKind::Disclaimer, "x").with_rect(5.0, 95.0, 30.0, 3.0))
            .with(Element::headline("unplaced"));
        assert!(SafeZoneRule.evaluate(&scene, &fx.ctx()).unwrap().is_empty());
    }

    #[test]
    fn test_safe_zone_off_on_feed_channels() {
        let fx = Fixture::channel(Channel::Facebook);
        let scene = Scene::new("s").with(Element::headline("Top").with_rect(10.0, 1.0, 80.0, 10.0));
        assert!(SafeZoneRule.evaluate(&scene, &fx.ctx()).unwrap().is_empty());
    }

    #[test]
    fn test_font_size_minimums() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::headline("a").with_font_size(18.0))
            .with(Element::headline("b"))
            .with(Element::subhead("c").with_font_size(12.0))
            .with(Element::subhead("d").with_font_size(16.0));
        let issues = FontSizeRule.evaluate(&scene, &fx.ctx()).unwrap();
        let flagged: Vec<_> = issues.iter().filter_map(|i| i.element_index).collect();
        assert_eq!(flagged, vec![0, 2]);
    }

    #[test]
    fn test_contrast() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF"))
            .with(Element::headline("grey").with_color("#CCCCCC"))
            .with(Element::headline("black").with_color("#000000"))
            .with(Element::subhead("nominal"));
        let issues = ContrastRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element_index, Some(1));
    }

    #[test]
    fn test_contrast_large_text_threshold() {
        let fx = Fixture::stories();
        // #767676 on white is about 4.54:1, #949494 about 3.03:1
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF"))
            .with(Element::headline("large").with_color("#949494").with_font_size(30.0))
            .with(Element::headline("small").with_color("#949494").with_font_size(20.0));
        let issues = ContrastRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element_index, Some(2));
    }

    #[test]
    fn test_empty_scene_presence_rules() {
        let fx = Fixture::stories();
        let scene = Scene::new("empty");
        assert_eq!(
            codes(&RequiredElementsRule.evaluate(&scene, &fx.ctx()).unwrap()),
            vec![IssueCode::RequiredElementsMissing]
        );
        assert_eq!(
            codes(&BackgroundRule.evaluate(&scene, &fx.ctx()).unwrap()),
            vec![IssueCode::BackgroundMissing]
        );
        assert_eq!(
            codes(&LogoRule.evaluate(&scene, &fx.ctx()).unwrap()),
            vec![IssueCode::LogoMissing]
        );
    }

    #[test]
    fn test_required_elements_message_lists_missing() {
        let fx = Fixture::stories();
        let scene = Scene::new("s").with(Element::background("#FFFFFF"));
        let issues = RequiredElementsRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(issues[0].message, "Missing required elements: packshot, logo");
    }

    #[test]
    fn test_element_count_is_warn() {
        let fx = Fixture::stories();
        let scene = (0..8).fold(Scene::new("busy").with(Element::background("#FFFFFF")), |s, i| {
            s.with(Element::packshot(&format!("p{}.png", i)))
        });
        let issues = ElementCountRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(codes(&issues), vec![IssueCode::TooManyElements]);
        assert!(!issues[0].is_hard());
    }

    #[test]
    fn test_price_tile_overlap() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF").with_rect(0.0, 0.0, 100.0, 100.0))
            .with(Element::text(ElementKind::PriceTile, "£2").with_rect(60.0, 60.0, 20.0, 10.0))
            .with(Element::packshot("p").with_rect(50.0, 50.0, 20.0, 20.0))
            .with(Element::logo("l").with_rect(80.0, 60.0, 10.0, 10.0));
        let issues = PriceTileOverlapRule.evaluate(&scene, &fx.ctx()).unwrap();
        // the logo only shares an edge
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element_index, Some(2));
    }

    #[test]
    fn test_out_of_bounds() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF").with_rect(-5.0, -5.0, 110.0, 110.0))
            .with(Element::packshot("p").with_rect(90.0, 10.0, 20.0, 20.0))
            .with(Element::logo("l").with_rect(0.0, 0.0, 100.0, 100.0));
        let issues = OutOfBoundsRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element_index, Some(1));
    }

    #[test]
    fn test_out_of_bounds_flags_non_finite_boxes() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::packshot("p").with_rect(10.0, 10.0, f64::NAN, 20.0))
            .with(Element::logo("l").with_rect(f64::INFINITY, 10.0, 10.0, 10.0));
        let issues = OutOfBoundsRule.evaluate(&scene, &fx.ctx()).unwrap();
        let flagged: Vec<_> = issues.iter().filter_map(|i| i.element_index).collect();
        assert_eq!(flagged, vec![0, 1]);
    }

    #[test]
    fn test_cta_safe_gap() {
        let fx = Fixture::stories();
        // packshot bottom at 60% = 1152px
        let scene = Scene::new("s")
            .with(Element::packshot("p").with_rect(20.0, 30.0, 60.0, 30.0))
            .with(Element::headline("Shop now").with_rect(10.0, 60.5, 80.0, 5.0))
            .with(Element::subhead("Discover more").with_rect(10.0, 62.0, 80.0, 5.0))
            .with(Element::subhead("Fresh daily").with_rect(10.0, 60.0, 80.0, 5.0))
            .with(Element::headline("Buy today"));
        let issues = CtaSafeGapRule.evaluate(&scene, &fx.ctx()).unwrap();
        // 0.5% of 1920 is 9.6px, 2% is 38.4px; plain copy and unplaced CTAs are ignored
        let flagged: Vec<_> = issues.iter().filter_map(|i| i.element_index).collect();
        assert_eq!(flagged, vec![1]);
        assert!(issues[0].message.contains("(10px)"));
    }

    #[test]
    fn test_cta_without_packshot_passes() {
        let fx = Fixture::stories();
        let scene = Scene::new("s").with(Element::headline("Shop now").with_rect(10.0, 60.0, 80.0, 5.0));
        assert!(CtaSafeGapRule.evaluate(&scene, &fx.ctx()).unwrap().is_empty());
    }

    #[test]
    fn test_people_in_photography_warns_once() {
        let fx = Fixture::stories();
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF"))
            .with(Element::packshot("a.png"))
            .with(Element::packshot("b.png"));
        let issues = PeopleInPhotographyRule.evaluate(&scene, &fx.ctx()).unwrap();
        assert_eq!(codes(&issues), vec![IssueCode::PeopleInPhotography]);
        assert_eq!(issues[0].element_index, Some(1));
        assert!(!issues[0].is_hard());
        assert!(PeopleInPhotographyRule
            .evaluate(&Scene::new("none"), &fx.ctx())
            .unwrap()
            .is_empty());
    }
}
