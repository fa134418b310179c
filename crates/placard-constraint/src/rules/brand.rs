//! Brand identity and visual quality checks
//!
//! These are advisory: every code here is a warn. They run only in the
//! comprehensive rule set.

use super::{Rule, RuleContext};
use crate::report::Issue;
use crate::types::{IssueCode, RuleGroup};
use placard_core::{Rect, Result, Rgb};
use placard_scene::{Element, ElementKind, Positioned, Scene};

/// Colors allowed outside any brand palette
const NEUTRALS: [Rgb; 5] = [
    Rgb::BLACK,
    Rgb::WHITE,
    Rgb::new(0x33, 0x33, 0x33),
    Rgb::new(0x66, 0x66, 0x66),
    Rgb::new(0x99, 0x99, 0x99),
];

/// Headline to subhead size ratio below which hierarchy reads as weak
const MIN_HIERARCHY_RATIO: f64 = 1.2;

/// Allowed drift of the visual center from the canvas center, percent
const MAX_HORIZONTAL_DRIFT: f64 = 25.0;
/// Band (percent from either edge) the vertical visual center must avoid
const VERTICAL_EDGE_BAND: f64 = 20.0;

/// Positioned, non-background elements with their pixel boxes
fn placed_px<'s>(scene: &'s Scene, ctx: &RuleContext<'_>) -> Vec<(usize, &'s Element, Rect)> {
    scene
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind() != ElementKind::Background)
        .filter_map(|(i, e)| e.rect().map(|r| (i, e, r.to_absolute(ctx.canvas))))
        .collect()
}

/// Logo dimensions within the brand's bounds
pub struct LogoSizeRule;

impl Rule for LogoSizeRule {
    fn name(&self) -> &'static str {
        "logo_size"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Brand
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::LogoTooSmall, IssueCode::LogoTooLarge]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let brand = ctx.brand;
        let mut issues = Vec::new();

        for (index, logo) in scene.of_kind(ElementKind::Logo) {
            let Some(rect) = logo.rect() else {
                continue;
            };
            if rect.width < brand.logo_min_width || rect.height < brand.logo_min_height {
                issues.push(
                    Issue::new(
                        IssueCode::LogoTooSmall,
                        format!(
                            "Logo is too small ({}%x{}%). Minimum {}% width recommended.",
                            rect.width, rect.height, brand.logo_min_width
                        ),
                    )
                    .with_fix("Increase logo size for better visibility")
                    .at(index, logo),
                );
            }
            if rect.width > brand.logo_max_width || rect.height > brand.logo_max_height {
                issues.push(
                    Issue::new(
                        IssueCode::LogoTooLarge,
                        format!("Logo may be too large ({}%x{}%)", rect.width, rect.height),
                    )
                    .with_fix("Consider reducing logo size for better balance")
                    .at(index, logo),
                );
            }
        }
        Ok(issues)
    }
}

/// Nothing may crowd the logo's clear space
pub struct LogoClearSpaceRule;

impl Rule for LogoClearSpaceRule {
    fn name(&self) -> &'static str {
        "logo_clear_space"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Brand
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::LogoClearSpace]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let margin = ctx.canvas.width * ctx.brand.logo_clear_space / 100.0;
        let placed = placed_px(scene, ctx);
        let mut issues = Vec::new();

        for (_, _, logo_px) in placed.iter().filter(|(_, e, _)| e.kind() == ElementKind::Logo) {
            let zone = logo_px.expanded(margin);
            for (index, other, other_px) in &placed {
                if other.kind() == ElementKind::Logo || !zone.intersects(other_px) {
                    continue;
                }
                issues.push(
                    Issue::new(
                        IssueCode::LogoClearSpace,
                        format!("Logo needs more clear space from {}", other.kind()),
                    )
                    .with_fix("Increase spacing between logo and other elements")
                    .at(*index, other),
                );
            }
        }
        Ok(issues)
    }
}

/// Headline must read as larger than the subhead
pub struct HierarchyRule;

impl Rule for HierarchyRule {
    fn name(&self) -> &'static str {
        "hierarchy"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Brand
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::HierarchyViolation, IssueCode::WeakHierarchy]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let last_size = |kind| {
            scene
                .of_kind(kind)
                .last()
                .and_then(|(_, e)| e.effective_font_size())
        };
        let (Some(headline), Some(subhead)) = (
            last_size(ElementKind::Headline),
            last_size(ElementKind::Subhead),
        ) else {
            return Ok(vec![]);
        };

        let mut issues = Vec::new();
        if subhead >= headline {
            issues.push(
                Issue::new(
                    IssueCode::HierarchyViolation,
                    "Subhead should be smaller than headline",
                )
                .with_fix(format!("Reduce subhead font size below {}px", headline)),
            );
        }
        let ratio = if subhead > 0.0 { headline / subhead } else { 0.0 };
        if ratio < MIN_HIERARCHY_RATIO {
            issues.push(
                Issue::new(
                    IssueCode::WeakHierarchy,
                    format!("Headline to subhead ratio ({:.1}x) is too small", ratio),
                )
                .with_fix("Increase headline size or decrease subhead for better hierarchy"),
            );
        }
        Ok(issues)
    }
}

/// Positioned elements should not sit on top of each other
pub struct ElementOverlapRule;

impl Rule for ElementOverlapRule {
    fn name(&self) -> &'static str {
        "element_overlap"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Brand
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::ElementOverlap]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let placed = placed_px(scene, ctx);
        let mut issues = Vec::new();

        for (n, (index, element, rect)) in placed.iter().enumerate() {
            for (_, other, other_rect) in &placed[n + 1..] {
                if rect.intersects(other_rect) {
                    issues.push(
                        Issue::new(
                            IssueCode::ElementOverlap,
                            format!("{} overlaps with {}", element.kind(), other.kind()),
                        )
                        .with_fix("Adjust element positions to prevent overlap")
                        .at(*index, element),
                    );
                }
            }
        }
        Ok(issues)
    }
}

/// Area-weighted visual center should sit near the middle of the canvas
pub struct BalanceRule;

impl Rule for BalanceRule {
    fn name(&self) -> &'static str {
        "layout_balance"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Brand
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::LayoutUnbalancedH, IssueCode::LayoutUnbalancedV]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let (mut total, mut sum_x, mut sum_y) = (0.0, 0.0, 0.0);
        for (_, _, px) in placed_px(scene, ctx) {
            if !px.is_finite() || px.width <= 0.0 || px.height <= 0.0 {
                continue;
            }
            let weight = px.width * px.height;
            sum_x += px.center_x() * weight;
            sum_y += px.center_y() * weight;
            total += weight;
        }
        if total <= 0.0 {
            return Ok(vec![]);
        }

        let balance_x = sum_x / total / ctx.canvas.width * 100.0;
        let balance_y = sum_y / total / ctx.canvas.height * 100.0;
        let mut issues = Vec::new();

        if (balance_x - 50.0).abs() > MAX_HORIZONTAL_DRIFT {
            issues.push(
                Issue::new(
                    IssueCode::LayoutUnbalancedH,
                    format!(
                        "Layout is horizontally unbalanced (center at {:.0}%)",
                        balance_x
                    ),
                )
                .with_fix("Consider redistributing elements for better balance"),
            );
        }
        if balance_y < VERTICAL_EDGE_BAND || balance_y > 100.0 - VERTICAL_EDGE_BAND {
            issues.push(
                Issue::new(
                    IssueCode::LayoutUnbalancedV,
                    format!(
                        "Layout may be vertically unbalanced (center at {:.0}%)",
                        balance_y
                    ),
                )
                .with_fix("Consider adjusting vertical element distribution"),
            );
        }
        Ok(issues)
    }
}

/// Explicit element colors should come from the brand palette
pub struct BrandPaletteRule;

impl Rule for BrandPaletteRule {
    fn name(&self) -> &'static str {
        "brand_palette"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Brand
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::BrandColorMismatch]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        // Unparseable palette entries can never match
        let palette: Vec<Rgb> = ctx
            .brand
            .colors
            .iter()
            .filter_map(|c| Rgb::parse(c).ok())
            .collect();
        if palette.is_empty() {
            return Ok(vec![]);
        }

        let mut issues = Vec::new();
        for (index, element) in scene.elements.iter().enumerate() {
            if element.kind() == ElementKind::Background {
                continue;
            }
            let Some(raw) = element.color() else {
                continue;
            };
            let color = Rgb::parse(raw).ok();
            if color.is_some_and(|c| palette.contains(&c) || NEUTRALS.contains(&c)) {
                continue;
            }

            let mut issue = Issue::new(
                IssueCode::BrandColorMismatch,
                format!("Color {} in {} is not in brand palette", raw, element.kind()),
            );
            if let Some(color) = color {
                let closest = palette
                    .iter()
                    .copied()
                    .min_by(|a, b| a.distance(color).total_cmp(&b.distance(color)));
                if let Some(closest) = closest {
                    issue = issue.with_fix(format!("Consider using brand color {}", closest));
                }
            }
            issues.push(issue.at(index, element));
        }
        Ok(issues)
    }
}
