//! Auto-fix resolver and the fix loop with cycle detection

use crate::evaluator::Validator;
use crate::report::{Issue, ValidationResult};
use crate::rules::RuleContext;
use crate::types::IssueCode;
use placard_core::geometry::to_percent;
use placard_core::{suggested_text_color, CanvasContext, Rect};
use placard_scene::{Element, ElementKind, Positioned, Scene};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Upper bound on fix-then-revalidate rounds in incremental mode
pub const MAX_ITERATIONS: usize = 32;

/// Where an auto-added retailer tag goes
const TAG_SLOT: Rect = Rect::new(5.0, 78.0, 40.0, 5.0);

/// Text of an auto-added disclaimer
const DISCLAIMER_TEXT: &str = "Please drink responsibly. drinkaware.co.uk";

/// Minimum height (percent) of an auto-added disclaimer
const DISCLAIMER_HEIGHT: f64 = 3.0;

/// Gap (percent) kept between a relocated element and a safe-zone band
const BAND_CLEARANCE: f64 = 1.0;

/// Preferred landing rows (percent) for elements pushed out of a band
const TOP_LANDING_Y: f64 = 12.0;
const BOTTOM_LANDING_Y: f64 = 70.0;

/// A pure scene transform for one issue. Returns the new scene and a
/// description of what changed, or `None` when the issue cannot be resolved
/// on this scene.
pub type FixFn = fn(&Scene, &Issue, &RuleContext<'_>) -> Option<(Scene, String)>;

/// What the resolver does for one issue code
#[derive(Clone, Copy)]
pub enum FixEntry {
    Transform { strategy: &'static str, apply: FixFn },
    /// Deliberately not auto-fixable, with the reason shown to the user
    Manual(&'static str),
}

impl std::fmt::Debug for FixEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixEntry::Transform { strategy, .. } => write!(f, "Transform({})", strategy),
            FixEntry::Manual(reason) => write!(f, "Manual({:?})", reason),
        }
    }
}

/// A single fix that was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixAction {
    pub code: IssueCode,
    /// Element label, or the scene id for scene-level fixes
    pub target: String,
    pub description: String,
    pub strategy: String,
}

/// An issue the fixer left in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedIssue {
    pub code: IssueCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
    pub reason: String,
}

/// Outcome of fixing one issue
#[derive(Debug, Clone)]
pub enum FixOutcome {
    Applied { scene: Scene, action: FixAction },
    Unresolved { reason: String },
}

/// Issue code to fix lookup
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    entries: HashMap<IssueCode, FixEntry>,
}

impl Resolver {
    /// An empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// A fix or an explicit manual marker for every code the built-in rules emit
    pub fn builtin() -> Self {
        let mut resolver = Self::new();
        let transforms: [(IssueCode, &'static str, FixFn); 12] = [
            (IssueCode::RetailerTagMissing, "add_retailer_tag", add_retailer_tag),
            (IssueCode::RetailerTagInvalid, "rewrite_tag_text", rewrite_tag_text),
            (IssueCode::DisclaimerMissing, "add_disclaimer", add_disclaimer),
            (IssueCode::DisclaimerColorInvalid, "blacken_disclaimer", blacken_disclaimer),
            (IssueCode::DisclaimerTooSmall, "grow_disclaimer", grow_disclaimer),
            (IssueCode::PriceVisibility, "raise_price_size", raise_price_size),
            (IssueCode::SafeZoneTopViolation, "move_below_top_band", move_below_top_band),
            (IssueCode::SafeZoneBottomViolation, "move_above_bottom_band", move_above_bottom_band),
            (IssueCode::FontSizeTooSmall, "raise_font_size", raise_font_size),
            (IssueCode::ContrastFailure, "recolor_text", recolor_text),
            (IssueCode::BackgroundMissing, "add_background", add_background),
            (IssueCode::OutOfBounds, "clamp_to_canvas", clamp_to_canvas),
        ];
        for (code, strategy, apply) in transforms {
            resolver.register(code, FixEntry::Transform { strategy, apply });
        }

        let manual = [
            (IssueCode::TermsMissing, "Terms wording must come from the advertiser"),
            (IssueCode::CompetitionDisclosureMissing, "Promoter details must come from the advertiser"),
            (IssueCode::SustainabilityClaimUnverified, "Certification must be supplied by the advertiser"),
            (IssueCode::CharityUndisclosed, "Donation amount must come from the advertiser"),
            (IssueCode::UnsubstantiatedClaim, "Substantiation must be supplied by the advertiser"),
            (IssueCode::MoneyBackGuarantee, "Guarantee wording must be removed by the advertiser"),
            (IssueCode::RequiredElementsMissing, "Packshot and logo assets must be uploaded"),
            (IssueCode::LogoMissing, "A logo asset must be uploaded"),
            (IssueCode::TooManyElements, "Choose which elements to remove"),
            (IssueCode::PriceTileOverlap, "Rearrange overlapping elements by hand"),
            (IssueCode::CtaSafeGapViolation, "Choose whether the packshot or the call to action moves"),
            (IssueCode::PeopleInPhotography, "Confirm any people shown are integral to the campaign"),
            (IssueCode::LogoTooSmall, "Logo scaling is a brand decision"),
            (IssueCode::LogoTooLarge, "Logo scaling is a brand decision"),
            (IssueCode::LogoClearSpace, "Rearrange elements around the logo by hand"),
            (IssueCode::HierarchyViolation, "Choose which text size to change"),
            (IssueCode::WeakHierarchy, "Choose which text size to change"),
            (IssueCode::ElementOverlap, "Rearrange overlapping elements by hand"),
            (IssueCode::LayoutUnbalancedH, "Rebalancing the layout needs a designer"),
            (IssueCode::LayoutUnbalancedV, "Rebalancing the layout needs a designer"),
            (IssueCode::BrandColorMismatch, "Pick a palette color for the element"),
            (IssueCode::RuleEvaluationFailed, "A rule failure is not a layout problem"),
            (IssueCode::DisclaimerRequired, "Add the disclaimer when assembling the creative"),
        ];
        for (code, reason) in manual {
            resolver.register(code, FixEntry::Manual(reason));
        }
        resolver
    }

    /// Register or replace the entry for a code
    pub fn register(&mut self, code: IssueCode, entry: FixEntry) {
        self.entries.insert(code, entry);
    }

    pub fn entry(&self, code: IssueCode) -> Option<&FixEntry> {
        self.entries.get(&code)
    }

    pub fn has_transform(&self, code: IssueCode) -> bool {
        matches!(self.entries.get(&code), Some(FixEntry::Transform { .. }))
    }

    /// Codes with neither a transform nor a manual marker, deduplicated in input order
    pub fn check_coverage(&self, codes: &[IssueCode]) -> Vec<IssueCode> {
        let mut missing = Vec::new();
        for code in codes {
            if !self.entries.contains_key(code) && !missing.contains(code) {
                missing.push(*code);
            }
        }
        missing
    }

    /// Apply the fix for one issue to a copy of the scene
    pub fn apply(&self, scene: &Scene, issue: &Issue, ctx: &RuleContext<'_>) -> FixOutcome {
        let (strategy, apply) = match self.entries.get(&issue.code) {
            Some(FixEntry::Transform { strategy, apply }) => (*strategy, *apply),
            Some(FixEntry::Manual(reason)) => {
                return FixOutcome::Unresolved {
                    reason: reason.to_string(),
                }
            }
            None => {
                return FixOutcome::Unresolved {
                    reason: "No fix registered".to_string(),
                }
            }
        };

        match apply(scene, issue, ctx) {
            Some((fixed, description)) => {
                let target = match issue.element_index.and_then(|i| scene.element(i).map(|e| (i, e))) {
                    Some((index, element)) => element.label(index),
                    None => scene.id.clone(),
                };
                tracing::debug!(code = %issue.code, strategy, target = %target, "fix applied");
                FixOutcome::Applied {
                    scene: fixed,
                    action: FixAction {
                        code: issue.code,
                        target,
                        description,
                        strategy: strategy.to_string(),
                    },
                }
            }
            None => {
                tracing::warn!(code = %issue.code, strategy, "fix not applicable");
                FixOutcome::Unresolved {
                    reason: format!("'{}' could not be applied to this layout", strategy),
                }
            }
        }
    }
}

/// How `fix_all` schedules fixes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixMode {
    /// One fix, then revalidate, until clean or stuck
    #[default]
    Incremental,
    /// Every fix against the original issue list, one validation at the end
    Batch,
}

impl FixMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixMode::Incremental => "incremental",
            FixMode::Batch => "batch",
        }
    }
}

impl std::str::FromStr for FixMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "incremental" => Ok(FixMode::Incremental),
            "batch" => Ok(FixMode::Batch),
            other => Err(format!("unknown fix mode '{}' (expected incremental or batch)", other)),
        }
    }
}

/// Report of a `fix_all` run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixReport {
    pub mode: FixMode,
    pub actions: Vec<FixAction>,
    pub unresolved: Vec<UnresolvedIssue>,
    pub cycle_detected: bool,
    pub iterations: usize,
    /// Validation of the fixed scene
    pub result: ValidationResult,
}

impl FixReport {
    pub fn remaining(&self) -> usize {
        self.result.issues.len()
    }
}

/// Fixed scene plus the report describing how it got there
#[derive(Debug, Clone)]
pub struct FixRun {
    pub scene: Scene,
    pub report: FixReport,
}

/// Applies resolver fixes using a validator to find and recheck issues
pub struct Fixer<'a> {
    validator: &'a Validator,
}

impl<'a> Fixer<'a> {
    pub fn new(validator: &'a Validator) -> Self {
        Self { validator }
    }

    /// Fix a single issue, as when a user clicks its fix button
    pub fn fix_issue(&self, scene: &Scene, issue: &Issue, ctx: &CanvasContext) -> FixOutcome {
        let profile = self.validator.profile_for(ctx);
        let rule_ctx = self.rule_context(ctx, &profile);
        self.validator.resolver().apply(scene, issue, &rule_ctx)
    }

    /// Fix everything fixable. The input scene is never modified.
    pub fn fix_all(&self, scene: &Scene, ctx: &CanvasContext, mode: FixMode) -> FixRun {
        let run = match mode {
            FixMode::Incremental => self.fix_incremental(scene, ctx),
            FixMode::Batch => self.fix_batch(scene, ctx),
        };
        tracing::info!(
            scene = %scene.id,
            mode = ?mode,
            fixes = run.report.actions.len(),
            remaining = run.report.remaining(),
            cycle = run.report.cycle_detected,
            iterations = run.report.iterations,
            "fix run finished"
        );
        run
    }

    fn rule_context<'p>(
        &'p self,
        ctx: &CanvasContext,
        profile: &'p placard_core::ChannelProfile,
    ) -> RuleContext<'p> {
        RuleContext {
            canvas: ctx.canvas,
            regulated: ctx.regulated,
            profile,
            retailer: self.validator.profiles().retailer(),
            brand: self.validator.profiles().brand(),
        }
    }

    fn fix_incremental(&self, scene: &Scene, ctx: &CanvasContext) -> FixRun {
        let profile = self.validator.profile_for(ctx);
        let rule_ctx = self.rule_context(ctx, &profile);
        let resolver = self.validator.resolver();

        let mut current = scene.clone();
        let mut actions = Vec::new();
        let mut attempted: HashSet<(IssueCode, Option<usize>)> = HashSet::new();
        let mut failures: HashMap<(IssueCode, Option<usize>), String> = HashMap::new();
        let mut cycle_detected = false;
        let mut iterations = 0;

        let result = loop {
            let result = self.validator.validate(&current, ctx);
            if iterations == MAX_ITERATIONS {
                break result;
            }
            iterations += 1;

            let mut next = None;
            for issue in result.issues.iter().filter(|i| resolver.has_transform(i.code)) {
                let key = (issue.code, issue.element_index);
                if attempted.contains(&key) {
                    // Already fixed once and back again
                    if !failures.contains_key(&key) {
                        cycle_detected = true;
                    }
                    continue;
                }
                next = Some(issue);
                break;
            }
            let Some(issue) = next else {
                break result;
            };

            let key = (issue.code, issue.element_index);
            attempted.insert(key);
            match resolver.apply(&current, issue, &rule_ctx) {
                FixOutcome::Applied { scene, action } => {
                    current = scene;
                    actions.push(action);
                }
                FixOutcome::Unresolved { reason } => {
                    failures.insert(key, reason);
                }
            }
        };

        if cycle_detected {
            tracing::warn!(scene = %scene.id, "fix cycle detected");
        }
        let unresolved = unresolved_issues(&result, resolver, &failures);
        FixRun {
            scene: current,
            report: FixReport {
                mode: FixMode::Incremental,
                actions,
                unresolved,
                cycle_detected,
                iterations,
                result,
            },
        }
    }

    fn fix_batch(&self, scene: &Scene, ctx: &CanvasContext) -> FixRun {
        let profile = self.validator.profile_for(ctx);
        let rule_ctx = self.rule_context(ctx, &profile);
        let resolver = self.validator.resolver();

        let original = self.validator.validate(scene, ctx);
        let mut current = scene.clone();
        let mut actions = Vec::new();
        let mut failures = HashMap::new();

        // Indices stay valid because no fix removes or reorders elements
        for issue in original.issues.iter().filter(|i| resolver.has_transform(i.code)) {
            match resolver.apply(&current, issue, &rule_ctx) {
                FixOutcome::Applied { scene, action } => {
                    current = scene;
                    actions.push(action);
                }
                FixOutcome::Unresolved { reason } => {
                    failures.insert((issue.code, issue.element_index), reason);
                }
            }
        }

        let result = self.validator.validate(&current, ctx);
        let unresolved = unresolved_issues(&result, resolver, &failures);
        FixRun {
            scene: current,
            report: FixReport {
                mode: FixMode::Batch,
                actions,
                unresolved,
                cycle_detected: false,
                iterations: 1,
                result,
            },
        }
    }
}

/// Explain every issue still present after fixing
fn unresolved_issues(
    result: &ValidationResult,
    resolver: &Resolver,
    failures: &HashMap<(IssueCode, Option<usize>), String>,
) -> Vec<UnresolvedIssue> {
    result
        .issues
        .iter()
        .map(|issue| {
            let reason = match resolver.entry(issue.code) {
                Some(FixEntry::Manual(reason)) => reason.to_string(),
                None => "No fix registered".to_string(),
                Some(FixEntry::Transform { .. }) => failures
                    .get(&(issue.code, issue.element_index))
                    .cloned()
                    .unwrap_or_else(|| "Fix did not clear the issue".to_string()),
            };
            UnresolvedIssue {
                code: issue.code,
                element_index: issue.element_index,
                reason,
            }
        })
        .collect()
}

/// Run `edit` on a copy of the issue's element
fn edit_element(
    scene: &Scene,
    issue: &Issue,
    edit: impl FnOnce(&mut Element) -> Option<String>,
) -> Option<(Scene, String)> {
    let index = issue.element_index?;
    let mut fixed = scene.clone();
    let element = fixed.elements.get_mut(index)?;
    let description = edit(element)?;
    Some((fixed, description))
}

fn add_retailer_tag(scene: &Scene, _issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    let text = &ctx.retailer.canonical_tag;
    let tag = Element::text(ElementKind::RetailerTag, text).with_rect(
        TAG_SLOT.x,
        TAG_SLOT.y,
        TAG_SLOT.width,
        TAG_SLOT.height,
    );
    Some((scene.clone().with(tag), format!("Added retailer tag '{}'", text)))
}

fn rewrite_tag_text(scene: &Scene, issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    let text = &ctx.retailer.canonical_tag;
    edit_element(scene, issue, |element| {
        if element.kind() != ElementKind::RetailerTag || !element.set_text(text) {
            return None;
        }
        Some(format!("Changed tag text to '{}'", text))
    })
}

/// Percent height that clears the disclaimer minimum
fn disclaimer_height(ctx: &RuleContext<'_>) -> f64 {
    to_percent(ctx.profile.disclaimer_min_px + 1.0, ctx.canvas.height)
}

fn add_disclaimer(scene: &Scene, _issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    let height = disclaimer_height(ctx).max(DISCLAIMER_HEIGHT);
    if height > 100.0 {
        return None;
    }
    let y = (97.0 - height).max(0.0);
    let disclaimer = Element::text(ElementKind::Disclaimer, DISCLAIMER_TEXT)
        .with_color("#000000")
        .with_rect(5.0, y, 90.0, height);
    Some((scene.clone().with(disclaimer), "Added black disclaimer".to_string()))
}

fn blacken_disclaimer(scene: &Scene, issue: &Issue, _ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    edit_element(scene, issue, |element| {
        if element.kind() != ElementKind::Disclaimer || !element.set_color("#000000") {
            return None;
        }
        Some("Set disclaimer color to #000000".to_string())
    })
}

fn grow_disclaimer(scene: &Scene, issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    let height = disclaimer_height(ctx);
    if height > 100.0 {
        return None;
    }
    edit_element(scene, issue, |element| {
        if element.kind() != ElementKind::Disclaimer {
            return None;
        }
        let frame = element.frame_mut();
        let x = frame.x.unwrap_or(5.0);
        let y = frame.y.unwrap_or(97.0 - height).min(100.0 - height).max(0.0);
        let width = frame.width.unwrap_or(90.0);
        frame.set_rect(Rect::new(x, y, width, height));
        Some(format!("Grew disclaimer to {:.2}% of canvas height", height))
    })
}

fn raise_price_size(scene: &Scene, issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    let size = ctx.profile.price_min_font;
    edit_element(scene, issue, |element| {
        element
            .set_font_size(size)
            .then(|| format!("Raised price font size to {}px", size))
    })
}

/// Vertical range (top, bottom) a box of `height` may start in without touching either band
fn safe_rows(height: f64, ctx: &RuleContext<'_>) -> Option<(f64, f64)> {
    let zone = &ctx.profile.safe_zone;
    let lowest = zone.top + BAND_CLEARANCE;
    let highest = 100.0 - zone.bottom - BAND_CLEARANCE - height;
    (highest >= lowest).then_some((lowest, highest))
}

fn move_below_top_band(scene: &Scene, issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    edit_element(scene, issue, |element| {
        let rect = element.rect()?;
        let (lowest, highest) = safe_rows(rect.height, ctx)?;
        let y = TOP_LANDING_Y.max(lowest).min(highest);
        element.frame_mut().y = Some(y);
        Some(format!("Moved below the top safe zone to y={:.2}%", y))
    })
}

fn move_above_bottom_band(
    scene: &Scene,
    issue: &Issue,
    ctx: &RuleContext<'_>,
) -> Option<(Scene, String)> {
    edit_element(scene, issue, |element| {
        let rect = element.rect()?;
        let (lowest, highest) = safe_rows(rect.height, ctx)?;
        let y = BOTTOM_LANDING_Y.min(highest).max(lowest);
        element.frame_mut().y = Some(y);
        Some(format!("Moved above the bottom safe zone to y={:.2}%", y))
    })
}

fn raise_font_size(scene: &Scene, issue: &Issue, ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    edit_element(scene, issue, |element| {
        let kind = element.kind();
        let min = match kind {
            ElementKind::Headline => ctx.profile.headline_min_font,
            ElementKind::Subhead => ctx.profile.body_min_font,
            _ => return None,
        };
        let size = kind.nominal_font_size().unwrap_or(min).max(min);
        element
            .set_font_size(size)
            .then(|| format!("Raised {} font size to {}px", kind, size))
    })
}

fn recolor_text(scene: &Scene, issue: &Issue, _ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    let color = suggested_text_color(scene.background_color()).to_hex();
    edit_element(scene, issue, |element| {
        if element.as_text().is_none() || !element.set_color(&color) {
            return None;
        }
        Some(format!("Changed text color to {}", color))
    })
}

fn add_background(scene: &Scene, _issue: &Issue, _ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    // Appended so existing indices hold; z keeps it beneath everything
    let z = scene.elements.iter().map(|e| e.z()).min().unwrap_or(0).min(0) - 1;
    let background = Element::background("#FFFFFF")
        .with_rect(0.0, 0.0, 100.0, 100.0)
        .with_z(z);
    Some((scene.clone().with(background), "Added white background".to_string()))
}

fn clamp_to_canvas(scene: &Scene, issue: &Issue, _ctx: &RuleContext<'_>) -> Option<(Scene, String)> {
    edit_element(scene, issue, |element| {
        let clamped = element.rect()?.clamped_to_canvas();
        element.frame_mut().set_rect(clamped);
        Some(format!(
            "Moved inside the canvas at ({:.2}%, {:.2}%)",
            clamped.x, clamped.y
        ))
    })
}
