//! Keyword rules over the creative's copy
//!
//! Matching is a case-insensitive substring search over every text element
//! joined together. There is no stemming or negation handling, so "winning"
//! trips the competition rule.

use super::{copy_text, mentions_any, Rule, RuleContext};
use crate::report::Issue;
use crate::types::{IssueCode, RuleGroup};
use placard_core::{PlacardError, Result};
use placard_scene::{ElementKind, Scene};
use regex::Regex;
use std::sync::LazyLock;

type Pattern = LazyLock<std::result::Result<Regex, regex::Error>>;

static DONATION_AMOUNT: Pattern =
    LazyLock::new(|| Regex::new(r"[£$€]\s?\d+(\.\d{1,2})?|\d+\s?p\b|\d+(\.\d+)?\s?%"));

static CURRENCY_AMOUNT: Pattern = LazyLock::new(|| Regex::new(r"[£$€]\s?\d+([.,]\d{1,2})?"));

static GUARANTEE: Pattern = LazyLock::new(|| {
    Regex::new(r"money\s*-?\s*back|\b(guarantee|guaranteed|refund|return)\b|satisfaction\s+(or|guaranteed)")
});

const OFFER_KEYWORDS: &[&str] = &[
    "% off",
    "buy one get one",
    "bogof",
    "limited time",
    "half price",
    "special offer",
];
const TERMS_REFERENCES: &[&str] = &["t&c", "terms and conditions", "terms & conditions", "terms apply"];

const COMPETITION_KEYWORDS: &[&str] = &["win", "prize", "giveaway", "competition", "sweepstake"];
const PROMOTER_DISCLOSURES: &[&str] = &["promoter", "no purchase necessary"];

const SUSTAINABILITY_KEYWORDS: &[&str] = &[
    "sustainable",
    "eco-friendly",
    "carbon neutral",
    "recyclable",
    "net zero",
    "plastic free",
    "biodegradable",
];
const CERTIFICATIONS: &[&str] = &[
    "fsc",
    "fairtrade",
    "rainforest alliance",
    "b corp",
    "carbon trust",
    "msc",
    "soil association",
];

const CHARITY_KEYWORDS: &[&str] = &["charity", "donat", "fundrais"];

const CLAIM_KEYWORDS: &[&str] = &["#1", "number one", "best", "clinically proven", "leading"];
const FOOTNOTE_MARKERS: &[&str] = &["*", "†", "¹"];

fn pattern(rule: &str, lazy: &'static Pattern) -> Result<&'static Regex> {
    LazyLock::force(lazy)
        .as_ref()
        .map_err(|e| PlacardError::RuleFailed {
            rule: rule.to_string(),
            message: e.to_string(),
        })
}

/// What silences a triggered keyword rule
enum Clearance {
    Keywords(&'static [&'static str]),
    Pattern(&'static Pattern),
}

/// "If the copy mentions X it must also mention Y"
pub struct KeywordRule {
    name: &'static str,
    code: IssueCode,
    codes: &'static [IssueCode],
    triggers: &'static [&'static str],
    clearance: Clearance,
    message: &'static str,
    fix: &'static str,
}

impl KeywordRule {
    /// Offer copy needs a terms reference
    pub fn terms() -> Self {
        Self {
            name: "terms_required",
            code: IssueCode::TermsMissing,
            codes: &[IssueCode::TermsMissing],
            triggers: OFFER_KEYWORDS,
            clearance: Clearance::Keywords(TERMS_REFERENCES),
            message: "Offer copy requires a terms and conditions reference",
            fix: "Add a 'T&Cs apply' line",
        }
    }

    /// Competitions need a promoter disclosure
    pub fn competition() -> Self {
        Self {
            name: "competition_disclosure",
            code: IssueCode::CompetitionDisclosureMissing,
            codes: &[IssueCode::CompetitionDisclosureMissing],
            triggers: COMPETITION_KEYWORDS,
            clearance: Clearance::Keywords(PROMOTER_DISCLOSURES),
            message: "Competition copy requires a promoter disclosure",
            fix: "Add promoter details or 'No purchase necessary'",
        }
    }

    /// Green claims should name a certification
    pub fn sustainability() -> Self {
        Self {
            name: "sustainability_claim",
            code: IssueCode::SustainabilityClaimUnverified,
            codes: &[IssueCode::SustainabilityClaimUnverified],
            triggers: SUSTAINABILITY_KEYWORDS,
            clearance: Clearance::Keywords(CERTIFICATIONS),
            message: "Sustainability claim does not name a recognised certification",
            fix: "Reference the certification backing the claim",
        }
    }

    /// Charity tie-ins must state what is donated
    pub fn charity() -> Self {
        Self {
            name: "charity_disclosure",
            code: IssueCode::CharityUndisclosed,
            codes: &[IssueCode::CharityUndisclosed],
            triggers: CHARITY_KEYWORDS,
            clearance: Clearance::Pattern(&DONATION_AMOUNT),
            message: "Charity copy must state the donation amount",
            fix: "State the amount donated, e.g. '10p from every pack'",
        }
    }

    /// Comparative and superlative claims need a footnote
    pub fn claims() -> Self {
        Self {
            name: "claim_substantiation",
            code: IssueCode::UnsubstantiatedClaim,
            codes: &[IssueCode::UnsubstantiatedClaim],
            triggers: CLAIM_KEYWORDS,
            clearance: Clearance::Keywords(FOOTNOTE_MARKERS),
            message: "Claims like '#1' or 'best' should carry a substantiating footnote",
            fix: "Add a footnote marker and the supporting source",
        }
    }

    fn cleared(&self, text: &str) -> Result<bool> {
        match &self.clearance {
            Clearance::Keywords(words) => Ok(mentions_any(text, words)),
            Clearance::Pattern(re) => Ok(pattern(self.name, *re)?.is_match(text)),
        }
    }
}

impl Rule for KeywordRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Copy
    }

    fn codes(&self) -> &'static [IssueCode] {
        self.codes
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let text = copy_text(scene);
        if text.is_empty() || !mentions_any(&text, self.triggers) || self.cleared(&text)? {
            return Ok(vec![]);
        }
        Ok(vec![Issue::new(self.code, self.message).with_fix(self.fix)])
    }
}

/// Money-back and guarantee wording in the headline or subhead
pub struct GuaranteeRule;

impl Rule for GuaranteeRule {
    fn name(&self) -> &'static str {
        "money_back_guarantee"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Copy
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::MoneyBackGuarantee]
    }

    fn evaluate(&self, scene: &Scene, _ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let re = pattern(self.name(), &GUARANTEE)?;
        let text = scene
            .elements
            .iter()
            .filter(|e| matches!(e.kind(), ElementKind::Headline | ElementKind::Subhead))
            .filter_map(|e| e.text_content())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if !re.is_match(&text) {
            return Ok(vec![]);
        }
        Ok(vec![Issue::new(
            IssueCode::MoneyBackGuarantee,
            "Money-back guarantees are not allowed",
        )
        .with_fix("Remove guarantee language")])
    }
}

/// Prices set below the channel's minimum price size
pub struct PriceVisibilityRule;

impl Rule for PriceVisibilityRule {
    fn name(&self) -> &'static str {
        "price_visibility"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Typography
    }

    fn codes(&self) -> &'static [IssueCode] {
        &[IssueCode::PriceVisibility]
    }

    fn evaluate(&self, scene: &Scene, ctx: &RuleContext<'_>) -> Result<Vec<Issue>> {
        let re = pattern(self.name(), &CURRENCY_AMOUNT)?;
        let min = ctx.profile.price_min_font;
        let mut issues = Vec::new();

        for (index, element) in scene.elements.iter().enumerate() {
            let Some(text) = element.text_content() else {
                continue;
            };
            if !re.is_match(text) {
                continue;
            }
            let size = element.effective_font_size().unwrap_or(0.0);
            if size < min {
                issues.push(
                    Issue::new(
                        IssueCode::PriceVisibility,
                        format!(
                            "{} shows a price at {}px, below the {}px minimum",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, Fixture};
    use placard_scene::Element;

    fn copy(lines: &[&str]) -> Scene {
        lines
            .iter()
            .fold(Scene::new("copy"), |s, l| s.with(Element::subhead(l)))
    }

    fn fires(rule: &KeywordRule, scene: &Scene) -> bool {
        !rule.evaluate(scene, &Fixture::stories().ctx()).unwrap().is_empty()
    }

    #[test]
    fn test_terms_cleared_by_reference() {
        let rule = KeywordRule::terms();
        assert!(fires(&rule, &copy(&["Buy One Get One Free"])));
        assert!(!fires(&rule, &copy(&["Buy One Get One Free", "T&Cs apply"])));
        assert!(!fires(&rule, &copy(&["Fresh bread daily"])));
    }

    #[test]
    fn test_no_text_never_fires() {
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF"))
            .with(Element::packshot("p.png"));
        for rule in [
            KeywordRule::terms(),
            KeywordRule::competition(),
            KeywordRule::sustainability(),
            KeywordRule::charity(),
            KeywordRule::claims(),
        ] {
            assert!(!fires(&rule, &scene), "{} fired", rule.name());
        }
    }

    #[test]
    fn test_competition_substring_matches() {
        let rule = KeywordRule::competition();
        // No stemming: "winning" contains "win"
        assert!(fires(&rule, &copy(&["Award winning taste"])));
        assert!(!fires(&rule, &copy(&["Win a trip", "Promoter: Acme Ltd"])));
    }

    #[test]
    fn test_sustainability_is_warn() {
        let issues = KeywordRule::sustainability()
            .evaluate(&copy(&["100% recyclable pack"]), &Fixture::stories().ctx())
            .unwrap();
        assert_eq!(codes(&issues), vec![IssueCode::SustainabilityClaimUnverified]);
        assert!(!issues[0].is_hard());

        assert!(!fires(
            &KeywordRule::sustainability(),
            &copy(&["Recyclable pack", "FSC certified"])
        ));
    }

    #[test]
    fn test_charity_needs_amount() {
        let rule = KeywordRule::charity();
        assert!(fires(&rule, &copy(&["Supporting our charity partner"])));
        assert!(!fires(&rule, &copy(&["10p from every pack donated to charity"])));
        assert!(!fires(&rule, &copy(&["We donate £1 per sale"])));
    }

    #[test]
    fn test_claims_need_footnote() {
        let rule = KeywordRule::claims();
        assert!(fires(&rule, &copy(&["The UK's #1 cereal"])));
        assert!(!fires(&rule, &copy(&["The UK's #1 cereal*"])));
    }

    #[test]
    fn test_price_visibility() {
        let fx = Fixture::stories();
        let scene = Scene::new("p")
            .with(Element::headline("Only £3.50"))
            .with(Element::subhead("Now £2"))
            .with(Element::text(ElementKind::PriceTile, "£1.99").with_font_size(20.0))
            .with(Element::subhead("No price here"));
        let issues = PriceVisibilityRule.evaluate(&scene, &fx.ctx()).unwrap();
        // headline is 48px nominal, subhead 24px nominal, tile 20px
        let flagged: Vec<_> = issues.iter().filter_map(|i| i.element_index).collect();
        assert_eq!(flagged, vec![1, 2]);
    }

    #[test]
    fn test_guarantee_wording() {
        let fx = Fixture::stories();
        let flagged = |lines: &[&str]| {
            codes(&GuaranteeRule.evaluate(&copy(lines), &fx.ctx()).unwrap())
                == vec![IssueCode::MoneyBackGuarantee]
        };
        assert!(flagged(&["Love it or your money back"]));
        assert!(flagged(&["Money-back promise"]));
        assert!(flagged(&["Satisfaction guaranteed"]));
        assert!(flagged(&["Fresh", "Easy REFUND"]));
        // "returns" is not the whole word "return"
        assert!(!flagged(&["Free returns"]));
        // whole words only
        assert!(!flagged(&["Returning favourite"]));
        assert!(!flagged(&["Fresh bread daily"]));
    }

    #[test]
    fn test_guarantee_ignores_other_text_elements() {
        let scene = Scene::new("s").with(Element::text(ElementKind::Disclaimer, "Refund policy applies"));
        assert!(GuaranteeRule.evaluate(&scene, &Fixture::stories().ctx()).unwrap().is_empty());
    }
}
