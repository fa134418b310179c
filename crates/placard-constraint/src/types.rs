//! Issue codes and severities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks export
    Hard,
    /// Advisory only
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hard => "hard",
            Severity::Warn => "warn",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable issue codes. The serialized form is the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    RetailerTagMissing,
    RetailerTagInvalid,
    DisclaimerMissing,
    DisclaimerColorInvalid,
    DisclaimerTooSmall,
    TermsMissing,
    CompetitionDisclosureMissing,
    SustainabilityClaimUnverified,
    CharityUndisclosed,
    PriceVisibility,
    UnsubstantiatedClaim,
    MoneyBackGuarantee,
    SafeZoneTopViolation,
    SafeZoneBottomViolation,
    FontSizeTooSmall,
    ContrastFailure,
    RequiredElementsMissing,
    TooManyElements,
    BackgroundMissing,
    LogoMissing,
    PriceTileOverlap,
    OutOfBounds,
    CtaSafeGapViolation,
    PeopleInPhotography,
    LogoTooSmall,
    LogoTooLarge,
    LogoClearSpace,
    HierarchyViolation,
    WeakHierarchy,
    ElementOverlap,
    LayoutUnbalancedH,
    LayoutUnbalancedV,
    BrandColorMismatch,
    /// A rule failed internally; raised by the validator, not by a rule
    RuleEvaluationFailed,
    /// Quick-check reminder that a regulated product needs a disclaimer
    DisclaimerRequired,
}

impl IssueCode {
    pub const ALL: [IssueCode; 35] = [
        IssueCode::RetailerTagMissing,
        IssueCode::RetailerTagInvalid,
        IssueCode::DisclaimerMissing,
        IssueCode::DisclaimerColorInvalid,
        IssueCode::DisclaimerTooSmall,
        IssueCode::TermsMissing,
        IssueCode::CompetitionDisclosureMissing,
        IssueCode::SustainabilityClaimUnverified,
        IssueCode::CharityUndisclosed,
        IssueCode::PriceVisibility,
        IssueCode::UnsubstantiatedClaim,
        IssueCode::MoneyBackGuarantee,
        IssueCode::SafeZoneTopViolation,
        IssueCode::SafeZoneBottomViolation,
        IssueCode::FontSizeTooSmall,
        IssueCode::ContrastFailure,
        IssueCode::RequiredElementsMissing,
        IssueCode::TooManyElements,
        IssueCode::BackgroundMissing,
        IssueCode::LogoMissing,
        IssueCode::PriceTileOverlap,
        IssueCode::OutOfBounds,
        IssueCode::CtaSafeGapViolation,
        IssueCode::PeopleInPhotography,
        IssueCode::LogoTooSmall,
        IssueCode::LogoTooLarge,
        IssueCode::LogoClearSpace,
        IssueCode::HierarchyViolation,
        IssueCode::WeakHierarchy,
        IssueCode::ElementOverlap,
        IssueCode::LayoutUnbalancedH,
        IssueCode::LayoutUnbalancedV,
        IssueCode::BrandColorMismatch,
        IssueCode::RuleEvaluationFailed,
        IssueCode::DisclaimerRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::RetailerTagMissing => "RETAILER_TAG_MISSING",
            IssueCode::RetailerTagInvalid => "RETAILER_TAG_INVALID",
            IssueCode::DisclaimerMissing => "DISCLAIMER_MISSING",
            IssueCode::DisclaimerColorInvalid => "DISCLAIMER_COLOR_INVALID",
            IssueCode::DisclaimerTooSmall => "DISCLAIMER_TOO_SMALL",
            IssueCode::TermsMissing => "TERMS_MISSING",
            IssueCode::CompetitionDisclosureMissing => "COMPETITION_DISCLOSURE_MISSING",
            IssueCode::SustainabilityClaimUnverified => "SUSTAINABILITY_CLAIM_UNVERIFIED",
            IssueCode::CharityUndisclosed => "CHARITY_UNDISCLOSED",
            IssueCode::PriceVisibility => "PRICE_VISIBILITY",
            IssueCode::UnsubstantiatedClaim => "UNSUBSTANTIATED_CLAIM",
            IssueCode::MoneyBackGuarantee => "MONEY_BACK_GUARANTEE",
            IssueCode::SafeZoneTopViolation => "SAFE_ZONE_TOP_VIOLATION",
            IssueCode::SafeZoneBottomViolation => "SAFE_ZONE_BOTTOM_VIOLATION",
            IssueCode::FontSizeTooSmall => "FONT_SIZE_TOO_SMALL",
            IssueCode::ContrastFailure => "CONTRAST_FAILURE",
            IssueCode::RequiredElementsMissing => "REQUIRED_ELEMENTS_MISSING",
            IssueCode::TooManyElements => "TOO_MANY_ELEMENTS",
            IssueCode::BackgroundMissing => "BACKGROUND_MISSING",
            IssueCode::LogoMissing => "LOGO_MISSING",
            IssueCode::PriceTileOverlap => "PRICE_TILE_OVERLAP",
            IssueCode::OutOfBounds => "OUT_OF_BOUNDS",
            IssueCode::CtaSafeGapViolation => "CTA_SAFE_GAP_VIOLATION",
            IssueCode::PeopleInPhotography => "PEOPLE_IN_PHOTOGRAPHY",
            IssueCode::LogoTooSmall => "LOGO_TOO_SMALL",
            IssueCode::LogoTooLarge => "LOGO_TOO_LARGE",
            IssueCode::LogoClearSpace => "LOGO_CLEAR_SPACE",
            IssueCode::HierarchyViolation => "HIERARCHY_VIOLATION",
            IssueCode::WeakHierarchy => "WEAK_HIERARCHY",
            IssueCode::ElementOverlap => "ELEMENT_OVERLAP",
            IssueCode::LayoutUnbalancedH => "LAYOUT_UNBALANCED_H",
            IssueCode::LayoutUnbalancedV => "LAYOUT_UNBALANCED_V",
            IssueCode::BrandColorMismatch => "BRAND_COLOR_MISMATCH",
            IssueCode::RuleEvaluationFailed => "RULE_EVALUATION_FAILED",
            IssueCode::DisclaimerRequired => "DISCLAIMER_REQUIRED",
        }
    }

    /// Severity every issue with this code carries
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::SustainabilityClaimUnverified
            | IssueCode::UnsubstantiatedClaim
            | IssueCode::TooManyElements
            | IssueCode::DisclaimerRequired
            | IssueCode::PeopleInPhotography => Severity::Warn,
            code if code.is_brand() => Severity::Warn,
            _ => Severity::Hard,
        }
    }

    /// One-line description for the rule catalog
    pub fn description(&self) -> &'static str {
        match self {
            IssueCode::RetailerTagMissing => {
                "Retailer-specific channels need a retailer tag element"
            }
            IssueCode::RetailerTagInvalid => "Retailer tag text must be an approved string",
            IssueCode::DisclaimerMissing => "Regulated products need a disclaimer element",
            IssueCode::DisclaimerColorInvalid => "Disclaimer must be black",
            IssueCode::DisclaimerTooSmall => "Disclaimer must meet the channel's minimum height",
            IssueCode::TermsMissing => "Offer copy needs a terms and conditions reference",
            IssueCode::CompetitionDisclosureMissing => {
                "Competition copy needs a promoter disclosure"
            }
            IssueCode::SustainabilityClaimUnverified => {
                "Sustainability claims should name a recognised certification"
            }
            IssueCode::CharityUndisclosed => "Charity copy must state the donation amount",
            IssueCode::PriceVisibility => "Prices must meet the channel's minimum price size",
            IssueCode::UnsubstantiatedClaim => "Comparative claims should carry a footnote",
            IssueCode::MoneyBackGuarantee => "Money-back and guarantee copy is not allowed",
            IssueCode::SafeZoneTopViolation => "Content must stay out of the top safe-zone band",
            IssueCode::SafeZoneBottomViolation => {
                "Content must stay out of the bottom safe-zone band"
            }
            IssueCode::FontSizeTooSmall => "Headline and body copy must meet minimum sizes",
            IssueCode::ContrastFailure => "Text must meet WCAG AA contrast against the background",
            IssueCode::RequiredElementsMissing => {
                "A creative needs a background, a packshot and a logo"
            }
            IssueCode::TooManyElements => "Element count should stay under the channel ceiling",
            IssueCode::BackgroundMissing => "A creative needs a background element",
            IssueCode::LogoMissing => "A creative needs a logo element",
            IssueCode::PriceTileOverlap => "Price tiles must not overlap other elements",
            IssueCode::OutOfBounds => "Elements must stay inside the canvas",
            IssueCode::CtaSafeGapViolation => {
                "Call-to-action copy must keep a 24px gap from the packshot"
            }
            IssueCode::PeopleInPhotography => {
                "Packshots showing people need model consent on file"
            }
            IssueCode::LogoTooSmall => "Logo should meet the brand's minimum size",
            IssueCode::LogoTooLarge => "Logo should stay under the brand's maximum size",
            IssueCode::LogoClearSpace => "Logo needs clear space around it",
            IssueCode::HierarchyViolation => "Subhead should be smaller than the headline",
            IssueCode::WeakHierarchy => "Headline should be at least 1.2x the subhead size",
            IssueCode::ElementOverlap => "Positioned elements should not overlap",
            IssueCode::LayoutUnbalancedH => "Visual weight should sit near the horizontal center",
            IssueCode::LayoutUnbalancedV => "Visual weight should not sit at the top or bottom",
            IssueCode::BrandColorMismatch => "Element colors should come from the brand palette",
            IssueCode::RuleEvaluationFailed => "A rule could not be evaluated",
            IssueCode::DisclaimerRequired => "Regulated products will need a disclaimer",
        }
    }
}

impl IssueCode {
    /// Codes raised only by the brand checks
    pub fn is_brand(&self) -> bool {
        matches!(
            self,
            IssueCode::LogoTooSmall
                | IssueCode::LogoTooLarge
                | IssueCode::LogoClearSpace
                | IssueCode::HierarchyViolation
                | IssueCode::WeakHierarchy
                | IssueCode::ElementOverlap
                | IssueCode::LayoutUnbalancedH
                | IssueCode::LayoutUnbalancedV
                | IssueCode::BrandColorMismatch
        )
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad family a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleGroup {
    /// Retailer branding and regulated-product lock-ups
    Compliance,
    /// Keyword checks over the copy
    Copy,
    /// Sizes and colors of text
    Typography,
    /// Presence, placement and counts of elements
    Layout,
    /// Logo usage, hierarchy, spacing and palette
    Brand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes_match_serde() {
        for code in IssueCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_severity_defaults() {
        assert_eq!(IssueCode::BackgroundMissing.severity(), Severity::Hard);
        assert_eq!(IssueCode::TooManyElements.severity(), Severity::Warn);
        assert_eq!(IssueCode::SustainabilityClaimUnverified.severity(), Severity::Warn);
        assert_eq!(IssueCode::RuleEvaluationFailed.severity(), Severity::Hard);
        assert_eq!(IssueCode::MoneyBackGuarantee.severity(), Severity::Hard);
        assert_eq!(IssueCode::CtaSafeGapViolation.severity(), Severity::Hard);
        assert_eq!(IssueCode::PeopleInPhotography.severity(), Severity::Warn);
        assert_eq!(IssueCode::ElementOverlap.severity(), Severity::Warn);
    }

    #[test]
    fn test_short_wire_codes() {
        assert_eq!(IssueCode::LayoutUnbalancedH.as_str(), "LAYOUT_UNBALANCED_H");
        assert_eq!(
            serde_json::to_string(&IssueCode::LayoutUnbalancedV).unwrap(),
            "\"LAYOUT_UNBALANCED_V\""
        );
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Hard).unwrap(), "\"hard\"");
        let warn: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(warn, Severity::Warn);
    }
}
