//! Validation issue and result types

use crate::types::{IssueCode, Severity};
use placard_core::Rect;
use placard_scene::{Element, Positioned};
use serde::{Deserialize, Serialize};

/// Box of the offending element, in canvas percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_suggestion: Option<String>,
    /// Position of the offending element in the scene's sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl Issue {
    /// A scene-level issue with the code's default severity
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            fix_suggestion: None,
            element_index: None,
            element_id: None,
            bounding_box: None,
        }
    }

    pub fn with_fix(mut self, suggestion: impl Into<String>) -> Self {
        self.fix_suggestion = Some(suggestion.into());
        self
    }

    /// Point the issue at an element, copying its id and box
    pub fn at(mut self, index: usize, element: &Element) -> Self {
        self.element_index = Some(index);
        self.element_id = element.frame().id.clone();
        self.bounding_box = element.rect().map(BoundingBox::from);
        self
    }

    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }
}

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff there are no hard issues
    pub ok: bool,
    pub issues: Vec<Issue>,
    /// Codes of every rule that was evaluated, in evaluation order
    pub checked_rules: Vec<String>,
}

impl ValidationResult {
    pub fn new(issues: Vec<Issue>, checked_rules: Vec<String>) -> Self {
        let ok = !issues.iter().any(Issue::is_hard);
        Self {
            ok,
            issues,
            checked_rules,
        }
    }

    pub fn hard_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_hard()).count()
    }

    pub fn warn_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warn)
            .count()
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.code == code)
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        let total = self.issues.len();
        if total == 0 {
            return "No issues found.".to_string();
        }

        format!(
            "{} issue(s): {} hard, {} warn",
            total,
            self.hard_count(),
            self.warn_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_only_counts_hard() {
        let warn_only = ValidationResult::new(
            vec![Issue::new(IssueCode::TooManyElements, "9 elements")],
            vec![],
        );
        assert!(warn_only.ok);
        assert_eq!(warn_only.warn_count(), 1);

        let hard = ValidationResult::new(
            vec![Issue::new(IssueCode::LogoMissing, "no logo")],
            vec![],
        );
        assert!(!hard.ok);
        assert_eq!(hard.summary(), "1 issue(s): 1 hard, 0 warn");
    }

    #[test]
    fn test_issue_at_element() {
        let element = Element::logo("l.png")
            .with_id("brand")
            .with_rect(1.0, 2.0, 3.0, 4.0);
        let issue = Issue::new(IssueCode::OutOfBounds, "x").at(5, &element);
        assert_eq!(issue.element_index, Some(5));
        assert_eq!(issue.element_id.as_deref(), Some("brand"));
        assert_eq!(issue.bounding_box.map(|b| b.height), Some(4.0));
    }

    #[test]
    fn test_issue_json_shape() {
        let issue = Issue::new(IssueCode::BackgroundMissing, "No background")
            .with_fix("Add a background");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "hard");
        assert_eq!(json["code"], "BACKGROUND_MISSING");
        assert_eq!(json["fix_suggestion"], "Add a background");
        assert!(json.get("element_id").is_none());
    }
}
