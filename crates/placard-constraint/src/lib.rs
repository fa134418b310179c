//! Placard Constraint - Creative validation and auto-fix system
//!
//! A fixed registry of rules inspects a scene snapshot under a canvas context
//! and reports typed, severity-ranked issues. A resolver maps issue codes to
//! pure scene transforms, and the fixer drives those transforms until the
//! scene is clean or nothing more can be fixed automatically.

mod diff;
mod evaluator;
mod fixer;
mod profiles;
mod registry;
mod report;
mod request;
pub mod rules;
mod session;
mod types;

pub use diff::{diff_lines, scene_diff, DiffLine};
pub use evaluator::Validator;
pub use fixer::{
    FixAction, FixEntry, FixFn, FixMode, FixOutcome, FixReport, FixRun, Fixer, Resolver,
    UnresolvedIssue, MAX_ITERATIONS,
};
pub use profiles::{ProfileFile, ProfileRegistry};
pub use registry::{RuleCatalog, RuleInfo, RuleRegistry};
pub use report::{BoundingBox, Issue, ValidationResult};
pub use request::{QuickCheckRequest, ValidateRequest};
pub use rules::{Rule, RuleContext};
pub use session::{Debouncer, EditorSession, ValidationTicket, DEBOUNCE_WINDOW};
pub use types::{IssueCode, RuleGroup, Severity};
