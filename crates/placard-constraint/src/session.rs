//! Editor session: debounced validation and the export gate
//!
//! The session owns the current snapshot and hands the host a
//! [`ValidationTicket`] once edits have gone quiet. The host runs validation
//! however it likes (inline or on a remote validator) and reports back with
//! the ticket; results for a snapshot that has since changed are dropped.
//! Time is always passed in by the host, nothing here reads a clock.

use crate::evaluator::Validator;
use crate::fixer::{FixMode, FixReport, Fixer};
use crate::report::ValidationResult;
use placard_core::{CanvasContext, ContentHash, Result};
use placard_scene::{Scene, SceneCommand};
use std::time::{Duration, Instant};

/// Quiet period after the last edit before validation runs
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Collapses bursts of edits into one validation
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_edit: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_edit: None,
        }
    }

    /// Record an edit, restarting the quiet period
    pub fn touch(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// An edit is pending and the window has elapsed since the latest one
    pub fn ready(&self, now: Instant) -> bool {
        self.last_edit
            .is_some_and(|last| now.saturating_duration_since(last) >= self.window)
    }

    pub fn clear(&mut self) {
        self.last_edit = None;
    }
}

/// Identifies the snapshot a validation run was computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationTicket {
    pub version: u64,
    pub hash: ContentHash,
}

/// The editor's single owner of the current scene
pub struct EditorSession {
    scene: Scene,
    context: CanvasContext,
    version: u64,
    debouncer: Debouncer,
    in_flight: Option<ValidationTicket>,
    /// Latest accepted result and the version it belongs to
    last_result: Option<(u64, ValidationResult)>,
}

impl EditorSession {
    /// Start a session. Nothing is pending until the first edit; call
    /// [`EditorSession::validate_now`] for the initial snapshot.
    pub fn new(scene: Scene, context: CanvasContext) -> Self {
        Self {
            scene,
            context,
            version: 0,
            debouncer: Debouncer::default(),
            in_flight: None,
            last_result: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn context(&self) -> &CanvasContext {
        &self.context
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply an editor command. A rejected command changes nothing.
    pub fn apply(&mut self, command: &SceneCommand, now: Instant) -> Result<()> {
        let next = command.apply(&self.scene)?;
        self.replace(next, now);
        Ok(())
    }

    /// Swap in a new snapshot wholesale
    pub fn replace(&mut self, scene: Scene, now: Instant) {
        self.scene = scene;
        self.bump(now);
    }

    /// Change the evaluation context (e.g. a different channel)
    pub fn set_context(&mut self, context: CanvasContext, now: Instant) {
        self.context = context;
        self.bump(now);
    }

    fn bump(&mut self, now: Instant) {
        self.version += 1;
        self.debouncer.touch(now);
        if let Some(stale) = self.in_flight.take() {
            tracing::debug!(version = stale.version, "in-flight validation superseded");
        }
    }

    /// Ticket for the current snapshot
    pub fn ticket(&self) -> Result<ValidationTicket> {
        Ok(ValidationTicket {
            version: self.version,
            hash: ContentHash::of(&(&self.scene, &self.context))?,
        })
    }

    /// Validation due for the current snapshot, if edits have gone quiet.
    ///
    /// Returns at most one ticket per version.
    pub fn poll(&mut self, now: Instant) -> Result<Option<ValidationTicket>> {
        if self.in_flight.is_some() || !self.debouncer.ready(now) {
            return Ok(None);
        }
        let ticket = self.ticket()?;
        self.debouncer.clear();
        self.in_flight = Some(ticket);
        Ok(Some(ticket))
    }

    /// Accept a result. Returns false and drops it if the ticket is stale.
    pub fn complete(&mut self, ticket: ValidationTicket, result: ValidationResult) -> bool {
        let current = self.in_flight == Some(ticket)
            && self.ticket().map(|t| t == ticket).unwrap_or(false);
        if !current {
            tracing::warn!(
                ticket = ticket.version,
                hash = %ticket.hash,
                current = self.version,
                "discarding stale validation result"
            );
            return false;
        }
        self.in_flight = None;
        self.last_result = Some((ticket.version, result));
        true
    }

    /// Validate the current snapshot immediately, skipping the debounce
    pub fn validate_now(&mut self, validator: &Validator) -> &ValidationResult {
        self.debouncer.clear();
        self.in_flight = None;
        let result = validator.validate(&self.scene, &self.context);
        &self.last_result.insert((self.version, result)).1
    }

    /// Latest result, only if it belongs to the current snapshot
    pub fn result(&self) -> Option<&ValidationResult> {
        match &self.last_result {
            Some((version, result)) if *version == self.version => Some(result),
            _ => None,
        }
    }

    /// Export is allowed only when the current snapshot's result has no hard issues
    pub fn can_export(&self) -> bool {
        self.result().is_some_and(|r| r.ok)
    }

    /// Run the fixer over the current snapshot and adopt its output
    pub fn fix_all(&mut self, validator: &Validator, mode: FixMode, now: Instant) -> FixReport {
        let run = Fixer::new(validator).fix_all(&self.scene, &self.context, mode);
        if run.scene != self.scene {
            self.replace(run.scene, now);
        }
        // The report already validated the adopted snapshot
        self.debouncer.clear();
        self.in_flight = None;
        self.last_result = Some((self.version, run.report.result.clone()));
        run.report
    }
}
