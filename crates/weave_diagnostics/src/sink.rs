//! Thread-safe diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::policy::DiagnosticPolicy;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::Level;

/// A thread-safe accumulator for diagnostics emitted during resolution.
///
/// Incoming diagnostics pass through the sink's [`DiagnosticPolicy`]; the ones
/// that survive are stored and mirrored as `tracing` events. The error count
/// is tracked atomically for fast `has_errors` checks without locking the
/// diagnostic vector.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    policy: DiagnosticPolicy,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink that keeps every diagnostic.
    pub fn new() -> Self {
        Self::with_policy(DiagnosticPolicy::permissive())
    }

    /// Creates a new empty diagnostic sink filtering through `policy`.
    pub fn with_policy(policy: DiagnosticPolicy) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            policy,
        }
    }

    /// Emits a diagnostic into the sink.
    ///
    /// Suppressed diagnostics are discarded. If the retained diagnostic has
    /// [`Severity::Error`], the error count is incremented atomically.
    pub fn emit(&self, diag: Diagnostic) {
        let Some(diag) = self.policy.apply(diag) else {
            return;
        };
        trace_diagnostic(&diag);
        if diag.severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        let mut diagnostics = self
            .diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        diagnostics.push(diag);
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *diagnostics)
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let diagnostics = self
            .diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        diagnostics.clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

fn trace_diagnostic(diag: &Diagnostic) {
    let subject = diag.subject.as_deref().unwrap_or("-");
    match diag.severity {
        Severity::Error => {
            tracing::event!(Level::ERROR, code = %diag.code, subject, "{}", diag.message)
        }
        Severity::Warning => {
            tracing::event!(Level::WARN, code = %diag.code, subject, "{}", diag.message)
        }
        Severity::Note => {
            tracing::event!(Level::INFO, code = %diag.code, subject, "{}", diag.message)
        }
        Severity::Help => {
            tracing::event!(Level::DEBUG, code = %diag.code, subject, "{}", diag.message)
        }
    }
}
