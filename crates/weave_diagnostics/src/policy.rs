//! Filtering and severity overrides applied to incoming diagnostics.

use std::collections::HashSet;

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Decides which diagnostics a [`DiagnosticSink`](crate::DiagnosticSink) keeps.
///
/// Codes in the allowed set are suppressed entirely, codes in the denied set
/// are promoted to [`Severity::Error`], and anything left below the minimum
/// severity is dropped. Promotion happens before the severity threshold.
#[derive(Debug, Clone)]
pub struct DiagnosticPolicy {
    denied: HashSet<DiagnosticCode>,
    allowed: HashSet<DiagnosticCode>,
    min_severity: Severity,
}

impl DiagnosticPolicy {
    /// Creates a policy from denied and allowed codes and a severity threshold.
    pub fn new(
        deny: impl IntoIterator<Item = DiagnosticCode>,
        allow: impl IntoIterator<Item = DiagnosticCode>,
        min_severity: Severity,
    ) -> Self {
        Self {
            denied: deny.into_iter().collect(),
            allowed: allow.into_iter().collect(),
            min_severity,
        }
    }

    /// A policy that keeps every diagnostic unchanged.
    pub fn permissive() -> Self {
        Self::new([], [], Severity::Help)
    }

    /// Returns the minimum retained severity.
    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Applies the policy, returning the (possibly promoted) diagnostic to keep.
    pub fn apply(&self, mut diag: Diagnostic) -> Option<Diagnostic> {
        if self.allowed.contains(&diag.code) {
            return None;
        }
        if self.denied.contains(&diag.code) {
            diag.severity = Severity::Error;
        }
        if diag.severity < self.min_severity {
            return None;
        }
        Some(diag)
    }
}

impl Default for DiagnosticPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}
