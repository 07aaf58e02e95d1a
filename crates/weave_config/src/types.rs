//! Configuration types deserialized from `weave.toml`.

use serde::Deserialize;
use weave_diagnostics::{DiagnosticCode, DiagnosticPolicy, Severity, TerminalRenderer};

/// The top-level configuration parsed from `weave.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaveConfig {
    /// Diagnostic reporting settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// The `[diagnostics]` section: which diagnostics are kept and how they print.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Minimum severity a diagnostic needs to be retained.
    #[serde(default = "default_level")]
    pub level: Severity,
    /// Whether the terminal renderer uses ANSI colors.
    #[serde(default)]
    pub color: bool,
    /// Codes promoted to errors (e.g. `"W300"`).
    #[serde(default)]
    pub deny: Vec<String>,
    /// Codes suppressed entirely.
    #[serde(default)]
    pub allow: Vec<String>,
}

fn default_level() -> Severity {
    Severity::Help
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            color: false,
            deny: Vec::new(),
            allow: Vec::new(),
        }
    }
}

impl DiagnosticsConfig {
    /// Builds the sink policy described by this section.
    ///
    /// Codes that fail to parse are skipped; [`load_config_from_str`](crate::load_config_from_str)
    /// rejects them up front, so this only matters for hand-built values.
    pub fn policy(&self) -> DiagnosticPolicy {
        DiagnosticPolicy::new(
            parsed_codes(&self.deny),
            parsed_codes(&self.allow),
            self.level,
        )
    }

    /// Builds the terminal renderer described by this section.
    pub fn renderer(&self) -> TerminalRenderer {
        TerminalRenderer::new(self.color)
    }
}

fn parsed_codes(codes: &[String]) -> Vec<DiagnosticCode> {
    codes.iter().filter_map(|c| c.parse().ok()).collect()
}
