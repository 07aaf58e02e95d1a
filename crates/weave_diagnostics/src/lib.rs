//! Diagnostic creation, severity management, filtering and rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels
//! and codes. The thread-safe [`DiagnosticSink`] accumulates diagnostics during
//! hierarchy resolution, filters them through a [`DiagnosticPolicy`], and
//! mirrors every retained diagnostic as a `tracing` event. [`TerminalRenderer`]
//! formats them for the user.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod policy;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode, ParseCodeError};
pub use diagnostic::Diagnostic;
pub use policy::DiagnosticPolicy;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
