//! Shared foundational types used across the weave crates.
//!
//! This crate provides the interned identifiers backing every name, id and
//! attribute value in the symbol database, and the internal error type used
//! for broken object-graph invariants.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, WeaveResult};
