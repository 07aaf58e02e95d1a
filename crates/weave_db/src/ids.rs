//! Opaque handle type for database objects.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, copyable handle to an object in a [`Database`](crate::Database).
///
/// A handle is only valid for the database that issued it, and only until that
/// database is cleared. The human-readable `<type>::<scope>` id string is kept
/// on the object itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a handle from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl ArenaId for ObjectId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
