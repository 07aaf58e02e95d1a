//! Nets: named groups of objects sharing one resolved signal.

use weave_common::Ident;

use crate::ids::ObjectId;

/// A named net.
#[derive(Debug, Clone)]
pub struct Net {
    /// The net (signal) name.
    pub name: Ident,
    /// Member ports, pins and declarations, in realization order.
    pub members: Vec<ObjectId>,
}
