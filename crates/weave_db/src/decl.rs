//! Module-internal declarations and verbatim code sections.

use weave_common::Ident;

use crate::ids::ObjectId;

/// An internal signal of a module.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// The signal name.
    pub name: Ident,
    /// Whether the signal uses the default signal type.
    pub default_type: bool,
    /// The value this signal is assigned to, if any.
    pub default_assignment: Option<Ident>,
    /// The owning module.
    pub parent: ObjectId,
    /// The net this declaration belongs to, once connected.
    pub net: Option<ObjectId>,
}

/// A verbatim block of code placed inside a module.
#[derive(Debug, Clone)]
pub struct CodeSection {
    /// The section name.
    pub name: Ident,
    /// The code text.
    pub code: Ident,
    /// The owning module.
    pub parent: ObjectId,
}
