//! Module parameters and their per-instance overrides.

use weave_common::Ident;

use crate::ids::ObjectId;

/// A module parameter with its default value.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// The parameter name.
    pub name: Ident,
    /// The default value.
    pub value: Ident,
    /// Module-local parameter (not overridable from outside).
    pub local: bool,
    /// The owning module.
    pub parent: ObjectId,
}

/// An instance-level parameter override.
#[derive(Debug, Clone)]
pub struct Adjustment {
    /// The name of the overridden parameter.
    pub name: Ident,
    /// The value assigned at this instance.
    pub value: Ident,
    /// The owning instance.
    pub parent: ObjectId,
}
