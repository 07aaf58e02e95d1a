//! Register-file objects: a regfile holds entries, an entry holds registers.
//!
//! These reuse the object/attribute substrate; their contents are described
//! by the caller through attributes.

use weave_common::Ident;

use crate::ids::ObjectId;

/// A register file attached to a module.
#[derive(Debug, Clone)]
pub struct Regfile {
    /// The register file name.
    pub name: Ident,
    /// The owning module.
    pub parent: ObjectId,
    /// Entries, in creation order.
    pub entries: Vec<ObjectId>,
}

/// One addressable entry of a register file.
#[derive(Debug, Clone)]
pub struct RegfileEntry {
    /// The entry name.
    pub name: Ident,
    /// The owning register file.
    pub parent: ObjectId,
    /// Registers, in creation order.
    pub regs: Vec<ObjectId>,
}

/// A register inside an entry.
#[derive(Debug, Clone)]
pub struct RegfileReg {
    /// The register name.
    pub name: Ident,
    /// The owning entry.
    pub parent: ObjectId,
}
