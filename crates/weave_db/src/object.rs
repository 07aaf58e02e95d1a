//! The common object envelope: type tag, id string and attribute map.
//!
//! Every persistent record (module, instance, port, …) is stored as an
//! [`Object`] whose [`ObjectData`] holds the typed payload. The envelope's
//! attribute map is what the generic `attr_set`/`attr_get` API works on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use weave_common::Ident;

use crate::decl::{CodeSection, Declaration};
use crate::ids::ObjectId;
use crate::module::{Instance, Module};
use crate::net::Net;
use crate::param::{Adjustment, Parameter};
use crate::port::{Pin, Port};
use crate::regfile::{Regfile, RegfileEntry, RegfileReg};

/// The type tag of an object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A module-level port.
    Port,
    /// An instance-level pin.
    Pin,
    /// A module-level parameter.
    Parameter,
    /// An instance-level parameter override.
    Adjustment,
    /// A module-internal signal declaration.
    Declaration,
    /// A verbatim code section inside a module.
    Code,
    /// A module.
    Module,
    /// A placement of a module.
    Instance,
    /// A named group of connected ports, pins and declarations.
    Net,
    /// A register file attached to a module.
    Regfile,
    /// An entry of a register file.
    RegfileEntry,
    /// A register inside a register-file entry.
    RegfileReg,
}

impl ObjectKind {
    /// Returns the name used as the id prefix and as the `type` attribute.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Port => "port",
            ObjectKind::Pin => "pin",
            ObjectKind::Parameter => "parameter",
            ObjectKind::Adjustment => "adjustment",
            ObjectKind::Declaration => "declaration",
            ObjectKind::Code => "codesection",
            ObjectKind::Module => "module",
            ObjectKind::Instance => "instance",
            ObjectKind::Net => "net",
            ObjectKind::Regfile => "regfile",
            ObjectKind::RegfileEntry => "regfile-entry",
            ObjectKind::RegfileReg => "regfile-reg",
        }
    }

    /// Builds the `<type>::<scope>` id string for an object of this kind.
    pub fn object_id(self, scope: &str) -> String {
        format!("{}::{scope}", self.name())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One attribute value. Constant attributes can never be overwritten.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Attribute {
    /// The interned value.
    pub value: Ident,
    /// Whether the attribute is write-protected.
    pub constant: bool,
}

/// The typed payload of an object.
#[derive(Debug, Clone)]
pub enum ObjectData {
    /// See [`Port`].
    Port(Port),
    /// See [`Pin`].
    Pin(Pin),
    /// See [`Parameter`].
    Parameter(Parameter),
    /// See [`Adjustment`].
    Adjustment(Adjustment),
    /// See [`Declaration`].
    Declaration(Declaration),
    /// See [`CodeSection`].
    Code(CodeSection),
    /// See [`Module`].
    Module(Module),
    /// See [`Instance`].
    Instance(Instance),
    /// See [`Net`].
    Net(Net),
    /// See [`Regfile`].
    Regfile(Regfile),
    /// See [`RegfileEntry`].
    RegfileEntry(RegfileEntry),
    /// See [`RegfileReg`].
    RegfileReg(RegfileReg),
}

impl ObjectData {
    /// Returns the type tag matching this payload.
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectData::Port(_) => ObjectKind::Port,
            ObjectData::Pin(_) => ObjectKind::Pin,
            ObjectData::Parameter(_) => ObjectKind::Parameter,
            ObjectData::Adjustment(_) => ObjectKind::Adjustment,
            ObjectData::Declaration(_) => ObjectKind::Declaration,
            ObjectData::Code(_) => ObjectKind::Code,
            ObjectData::Module(_) => ObjectKind::Module,
            ObjectData::Instance(_) => ObjectKind::Instance,
            ObjectData::Net(_) => ObjectKind::Net,
            ObjectData::Regfile(_) => ObjectKind::Regfile,
            ObjectData::RegfileEntry(_) => ObjectKind::RegfileEntry,
            ObjectData::RegfileReg(_) => ObjectKind::RegfileReg,
        }
    }
}

/// A stored object: handle, id, attributes and payload.
#[derive(Debug, Clone)]
pub struct Object {
    /// The arena handle of this object.
    pub handle: ObjectId,
    /// The interned `<type>::<scope>` id.
    pub id: Ident,
    /// The attribute map, in insertion order.
    pub(crate) attributes: IndexMap<Ident, Attribute>,
    /// The typed payload.
    pub data: ObjectData,
}

impl Object {
    pub(crate) fn new(handle: ObjectId, id: Ident, data: ObjectData) -> Self {
        Self {
            handle,
            id,
            attributes: IndexMap::new(),
            data,
        }
    }

    /// Returns the type tag of this object.
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }

    /// Returns the attribute stored under `name`, if any.
    pub fn attribute(&self, name: Ident) -> Option<&Attribute> {
        self.attributes.get(&name)
    }

    /// Iterates over `(name, attribute)` pairs in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (Ident, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    /// Returns the net this object belongs to, for ports, pins and declarations.
    pub fn net(&self) -> Option<ObjectId> {
        match &self.data {
            ObjectData::Port(p) => p.net,
            ObjectData::Pin(p) => p.net,
            ObjectData::Declaration(d) => d.net,
            _ => None,
        }
    }

    /// Returns the object's own (unscoped) name.
    pub fn name(&self) -> Ident {
        match &self.data {
            ObjectData::Port(p) => p.name,
            ObjectData::Pin(p) => p.name,
            ObjectData::Parameter(p) => p.name,
            ObjectData::Adjustment(a) => a.name,
            ObjectData::Declaration(d) => d.name,
            ObjectData::Code(c) => c.name,
            ObjectData::Module(m) => m.name,
            ObjectData::Instance(i) => i.name,
            ObjectData::Net(n) => n.name,
            ObjectData::Regfile(r) => r.name,
            ObjectData::RegfileEntry(e) => e.name,
            ObjectData::RegfileReg(r) => r.name,
        }
    }
}
