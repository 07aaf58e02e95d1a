//! Modules and their placements (instances).
//!
//! A non-resource module has exactly one canonical placement, its default
//! instance, created together with the module and placed at most once.
//! Resource modules are freely re-instantiable and own no content besides
//! ports and parameters.

use weave_common::Ident;

use crate::ids::ObjectId;

/// A hardware module.
#[derive(Debug, Clone)]
pub struct Module {
    /// The module name.
    pub name: Ident,
    /// Opaque, pre-built module.
    pub ilm: bool,
    /// Freely re-instantiable module.
    pub resource: bool,
    /// Parameters, in creation order.
    pub params: Vec<ObjectId>,
    /// Ports, in creation order.
    pub ports: Vec<ObjectId>,
    /// Internal signal declarations (always empty for resources).
    pub decls: Vec<ObjectId>,
    /// Code sections (always empty for resources).
    pub code: Vec<ObjectId>,
    /// Register files (always empty for resources).
    pub regfiles: Vec<ObjectId>,
    /// Instances placed inside this module (always empty for resources).
    pub child_instances: Vec<ObjectId>,
    /// Instances of this module, wherever they are placed.
    pub mod_instances: Vec<ObjectId>,
    /// The unique placement of a non-resource module.
    pub default_instance: Option<ObjectId>,
}

impl Module {
    pub(crate) fn new(name: Ident, ilm: bool, resource: bool) -> Self {
        Self {
            name,
            ilm,
            resource,
            params: Vec::new(),
            ports: Vec::new(),
            decls: Vec::new(),
            code: Vec::new(),
            regfiles: Vec::new(),
            child_instances: Vec::new(),
            mod_instances: Vec::new(),
            default_instance: None,
        }
    }
}

/// A placement of a module inside a parent module.
#[derive(Debug, Clone)]
pub struct Instance {
    /// The instance name (unique across the database).
    pub name: Ident,
    /// The module this is an instance of.
    pub module: ObjectId,
    /// The module this instance is placed in; `None` until placed.
    pub parent: Option<ObjectId>,
    /// Parameter overrides, in creation order.
    pub adjustments: Vec<ObjectId>,
    /// Pins, in creation order.
    pub pins: Vec<ObjectId>,
}

impl Instance {
    pub(crate) fn new(name: Ident, module: ObjectId, parent: Option<ObjectId>) -> Self {
        Self {
            name,
            module,
            parent,
            adjustments: Vec::new(),
            pins: Vec::new(),
        }
    }
}
