//! Module ports and instance pins.

use serde::{Deserialize, Serialize};
use std::fmt;
use weave_common::Ident;

use crate::ids::ObjectId;

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the module.
    Input,
    /// Data flows out of the module.
    Output,
    /// Data flows both ways.
    Bidirectional,
}

impl PortDirection {
    /// Returns the value stored in the `direction` attribute.
    pub fn name(self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A port in a module's interface.
#[derive(Debug, Clone)]
pub struct Port {
    /// The port name.
    pub name: Ident,
    /// The direction of data flow.
    pub dir: PortDirection,
    /// The owning module.
    pub parent: ObjectId,
    /// The net this port belongs to, once connected.
    pub net: Option<ObjectId>,
}

/// A pin of an instance, bound to a signal name in the parent module.
#[derive(Debug, Clone)]
pub struct Pin {
    /// The pin name (matches a port of the instantiated module).
    pub name: Ident,
    /// The signal in the parent module this pin is connected to.
    pub connection: Ident,
    /// Whether the connection is inverted.
    pub invert: bool,
    /// The owning instance.
    pub parent: ObjectId,
    /// The net this pin belongs to, once connected.
    pub net: Option<ObjectId>,
}
