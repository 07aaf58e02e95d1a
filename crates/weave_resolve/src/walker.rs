//! Hierarchy Walker: one endpoint to a chain of hops up to its root.
//!
//! A non-resource module is only ever placed through its default instance,
//! so the walk alternates module → default instance → parent module → …
//! until it reaches an unplaced instance or a module without one.

use weave_common::{Ident, InternalError, WeaveResult};
use weave_db::{Database, ObjectData, ObjectId};

use crate::endpoint::{ConnectionDir, Endpoint};

/// One hop of a connection chain or tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnNode {
    /// The module or instance at this hop.
    pub object: ObjectId,
    /// The requested direction.
    pub dir: ConnectionDir,
    /// The name used at this hop; `None` means the signal name.
    pub local_name: Option<Ident>,
    /// Use `local_name` verbatim.
    pub force_name: bool,
    /// Connect the inverted signal.
    pub invert: bool,
    /// The caller named this hop directly.
    pub explicit: bool,
    /// Set when merging met two different concrete directions.
    pub dir_conflict: bool,
}

/// Which endpoint attributes the next hop inherits.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Carry {
    /// The hop is the endpoint itself.
    Endpoint,
    /// The hop is the implicit default instance right after the endpoint.
    FirstHop,
    None,
}

/// Walks from `endpoint` to its hierarchy root, returning the hops leaf first.
///
/// An instance of a non-resource module is replaced by its module. An
/// instance of a resource module stays the endpoint, and the module it is
/// placed in becomes explicit as well since the user chose that placement.
pub fn walk(db: &Database, endpoint: &Endpoint, dir: ConnectionDir) -> WeaveResult<Vec<ConnNode>> {
    let local_name = endpoint
        .local_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| db.intern(n));
    let hop = |object: ObjectId, explicit: bool, carries: bool| ConnNode {
        object,
        dir,
        local_name: if carries { local_name } else { None },
        force_name: carries && endpoint.force_name,
        invert: carries && endpoint.invert,
        explicit,
        dir_conflict: false,
    };

    let start = db
        .object(endpoint.object)
        .ok_or_else(|| InternalError::new(format!("dangling endpoint {}", endpoint.object)))?;

    let mut chain = Vec::new();
    let mut force_explicit = false;
    let (mut current, mut carry) = match &start.data {
        ObjectData::Instance(inst) => {
            let module = db.module(inst.module).ok_or_else(|| {
                InternalError::new(format!(
                    "instance '{}' refers to a non-module",
                    db.describe(endpoint.object)
                ))
            })?;
            if module.resource {
                chain.push(hop(endpoint.object, true, true));
                force_explicit = true;
                (inst.parent, Carry::None)
            } else {
                (Some(inst.module), Carry::Endpoint)
            }
        }
        ObjectData::Module(_) => (Some(endpoint.object), Carry::Endpoint),
        _ => {
            return Err(InternalError::new(format!(
                "cannot walk from {} '{}'",
                start.kind(),
                db.describe(endpoint.object)
            )))
        }
    };

    while let Some(id) = current {
        if chain.len() > db.len() {
            return Err(InternalError::new(format!(
                "hierarchy walk from '{}' does not terminate",
                db.describe(endpoint.object)
            )));
        }
        let node = match carry {
            Carry::Endpoint => hop(id, true, true),
            Carry::FirstHop => hop(id, false, true),
            Carry::None => hop(id, std::mem::take(&mut force_explicit), false),
        };
        chain.push(node);
        carry = match carry {
            Carry::Endpoint => Carry::FirstHop,
            _ => Carry::None,
        };
        current = match db.object(id).map(|o| &o.data) {
            Some(ObjectData::Instance(inst)) => inst.parent,
            Some(ObjectData::Module(module)) => module.default_instance,
            _ => {
                return Err(InternalError::new(format!(
                    "unexpected object '{}' in hierarchy of '{}'",
                    db.describe(id),
                    db.describe(endpoint.object)
                )))
            }
        };
    }
    Ok(chain)
}
