//! Typed failures of the object store.
//!
//! Every variant names the offending name or object id. A mutation that
//! returns one of these leaves the database exactly as it was.

use thiserror::Error;
use weave_common::InternalError;

/// A recoverable object-store failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbError {
    /// An object of this kind and name already exists.
    #[error("{kind} '{name}' already exists")]
    NameExists {
        /// The object kind (`module`, `instance`, …).
        kind: &'static str,
        /// The duplicated name.
        name: String,
    },
    /// The derived object id is already registered.
    #[error("object id '{id}' already exists")]
    IdExists {
        /// The colliding id.
        id: String,
    },
    /// Resource modules cannot contain instances.
    #[error("cannot place instance '{instance}' inside resource module '{parent}'")]
    ParentIsResource {
        /// The instance being placed.
        instance: String,
        /// The resource module.
        parent: String,
    },
    /// A non-resource module's only instance must carry the module's name.
    #[error("module '{module}' is not a resource, instance name '{instance}' does not match")]
    NameMismatch {
        /// The requested instance name.
        instance: String,
        /// The non-resource module.
        module: String,
    },
    /// The default instance of a non-resource module is already placed.
    #[error("instance '{instance}' is already placed in module '{parent}'")]
    AlreadyPlaced {
        /// The default instance.
        instance: String,
        /// The module it is already placed in.
        parent: String,
    },
    /// Placing the instance would make a module contain itself.
    #[error("placing '{instance}' in module '{parent}' would create a hierarchy cycle")]
    WouldCreateCycle {
        /// The instance being placed.
        instance: String,
        /// The candidate parent module.
        parent: String,
    },
    /// The attribute is write-protected.
    #[error("attribute '{attribute}' of '{id}' is constant")]
    ConstantAttribute {
        /// The object id.
        id: String,
        /// The attribute name.
        attribute: String,
    },
    /// No object with this handle or name exists.
    #[error("unknown object '{0}'")]
    UnknownObject(String),
    /// The object exists but has the wrong type for this operation.
    #[error("'{id}' is a {found}, expected a {expected}")]
    WrongType {
        /// The object id.
        id: String,
        /// The required kind.
        expected: &'static str,
        /// The actual kind.
        found: &'static str,
    },
    /// Declarations, code, register files and child instances are not
    /// allowed inside a resource module.
    #[error("{what} not allowed in resource module '{module}'")]
    ResourceModule {
        /// What was requested.
        what: &'static str,
        /// The resource module.
        module: String,
    },
    /// A net of this name already exists.
    #[error("net '{0}' already exists")]
    NetExists(String),
    /// The object is already a member of a net.
    #[error("'{id}' is already a member of net '{net}'")]
    AlreadyInNet {
        /// The member's id.
        id: String,
        /// The net it belongs to.
        net: String,
    },
    /// A name argument was empty.
    #[error("empty {0} name")]
    EmptyName(&'static str),
    /// Corrupted object graph.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
