//! The weave object store: modules, instances, ports, pins, parameters,
//! declarations, nets and register files, with their lookup indices.
//!
//! A single [`Database`] owns every object in one arena; callers hold
//! [`ObjectId`] handles. Each object carries a `<type>::<scope>` id string
//! and an attribute map whose built-in entries are write-protected.

#![warn(missing_docs)]

pub mod arena;
pub mod database;
pub mod decl;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod module;
pub mod net;
pub mod object;
pub mod param;
pub mod port;
pub mod regfile;

pub use database::Database;
pub use decl::{CodeSection, Declaration};
pub use error::DbError;
pub use ids::ObjectId;
pub use module::{Instance, Module};
pub use net::Net;
pub use object::{Attribute, Object, ObjectData, ObjectKind};
pub use param::{Adjustment, Parameter};
pub use port::{Pin, Port, PortDirection};
pub use regfile::{Regfile, RegfileEntry, RegfileReg};
