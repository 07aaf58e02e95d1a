//! Tree Realizer: creates the concrete objects for a reduced tree.
//!
//! The tree is visited top-down. Each hop creates one object and hands its
//! name down, so a child instance knows which signal of its parent module
//! to connect to. A hop whose object cannot be created is reported and
//! skipped; its name is still handed down so the rest of the tree stays
//! consistent.

use tracing::trace;
use weave_common::{InternalError, WeaveResult};
use weave_db::{Database, DbError, ObjectId, ObjectKind};
use weave_diagnostics::DiagnosticSink;

use crate::errors;
use crate::merge::ConnTree;
use crate::names::{pin_name, signal_name};
use crate::walker::ConnNode;

/// What a request realizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    /// Declarations, ports and pins.
    Signal,
    /// Parameters and adjustments.
    Parameter {
        /// The value of the root parameter.
        default_value: &'a str,
        /// Whether the root parameter is module-local.
        local: bool,
    },
}

/// Materializes a reduced tree into the database.
pub struct Realizer<'a> {
    db: &'a mut Database,
    sink: &'a DiagnosticSink,
    request: String,
    name: String,
    mode: Mode<'a>,
    created: Vec<ObjectId>,
}

impl<'a> Realizer<'a> {
    /// Creates a realizer for the signal or parameter `name`.
    ///
    /// `request` labels diagnostics, e.g. `connection data`.
    pub fn new(
        db: &'a mut Database,
        sink: &'a DiagnosticSink,
        request: impl Into<String>,
        name: impl Into<String>,
        mode: Mode<'a>,
    ) -> Self {
        Self {
            db,
            sink,
            request: request.into(),
            name: name.into(),
            mode,
            created: Vec::new(),
        }
    }

    /// Realizes `tree`, returning the created objects in creation order.
    pub fn realize(mut self, tree: &ConnTree) -> WeaveResult<Vec<ObjectId>> {
        self.visit(tree, None, true)?;
        Ok(self.created)
    }

    fn visit(&mut self, tree: &ConnTree, parent_name: Option<&str>, is_root: bool) -> WeaveResult<()> {
        let node = &tree.node;
        let kind = self.db.object(node.object).map(|o| o.kind());
        let name = match (kind, self.mode) {
            (Some(ObjectKind::Module), Mode::Signal) => {
                self.signal_module(node, parent_name, is_root)?
            }
            (Some(ObjectKind::Instance), Mode::Signal) => self.signal_instance(node, parent_name)?,
            (Some(ObjectKind::Module), Mode::Parameter { default_value, local }) => {
                self.param_module(node, parent_name, is_root, default_value, local)?
            }
            (Some(ObjectKind::Instance), Mode::Parameter { default_value, local }) => {
                self.param_instance(node, parent_name, is_root, default_value, local)?
            }
            _ => {
                return Err(InternalError::new(format!(
                    "{}: cannot realize '{}'",
                    self.request,
                    self.db.describe(node.object)
                )))
            }
        };
        for child in &tree.children {
            self.visit(child, Some(&name), false)?;
        }
        Ok(())
    }

    fn local_name(&self, node: &ConnNode) -> String {
        node.local_name
            .map_or_else(|| self.name.clone(), |n| self.db.resolve(n).to_string())
    }

    fn inherited_name(&self, node: &ConnNode, parent_name: Option<&str>) -> WeaveResult<String> {
        parent_name.map(str::to_string).ok_or_else(|| {
            InternalError::new(format!(
                "{}: module hop '{}' has no parent",
                self.request,
                self.db.describe(node.object)
            ))
        })
    }

    fn signal_module(
        &mut self,
        node: &ConnNode,
        parent_name: Option<&str>,
        is_root: bool,
    ) -> WeaveResult<String> {
        if !is_root {
            let name = self.inherited_name(node, parent_name)?;
            let created = self.db.add_port(node.object, &name, node.dir.port_direction());
            self.record(created, Some(node))?;
            return Ok(name);
        }

        let local = self.local_name(node);
        let name = if node.force_name {
            local
        } else {
            signal_name(&local)
        };
        let resource = self.db.module(node.object).is_some_and(|m| m.resource);
        if resource {
            let module = self.db.describe(node.object);
            self.sink.emit(errors::error_resource_content(
                &self.request,
                "declaration",
                &module,
            ));
            return Ok(name);
        }
        let created = self.db.add_declaration(node.object, &name, true, None);
        self.record(created, None)?;
        Ok(name)
    }

    fn signal_instance(&mut self, node: &ConnNode, parent_name: Option<&str>) -> WeaveResult<String> {
        let connection = self.connection_name(node, parent_name, "");
        let local = self.local_name(node);
        let name = if node.force_name {
            local
        } else {
            pin_name(&local, node.dir)
        };
        let created = self.db.add_pin(node.object, &name, &connection, node.invert);
        self.record(created, Some(node))?;
        Ok(name)
    }

    fn param_module(
        &mut self,
        node: &ConnNode,
        parent_name: Option<&str>,
        is_root: bool,
        default_value: &str,
        local: bool,
    ) -> WeaveResult<String> {
        let (name, local) = if is_root {
            (self.local_name(node), local)
        } else {
            (self.inherited_name(node, parent_name)?, false)
        };
        let created = self.db.add_parameter(node.object, &name, default_value, local);
        self.record(created, None)?;
        Ok(name)
    }

    fn param_instance(
        &mut self,
        node: &ConnNode,
        parent_name: Option<&str>,
        is_root: bool,
        default_value: &str,
        local: bool,
    ) -> WeaveResult<String> {
        if is_root && local {
            let root = self.db.describe(node.object);
            self.sink
                .emit(errors::error_local_param_root(&self.request, &root));
        }
        let value = self.connection_name(node, parent_name, default_value);
        let name = self.local_name(node);
        let created = self.db.add_adjustment(node.object, &name, &value);
        self.record(created, None)?;
        Ok(name)
    }

    /// The parent-assigned name of an instance hop, or `fallback` with `E301`.
    fn connection_name(&self, node: &ConnNode, parent_name: Option<&str>, fallback: &str) -> String {
        match parent_name {
            Some(name) => name.to_string(),
            None => {
                let instance = self.db.describe(node.object);
                self.sink
                    .emit(errors::error_missing_parent_name(&self.request, &instance));
                fallback.to_string()
            }
        }
    }

    /// Keeps a created object, or reports the collision that prevented it.
    ///
    /// `directed` is the hop of a port or pin, which also reports a
    /// direction conflict recorded while merging.
    fn record(
        &mut self,
        created: Result<ObjectId, DbError>,
        directed: Option<&ConnNode>,
    ) -> WeaveResult<()> {
        match created {
            Ok(id) => {
                let object_id = self.db.describe(id);
                trace!(object = %object_id, "realized");
                if directed.is_some_and(|n| n.dir_conflict) {
                    self.sink
                        .emit(errors::warn_direction_conflict(&self.request, &object_id));
                }
                self.created.push(id);
                Ok(())
            }
            Err(DbError::IdExists { id }) => {
                self.sink.emit(errors::error_id_collision(&self.request, &id));
                Ok(())
            }
            Err(DbError::Internal(e)) => Err(e),
            Err(e) => Err(InternalError::new(format!("{}: {e}", self.request))),
        }
    }
}
