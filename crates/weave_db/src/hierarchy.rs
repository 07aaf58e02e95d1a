//! Structural hierarchy queries.
//!
//! The hierarchy is walked leaf to root: an instance leads to the module it
//! is placed in, a module leads to its default instance. Resource modules
//! have no default instance, and unplaced default instances have no parent,
//! so both end a walk.

use weave_common::InternalError;

use crate::database::Database;
use crate::error::DbError;
use crate::ids::ObjectId;
use crate::object::ObjectData;

impl Database {
    /// Returns the structural path from `start` up to its hierarchy root,
    /// `start` first.
    ///
    /// `start` must be a module or an instance. A walk longer than the number
    /// of objects means the graph contains a cycle and is reported as an
    /// internal error.
    pub fn hierarchy_path(&self, start: ObjectId) -> Result<Vec<ObjectId>, DbError> {
        let object = self.expect_object(start)?;
        if !matches!(object.data, ObjectData::Module(_) | ObjectData::Instance(_)) {
            return Err(DbError::WrongType {
                id: self.resolve(object.id).to_string(),
                expected: "module or instance",
                found: object.kind().name(),
            });
        }

        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if path.len() > self.len() {
                return Err(InternalError::new(format!(
                    "hierarchy walk from '{}' does not terminate",
                    self.describe(start)
                ))
                .into());
            }
            path.push(id);
            current = match self.object(id).map(|o| &o.data) {
                Some(ObjectData::Instance(inst)) => inst.parent,
                Some(ObjectData::Module(module)) => module.default_instance,
                _ => {
                    return Err(InternalError::new(format!(
                        "unexpected object '{}' in hierarchy of '{}'",
                        self.describe(id),
                        self.describe(start)
                    ))
                    .into())
                }
            };
        }
        Ok(path)
    }

    /// Returns the topmost object reached from `start`.
    pub fn hierarchy_root(&self, start: ObjectId) -> Result<ObjectId, DbError> {
        let path = self.hierarchy_path(start)?;
        path.last()
            .copied()
            .ok_or_else(|| InternalError::new("empty hierarchy path").into())
    }

    /// Returns `true` if placing an instance of `module` inside `parent`
    /// would make `module` its own ancestor.
    ///
    /// Every instance on a path is preceded by its module, so checking for
    /// the module alone also catches its default instance.
    pub(crate) fn would_create_cycle(
        &self,
        module: ObjectId,
        parent: ObjectId,
    ) -> Result<bool, DbError> {
        Ok(self.hierarchy_path(parent)?.contains(&module))
    }
}
