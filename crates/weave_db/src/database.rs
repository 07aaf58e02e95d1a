//! The [`Database`]: one arena owning every object, plus the lookup indices.
//!
//! All objects are created through the `add_*` constructors, which validate
//! their arguments before touching any state, register the built-in constant
//! attributes, link the object into its structural parent and insert it into
//! the indices. Handles ([`ObjectId`]) stay valid until [`Database::clear`].

use indexmap::{IndexMap, IndexSet};
use tracing::debug;
use weave_common::{Ident, InternalError, Interner, WeaveResult};

use crate::arena::Arena;
use crate::decl::{CodeSection, Declaration};
use crate::error::DbError;
use crate::ids::ObjectId;
use crate::module::{Instance, Module};
use crate::net::Net;
use crate::object::{Attribute, Object, ObjectData, ObjectKind};
use crate::param::{Adjustment, Parameter};
use crate::port::{Pin, Port, PortDirection};
use crate::regfile::{Regfile, RegfileEntry, RegfileReg};

/// The in-memory symbol database.
pub struct Database {
    objects: Arena<ObjectId, Object>,
    objects_by_id: IndexMap<Ident, ObjectId>,
    modules_by_name: IndexMap<Ident, ObjectId>,
    modules_by_id: IndexMap<Ident, ObjectId>,
    instances_by_name: IndexMap<Ident, ObjectId>,
    instances_by_id: IndexMap<Ident, ObjectId>,
    nets_by_name: IndexMap<Ident, ObjectId>,
    nets_by_id: IndexMap<Ident, ObjectId>,
    interner: Interner,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("objects", &self.objects.len())
            .field("modules", &self.modules_by_name.len())
            .field("instances", &self.instances_by_name.len())
            .field("nets", &self.nets_by_name.len())
            .finish()
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

macro_rules! typed_getters {
    ($($(#[$doc:meta])* $name:ident => $variant:ident($ty:ty);)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, id: ObjectId) -> Option<&$ty> {
                match self.objects.try_get(id).map(|o| &o.data) {
                    Some(ObjectData::$variant(x)) => Some(x),
                    _ => None,
                }
            }
        )*
    };
}

impl Database {
    /// Creates an empty database with its own string arena.
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            objects_by_id: IndexMap::new(),
            modules_by_name: IndexMap::new(),
            modules_by_id: IndexMap::new(),
            instances_by_name: IndexMap::new(),
            instances_by_id: IndexMap::new(),
            nets_by_name: IndexMap::new(),
            nets_by_id: IndexMap::new(),
            interner: Interner::new(),
        }
    }

    /// Drops every object, index entry and interned string.
    ///
    /// All previously returned handles and identifiers become meaningless.
    pub fn clear(&mut self) {
        debug!(objects = self.objects.len(), "clearing database");
        self.objects.clear();
        self.objects_by_id.clear();
        self.modules_by_name.clear();
        self.modules_by_id.clear();
        self.instances_by_name.clear();
        self.instances_by_id.clear();
        self.nets_by_name.clear();
        self.nets_by_id.clear();
        self.interner = Interner::new();
    }

    /// Returns the total number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the database holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ---- strings ----

    /// Interns `s` in this database's string arena.
    pub fn intern(&self, s: &str) -> Ident {
        self.interner.get_or_intern(s)
    }

    /// Resolves an identifier produced by this database.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Returns the interner backing this database.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    // ---- lookups ----

    /// Returns the object behind a handle.
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.try_get(id)
    }

    /// All objects with their handles, in creation order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter()
    }

    /// Looks up an object by its `<type>::<scope>` id string.
    pub fn object_by_id(&self, id: &str) -> Option<ObjectId> {
        let key = self.interner.get(id)?;
        self.objects_by_id.get(&key).copied()
    }

    /// Looks up a module by name.
    pub fn module_by_name(&self, name: &str) -> Option<ObjectId> {
        let key = self.interner.get(name)?;
        self.modules_by_name.get(&key).copied()
    }

    /// Looks up a module by its id string.
    pub fn module_by_id(&self, id: &str) -> Option<ObjectId> {
        let key = self.interner.get(id)?;
        self.modules_by_id.get(&key).copied()
    }

    /// Looks up an instance by name.
    pub fn instance_by_name(&self, name: &str) -> Option<ObjectId> {
        let key = self.interner.get(name)?;
        self.instances_by_name.get(&key).copied()
    }

    /// Looks up an instance by its id string.
    pub fn instance_by_id(&self, id: &str) -> Option<ObjectId> {
        let key = self.interner.get(id)?;
        self.instances_by_id.get(&key).copied()
    }

    /// Looks up a net by name.
    pub fn net_by_name(&self, name: &str) -> Option<ObjectId> {
        let key = self.interner.get(name)?;
        self.nets_by_name.get(&key).copied()
    }

    /// Looks up a net by its id string.
    pub fn net_by_id(&self, id: &str) -> Option<ObjectId> {
        let key = self.interner.get(id)?;
        self.nets_by_id.get(&key).copied()
    }

    /// All modules, in creation order.
    pub fn modules(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.modules_by_name.values().copied()
    }

    /// All instances (default instances included), in creation order.
    pub fn instances(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.instances_by_name.values().copied()
    }

    /// All nets, in creation order.
    pub fn nets(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.nets_by_name.values().copied()
    }

    /// Returns the id string of an object, or `None` for a dangling handle.
    pub fn id_of(&self, id: ObjectId) -> Option<&str> {
        self.objects.try_get(id).map(|o| self.interner.resolve(o.id))
    }

    /// Returns the id string of an object, or the raw handle for messages.
    pub fn describe(&self, id: ObjectId) -> String {
        self.id_of(id)
            .map_or_else(|| id.to_string(), ToString::to_string)
    }

    typed_getters! {
        /// Returns the module behind a handle.
        module => Module(Module);
        /// Returns the instance behind a handle.
        instance => Instance(Instance);
        /// Returns the port behind a handle.
        port => Port(Port);
        /// Returns the pin behind a handle.
        pin => Pin(Pin);
        /// Returns the parameter behind a handle.
        parameter => Parameter(Parameter);
        /// Returns the adjustment behind a handle.
        adjustment => Adjustment(Adjustment);
        /// Returns the declaration behind a handle.
        declaration => Declaration(Declaration);
        /// Returns the code section behind a handle.
        code_section => Code(CodeSection);
        /// Returns the net behind a handle.
        net => Net(Net);
        /// Returns the register file behind a handle.
        regfile => Regfile(Regfile);
        /// Returns the register-file entry behind a handle.
        regfile_entry => RegfileEntry(RegfileEntry);
        /// Returns the register behind a handle.
        regfile_reg => RegfileReg(RegfileReg);
    }

    /// Returns the object, or [`DbError::UnknownObject`].
    pub fn expect_object(&self, id: ObjectId) -> Result<&Object, DbError> {
        self.objects
            .try_get(id)
            .ok_or_else(|| DbError::UnknownObject(id.to_string()))
    }

    /// Returns the module, or a typed error for unknown and non-module handles.
    pub fn expect_module(&self, id: ObjectId) -> Result<&Module, DbError> {
        let object = self.expect_object(id)?;
        match &object.data {
            ObjectData::Module(m) => Ok(m),
            _ => Err(self.wrong_type(object, ObjectKind::Module)),
        }
    }

    /// Returns the instance, or a typed error for unknown and non-instance handles.
    pub fn expect_instance(&self, id: ObjectId) -> Result<&Instance, DbError> {
        let object = self.expect_object(id)?;
        match &object.data {
            ObjectData::Instance(i) => Ok(i),
            _ => Err(self.wrong_type(object, ObjectKind::Instance)),
        }
    }

    fn expect_regfile(&self, id: ObjectId) -> Result<&Regfile, DbError> {
        let object = self.expect_object(id)?;
        match &object.data {
            ObjectData::Regfile(r) => Ok(r),
            _ => Err(self.wrong_type(object, ObjectKind::Regfile)),
        }
    }

    fn expect_regfile_entry(&self, id: ObjectId) -> Result<&RegfileEntry, DbError> {
        let object = self.expect_object(id)?;
        match &object.data {
            ObjectData::RegfileEntry(e) => Ok(e),
            _ => Err(self.wrong_type(object, ObjectKind::RegfileEntry)),
        }
    }

    fn wrong_type(&self, object: &Object, expected: ObjectKind) -> DbError {
        DbError::WrongType {
            id: self.interner.resolve(object.id).to_string(),
            expected: expected.name(),
            found: object.kind().name(),
        }
    }

    fn module_mut(&mut self, id: ObjectId) -> WeaveResult<&mut Module> {
        match self.objects.try_get_mut(id).map(|o| &mut o.data) {
            Some(ObjectData::Module(m)) => Ok(m),
            _ => Err(InternalError::new(format!("object {id} is not a module"))),
        }
    }

    fn instance_mut(&mut self, id: ObjectId) -> WeaveResult<&mut Instance> {
        match self.objects.try_get_mut(id).map(|o| &mut o.data) {
            Some(ObjectData::Instance(i)) => Ok(i),
            _ => Err(InternalError::new(format!("object {id} is not an instance"))),
        }
    }

    fn regfile_mut(&mut self, id: ObjectId) -> WeaveResult<&mut Regfile> {
        match self.objects.try_get_mut(id).map(|o| &mut o.data) {
            Some(ObjectData::Regfile(r)) => Ok(r),
            _ => Err(InternalError::new(format!("object {id} is not a regfile"))),
        }
    }

    fn regfile_entry_mut(&mut self, id: ObjectId) -> WeaveResult<&mut RegfileEntry> {
        match self.objects.try_get_mut(id).map(|o| &mut o.data) {
            Some(ObjectData::RegfileEntry(e)) => Ok(e),
            _ => Err(InternalError::new(format!(
                "object {id} is not a regfile entry"
            ))),
        }
    }

    // ---- attributes ----

    /// Sets an attribute, interning both name and value.
    ///
    /// Fails if the object does not exist or the attribute is constant.
    pub fn attr_set(
        &mut self,
        id: ObjectId,
        name: &str,
        value: &str,
        constant: bool,
    ) -> Result<(), DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("attribute"));
        }
        let object = self.expect_object(id)?;
        if let Some(key) = self.interner.get(name) {
            if object.attributes.get(&key).is_some_and(|a| a.constant) {
                return Err(DbError::ConstantAttribute {
                    id: self.interner.resolve(object.id).to_string(),
                    attribute: name.to_string(),
                });
            }
        }
        let key = self.interner.get_or_intern(name);
        let value = self.interner.get_or_intern(value);
        self.objects[id]
            .attributes
            .insert(key, Attribute { value, constant });
        Ok(())
    }

    /// Sets several non-constant attributes.
    ///
    /// Every pair is attempted; the first failure is returned.
    pub fn attr_set_many(&mut self, id: ObjectId, pairs: &[(&str, &str)]) -> Result<(), DbError> {
        let mut first_error = None;
        for (name, value) in pairs {
            if let Err(e) = self.attr_set(id, name, value, false) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Returns an attribute value, or `None` if object or attribute is absent.
    pub fn attr_get(&self, id: ObjectId, name: &str) -> Option<&str> {
        let key = self.interner.get(name)?;
        let attr = self.objects.try_get(id)?.attributes.get(&key)?;
        Some(self.interner.resolve(attr.value))
    }

    /// Lists `(name, value, constant)` for every attribute, in insertion order.
    pub fn attributes(&self, id: ObjectId) -> Result<Vec<(&str, &str, bool)>, DbError> {
        let object = self.expect_object(id)?;
        Ok(object
            .attributes()
            .map(|(k, a)| {
                (
                    self.interner.resolve(k),
                    self.interner.resolve(a.value),
                    a.constant,
                )
            })
            .collect())
    }

    /// Stores a built-in constant attribute on a freshly created object.
    pub(crate) fn set_builtin(&mut self, id: ObjectId, name: &str, value: &str) {
        let key = self.interner.get_or_intern(name);
        let value = self.interner.get_or_intern(value);
        if let Some(object) = self.objects.try_get_mut(id) {
            object.attributes.insert(
                key,
                Attribute {
                    value,
                    constant: true,
                },
            );
        }
    }

    // ---- construction ----

    fn ensure_id_free(&self, id: &str) -> Result<(), DbError> {
        match self.object_by_id(id) {
            Some(_) => Err(DbError::IdExists { id: id.to_string() }),
            None => Ok(()),
        }
    }

    fn ensure_not_resource(&self, module: &Module, what: &'static str) -> Result<(), DbError> {
        if module.resource {
            return Err(DbError::ResourceModule {
                what,
                module: self.interner.resolve(module.name).to_string(),
            });
        }
        Ok(())
    }

    /// Allocates an object and registers it in the global id index with its
    /// `type` and `id` attributes.
    fn insert(&mut self, id: &str, data: ObjectData) -> ObjectId {
        let key = self.interner.get_or_intern(id);
        let kind = data.kind();
        let handle = self.objects.next_id();
        self.objects.alloc(Object::new(handle, key, data));
        self.objects_by_id.insert(key, handle);
        self.set_builtin(handle, "type", kind.name());
        self.set_builtin(handle, "id", id);
        handle
    }

    /// Creates a module. A non-resource module gets its (unplaced) default
    /// instance, named after the module, at the same time.
    pub fn add_module(&mut self, name: &str, ilm: bool, resource: bool) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("module"));
        }
        if self.module_by_name(name).is_some() {
            return Err(DbError::NameExists {
                kind: "module",
                name: name.to_string(),
            });
        }
        let id = ObjectKind::Module.object_id(name);
        self.ensure_id_free(&id)?;
        let instance_id = ObjectKind::Instance.object_id(name);
        if !resource {
            if self.instance_by_name(name).is_some() {
                return Err(DbError::NameExists {
                    kind: "instance",
                    name: name.to_string(),
                });
            }
            self.ensure_id_free(&instance_id)?;
        }

        let name_key = self.intern(name);
        let handle = self.insert(&id, ObjectData::Module(Module::new(name_key, ilm, resource)));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "ilm", flag(ilm));
        self.set_builtin(handle, "resource", flag(resource));
        self.modules_by_name.insert(name_key, handle);
        self.modules_by_id.insert(self.objects[handle].id, handle);

        if !resource {
            let inst = self.insert(
                &instance_id,
                ObjectData::Instance(Instance::new(name_key, handle, None)),
            );
            self.set_builtin(inst, "name", name);
            self.set_builtin(inst, "module", &id);
            self.instances_by_name.insert(name_key, inst);
            self.instances_by_id.insert(self.objects[inst].id, inst);
            let module = self.module_mut(handle)?;
            module.default_instance = Some(inst);
            module.mod_instances.push(inst);
        }
        debug!(module = name, ilm, resource, "module created");
        Ok(handle)
    }

    /// Places an instance of `module` inside `parent`.
    ///
    /// For a resource module a fresh instance named `name` is created. For a
    /// non-resource module `name` must be the module's own name and its
    /// default instance is placed, which can happen only once.
    pub fn add_instance(
        &mut self,
        name: &str,
        module: ObjectId,
        parent: ObjectId,
    ) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("instance"));
        }
        let type_module = self.expect_module(module)?;
        let parent_module = self.expect_module(parent)?;
        let parent_name = self.resolve(parent_module.name).to_string();
        if parent_module.resource {
            return Err(DbError::ParentIsResource {
                instance: name.to_string(),
                parent: parent_name,
            });
        }

        if !type_module.resource {
            let module_name = self.resolve(type_module.name);
            if name != module_name {
                return Err(DbError::NameMismatch {
                    instance: name.to_string(),
                    module: module_name.to_string(),
                });
            }
            let inst = type_module.default_instance.ok_or_else(|| {
                InternalError::new(format!("module '{name}' has no default instance"))
            })?;
            let default = self.expect_instance(inst)?;
            if let Some(placed) = default.parent {
                return Err(DbError::AlreadyPlaced {
                    instance: name.to_string(),
                    parent: self.describe(placed),
                });
            }
            if self.would_create_cycle(module, parent)? {
                return Err(DbError::WouldCreateCycle {
                    instance: name.to_string(),
                    parent: parent_name,
                });
            }
            self.instance_mut(inst)?.parent = Some(parent);
            let parent_id = self.describe(parent);
            self.set_builtin(inst, "parent", &parent_id);
            self.module_mut(parent)?.child_instances.push(inst);
            debug!(instance = name, parent = %parent_name, "default instance placed");
            return Ok(inst);
        }

        if self.instance_by_name(name).is_some() {
            return Err(DbError::NameExists {
                kind: "instance",
                name: name.to_string(),
            });
        }
        let id = ObjectKind::Instance.object_id(name);
        self.ensure_id_free(&id)?;
        if self.would_create_cycle(module, parent)? {
            return Err(DbError::WouldCreateCycle {
                instance: name.to_string(),
                parent: parent_name,
            });
        }

        let name_key = self.intern(name);
        let module_id = self.describe(module);
        let parent_id = self.describe(parent);
        let inst = self.insert(
            &id,
            ObjectData::Instance(Instance::new(name_key, module, Some(parent))),
        );
        self.set_builtin(inst, "name", name);
        self.set_builtin(inst, "module", &module_id);
        self.set_builtin(inst, "parent", &parent_id);
        self.instances_by_name.insert(name_key, inst);
        self.instances_by_id.insert(self.objects[inst].id, inst);
        self.module_mut(parent)?.child_instances.push(inst);
        self.module_mut(module)?.mod_instances.push(inst);
        debug!(instance = name, parent = %parent_name, "resource instance created");
        Ok(inst)
    }

    /// Adds a port to a module's interface.
    pub fn add_port(
        &mut self,
        module: ObjectId,
        name: &str,
        dir: PortDirection,
    ) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("port"));
        }
        let parent = self.expect_module(module)?;
        let id = ObjectKind::Port.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(module);
        let port = Port {
            name: self.intern(name),
            dir,
            parent: module,
            net: None,
        };
        let handle = self.insert(&id, ObjectData::Port(port));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "direction", dir.name());
        self.set_builtin(handle, "parent", &parent_id);
        self.module_mut(module)?.ports.push(handle);
        Ok(handle)
    }

    /// Adds a pin to an instance, connected to `connection` in the parent module.
    pub fn add_pin(
        &mut self,
        instance: ObjectId,
        name: &str,
        connection: &str,
        invert: bool,
    ) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("pin"));
        }
        let parent = self.expect_instance(instance)?;
        let id = ObjectKind::Pin.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(instance);
        let pin = Pin {
            name: self.intern(name),
            connection: self.intern(connection),
            invert,
            parent: instance,
            net: None,
        };
        let handle = self.insert(&id, ObjectData::Pin(pin));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "connection", connection);
        self.set_builtin(handle, "invert", flag(invert));
        self.set_builtin(handle, "parent", &parent_id);
        self.instance_mut(instance)?.pins.push(handle);
        Ok(handle)
    }

    /// Adds a parameter with its default value to a module.
    pub fn add_parameter(
        &mut self,
        module: ObjectId,
        name: &str,
        value: &str,
        local: bool,
    ) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("parameter"));
        }
        let parent = self.expect_module(module)?;
        let id = ObjectKind::Parameter.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(module);
        let param = Parameter {
            name: self.intern(name),
            value: self.intern(value),
            local,
            parent: module,
        };
        let handle = self.insert(&id, ObjectData::Parameter(param));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "value", value);
        self.set_builtin(handle, "local", flag(local));
        self.set_builtin(handle, "parent", &parent_id);
        self.module_mut(module)?.params.push(handle);
        Ok(handle)
    }

    /// Adds a parameter override to an instance.
    pub fn add_adjustment(
        &mut self,
        instance: ObjectId,
        name: &str,
        value: &str,
    ) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("adjustment"));
        }
        let parent = self.expect_instance(instance)?;
        let id = ObjectKind::Adjustment.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(instance);
        let adjustment = Adjustment {
            name: self.intern(name),
            value: self.intern(value),
            parent: instance,
        };
        let handle = self.insert(&id, ObjectData::Adjustment(adjustment));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "value", value);
        self.set_builtin(handle, "parent", &parent_id);
        self.instance_mut(instance)?.adjustments.push(handle);
        Ok(handle)
    }

    /// Adds an internal signal declaration to a non-resource module.
    pub fn add_declaration(
        &mut self,
        module: ObjectId,
        name: &str,
        default_type: bool,
        assign: Option<&str>,
    ) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("declaration"));
        }
        let parent = self.expect_module(module)?;
        self.ensure_not_resource(parent, "declaration")?;
        let id =
            ObjectKind::Declaration.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(module);
        let decl = Declaration {
            name: self.intern(name),
            default_type,
            default_assignment: assign.map(|a| self.intern(a)),
            parent: module,
            net: None,
        };
        let handle = self.insert(&id, ObjectData::Declaration(decl));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "default_type", flag(default_type));
        if let Some(assign) = assign {
            self.set_builtin(handle, "assign", assign);
        }
        self.set_builtin(handle, "parent", &parent_id);
        self.module_mut(module)?.decls.push(handle);
        Ok(handle)
    }

    /// Adds a verbatim code section to a non-resource module.
    ///
    /// Without a name, the section is called `_cs_<n>` where `n` counts the
    /// module's existing sections.
    pub fn add_codesection(
        &mut self,
        name: Option<&str>,
        code: &str,
        module: ObjectId,
    ) -> Result<ObjectId, DbError> {
        let parent = self.expect_module(module)?;
        self.ensure_not_resource(parent, "code section")?;
        let name = match name {
            Some("") => return Err(DbError::EmptyName("code section")),
            Some(name) => name.to_string(),
            None => format!("_cs_{}", parent.code.len()),
        };
        let id = ObjectKind::Code.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(module);
        let section = CodeSection {
            name: self.intern(&name),
            code: self.intern(code),
            parent: module,
        };
        let handle = self.insert(&id, ObjectData::Code(section));
        self.set_builtin(handle, "name", &name);
        self.set_builtin(handle, "code", code);
        self.set_builtin(handle, "parent", &parent_id);
        self.module_mut(module)?.code.push(handle);
        Ok(handle)
    }

    /// Attaches a register file to a non-resource module.
    pub fn add_regfile(&mut self, name: &str, module: ObjectId) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("regfile"));
        }
        let parent = self.expect_module(module)?;
        self.ensure_not_resource(parent, "register file")?;
        let id = ObjectKind::Regfile.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(module);
        let regfile = Regfile {
            name: self.intern(name),
            parent: module,
            entries: Vec::new(),
        };
        let handle = self.insert(&id, ObjectData::Regfile(regfile));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "parent", &parent_id);
        self.module_mut(module)?.regfiles.push(handle);
        Ok(handle)
    }

    /// Adds an entry to a register file.
    pub fn add_regfile_entry(&mut self, name: &str, regfile: ObjectId) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("regfile entry"));
        }
        let parent = self.expect_regfile(regfile)?;
        let id =
            ObjectKind::RegfileEntry.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(regfile);
        let entry = RegfileEntry {
            name: self.intern(name),
            parent: regfile,
            regs: Vec::new(),
        };
        let handle = self.insert(&id, ObjectData::RegfileEntry(entry));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "parent", &parent_id);
        self.regfile_mut(regfile)?.entries.push(handle);
        Ok(handle)
    }

    /// Adds a register to a register-file entry.
    pub fn add_regfile_reg(&mut self, name: &str, entry: ObjectId) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("regfile reg"));
        }
        let parent = self.expect_regfile_entry(entry)?;
        let id = ObjectKind::RegfileReg.object_id(&format!("{}.{name}", self.resolve(parent.name)));
        self.ensure_id_free(&id)?;
        let parent_id = self.describe(entry);
        let reg = RegfileReg {
            name: self.intern(name),
            parent: entry,
        };
        let handle = self.insert(&id, ObjectData::RegfileReg(reg));
        self.set_builtin(handle, "name", name);
        self.set_builtin(handle, "parent", &parent_id);
        self.regfile_entry_mut(entry)?.regs.push(handle);
        Ok(handle)
    }

    /// Groups ports, pins and declarations into a named net.
    ///
    /// Every member gets the constant `signal`, `net` and `netid` attributes
    /// and its net back-reference. Duplicate handles are added once.
    pub fn add_net(&mut self, name: &str, members: &[ObjectId]) -> Result<ObjectId, DbError> {
        if name.is_empty() {
            return Err(DbError::EmptyName("net"));
        }
        if self.net_by_name(name).is_some() {
            return Err(DbError::NetExists(name.to_string()));
        }
        let id = ObjectKind::Net.object_id(name);
        self.ensure_id_free(&id)?;

        let members: IndexSet<ObjectId> = members.iter().copied().collect();
        for &member in &members {
            let object = self.expect_object(member)?;
            let current = match &object.data {
                ObjectData::Port(p) => p.net,
                ObjectData::Pin(p) => p.net,
                ObjectData::Declaration(d) => d.net,
                _ => {
                    return Err(InternalError::new(format!(
                        "{} '{}' cannot be a net member",
                        object.kind(),
                        self.resolve(object.id)
                    ))
                    .into())
                }
            };
            if let Some(net) = current {
                return Err(DbError::AlreadyInNet {
                    id: self.resolve(object.id).to_string(),
                    net: self.describe(net),
                });
            }
        }

        let name_key = self.intern(name);
        let net = Net {
            name: name_key,
            members: members.iter().copied().collect(),
        };
        let handle = self.insert(&id, ObjectData::Net(net));
        self.set_builtin(handle, "name", name);
        for &member in &members {
            self.set_builtin(member, "signal", name);
            self.set_builtin(member, "net", name);
            self.set_builtin(member, "netid", &id);
            match &mut self.objects[member].data {
                ObjectData::Port(p) => p.net = Some(handle),
                ObjectData::Pin(p) => p.net = Some(handle),
                ObjectData::Declaration(d) => d.net = Some(handle),
                _ => {}
            }
        }
        self.nets_by_name.insert(name_key, handle);
        self.nets_by_id.insert(self.objects[handle].id, handle);
        debug!(net = name, members = members.len(), "net created");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_and_leaf() -> (Database, ObjectId, ObjectId) {
        let mut db = Database::new();
        let top = db.add_module("Top", false, false).unwrap();
        let leaf = db.add_module("Leaf", false, false).unwrap();
        (db, top, leaf)
    }

    #[test]
    fn module_has_builtin_attributes() {
        let mut db = Database::new();
        let m = db.add_module("core", true, false).unwrap();
        assert_eq!(db.attr_get(m, "type"), Some("module"));
        assert_eq!(db.attr_get(m, "id"), Some("module::core"));
        assert_eq!(db.attr_get(m, "name"), Some("core"));
        assert_eq!(db.attr_get(m, "ilm"), Some("true"));
        assert_eq!(db.attr_get(m, "resource"), Some("false"));
        assert_eq!(db.module_by_name("core"), Some(m));
        assert_eq!(db.module_by_id("module::core"), Some(m));
    }

    #[test]
    fn non_resource_module_gets_default_instance() {
        let (db, top, _) = top_and_leaf();
        let inst = db.module(top).unwrap().default_instance.unwrap();
        assert_eq!(db.instance_by_name("Top"), Some(inst));
        assert_eq!(db.id_of(inst), Some("instance::Top"));
        assert!(db.instance(inst).unwrap().parent.is_none());
        assert_eq!(db.module(top).unwrap().mod_instances, vec![inst]);
    }

    #[test]
    fn resource_module_has_no_default_instance() {
        let mut db = Database::new();
        let r = db.add_module("ram", false, true).unwrap();
        assert!(db.module(r).unwrap().default_instance.is_none());
        assert!(db.instance_by_name("ram").is_none());
    }

    #[test]
    fn duplicate_module_rejected_without_mutation() {
        let mut db = Database::new();
        db.add_module("Top", false, false).unwrap();
        let before = db.len();
        let err = db.add_module("Top", false, true).unwrap_err();
        assert!(matches!(err, DbError::NameExists { kind: "module", .. }));
        assert_eq!(db.len(), before);
        assert_eq!(db.modules().count(), 1);
    }

    #[test]
    fn module_colliding_with_resource_instance_name_rejected() {
        let mut db = Database::new();
        let top = db.add_module("Top", false, false).unwrap();
        let ram = db.add_module("ram", false, true).unwrap();
        db.add_instance("u_mem", ram, top).unwrap();
        let err = db.add_module("u_mem", false, false).unwrap_err();
        assert!(matches!(err, DbError::NameExists { kind: "instance", .. }));
        assert!(db.module_by_name("u_mem").is_none());
    }

    #[test]
    fn empty_module_name_rejected() {
        let mut db = Database::new();
        assert_eq!(db.add_module("", false, false), Err(DbError::EmptyName("module")));
    }

    #[test]
    fn place_default_instance_once() {
        let (mut db, top, leaf) = top_and_leaf();
        let inst = db.add_instance("Leaf", leaf, top).unwrap();
        assert_eq!(db.instance(inst).unwrap().parent, Some(top));
        assert_eq!(db.attr_get(inst, "parent"), Some("module::Top"));
        assert_eq!(db.module(top).unwrap().child_instances, vec![inst]);

        let other = db.add_module("Other", false, false).unwrap();
        let err = db.add_instance("Leaf", leaf, other).unwrap_err();
        assert!(matches!(err, DbError::AlreadyPlaced { .. }));
        assert!(db.module(other).unwrap().child_instances.is_empty());
    }

    #[test]
    fn non_resource_name_must_match() {
        let (mut db, top, leaf) = top_and_leaf();
        let err = db.add_instance("u_leaf", leaf, top).unwrap_err();
        assert!(matches!(err, DbError::NameMismatch { .. }));
    }

    #[test]
    fn resource_parent_rejected() {
        let (mut db, _, leaf) = top_and_leaf();
        let ram = db.add_module("ram", false, true).unwrap();
        let err = db.add_instance("Leaf", leaf, ram).unwrap_err();
        assert!(matches!(err, DbError::ParentIsResource { .. }));
    }

    #[test]
    fn resource_instances_tracked_per_module() {
        let (mut db, top, leaf) = top_and_leaf();
        db.add_instance("Leaf", leaf, top).unwrap();
        let ram = db.add_module("ram", false, true).unwrap();
        let a = db.add_instance("u_ram0", ram, top).unwrap();
        let b = db.add_instance("u_ram1", ram, leaf).unwrap();
        assert_eq!(db.module(ram).unwrap().mod_instances, vec![a, b]);
        assert_eq!(db.instance(b).unwrap().parent, Some(leaf));
        assert_eq!(db.attr_get(a, "module"), Some("module::ram"));

        let err = db.add_instance("u_ram0", ram, leaf).unwrap_err();
        assert!(matches!(err, DbError::NameExists { kind: "instance", .. }));
    }

    #[test]
    fn wrong_type_arguments() {
        let (mut db, top, leaf) = top_and_leaf();
        let inst = db.add_instance("Leaf", leaf, top).unwrap();
        let err = db.add_instance("Top", top, inst).unwrap_err();
        assert!(matches!(
            err,
            DbError::WrongType {
                expected: "module",
                found: "instance",
                ..
            }
        ));
        let err = db.add_pin(top, "clk", "clk", false).unwrap_err();
        assert!(matches!(err, DbError::WrongType { .. }));
    }

    #[test]
    fn pin_id_collision() {
        let (mut db, top, leaf) = top_and_leaf();
        let inst = db.add_instance("Leaf", leaf, top).unwrap();
        let pin = db.add_pin(inst, "clk_i", "clk", true).unwrap();
        assert_eq!(db.id_of(pin), Some("pin::Leaf.clk_i"));
        assert_eq!(db.attr_get(pin, "connection"), Some("clk"));
        assert_eq!(db.attr_get(pin, "invert"), Some("true"));
        assert_eq!(db.instance(inst).unwrap().pins, vec![pin]);
        let err = db.add_pin(inst, "clk_i", "other", false).unwrap_err();
        assert_eq!(
            err,
            DbError::IdExists {
                id: "pin::Leaf.clk_i".into()
            }
        );
    }

    #[test]
    fn resource_module_content_restrictions() {
        let mut db = Database::new();
        let ram = db.add_module("ram", false, true).unwrap();
        assert!(db.add_port(ram, "addr_i", PortDirection::Input).is_ok());
        assert!(db.add_parameter(ram, "WIDTH", "8", false).is_ok());
        assert!(matches!(
            db.add_declaration(ram, "tmp_s", true, None),
            Err(DbError::ResourceModule { .. })
        ));
        assert!(matches!(
            db.add_codesection(None, "assign a = b;", ram),
            Err(DbError::ResourceModule { .. })
        ));
        assert!(matches!(
            db.add_regfile("rf", ram),
            Err(DbError::ResourceModule { .. })
        ));
    }

    #[test]
    fn codesection_default_names() {
        let (mut db, top, _) = top_and_leaf();
        let a = db.add_codesection(None, "a", top).unwrap();
        let b = db.add_codesection(None, "b", top).unwrap();
        let c = db.add_codesection(Some("glue"), "c", top).unwrap();
        assert_eq!(db.id_of(a), Some("codesection::Top._cs_0"));
        assert_eq!(db.id_of(b), Some("codesection::Top._cs_1"));
        assert_eq!(db.id_of(c), Some("codesection::Top.glue"));
        assert_eq!(db.attr_get(b, "code"), Some("b"));
        assert_eq!(db.module(top).unwrap().code.len(), 3);
    }

    #[test]
    fn regfile_hierarchy() {
        let (mut db, top, _) = top_and_leaf();
        let rf = db.add_regfile("rf", top).unwrap();
        let entry = db.add_regfile_entry("ctrl", rf).unwrap();
        let reg = db.add_regfile_reg("enable", entry).unwrap();
        assert_eq!(db.id_of(rf), Some("regfile::Top.rf"));
        assert_eq!(db.id_of(entry), Some("regfile-entry::rf.ctrl"));
        assert_eq!(db.id_of(reg), Some("regfile-reg::ctrl.enable"));
        assert_eq!(db.regfile(rf).unwrap().entries, vec![entry]);
        assert_eq!(db.regfile_entry(entry).unwrap().regs, vec![reg]);
        assert_eq!(db.attr_get(reg, "type"), Some("regfile-reg"));
        assert!(matches!(
            db.add_regfile_reg("x", rf),
            Err(DbError::WrongType { .. })
        ));
    }

    #[test]
    fn constant_attributes_are_protected() {
        let (mut db, top, _) = top_and_leaf();
        let err = db.attr_set(top, "name", "Other", false).unwrap_err();
        assert!(matches!(err, DbError::ConstantAttribute { .. }));
        assert_eq!(db.attr_get(top, "name"), Some("Top"));

        db.attr_set(top, "author", "me", false).unwrap();
        db.attr_set(top, "author", "you", true).unwrap();
        assert_eq!(db.attr_get(top, "author"), Some("you"));
        assert!(db.attr_set(top, "author", "them", false).is_err());
    }

    #[test]
    fn attr_get_absent() {
        let (db, top, _) = top_and_leaf();
        assert_eq!(db.attr_get(top, "never_set"), None);
        assert_eq!(db.attr_get(ObjectId::from_raw(999), "name"), None);
    }

    #[test]
    fn attr_set_many_reports_first_failure() {
        let (mut db, top, _) = top_and_leaf();
        let err = db
            .attr_set_many(top, &[("a", "1"), ("id", "x"), ("b", "2")])
            .unwrap_err();
        assert!(matches!(err, DbError::ConstantAttribute { .. }));
        assert_eq!(db.attr_get(top, "a"), Some("1"));
        assert_eq!(db.attr_get(top, "b"), Some("2"));
    }

    #[test]
    fn attribute_listing_in_insertion_order() {
        let mut db = Database::new();
        let m = db.add_module("m", false, true).unwrap();
        db.attr_set(m, "note", "hi", false).unwrap();
        let attrs = db.attributes(m).unwrap();
        let names: Vec<_> = attrs.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(names, ["type", "id", "name", "ilm", "resource", "note"]);
        assert_eq!(attrs[5], ("note", "hi", false));
    }

    #[test]
    fn net_sets_member_back_references() {
        let (mut db, top, leaf) = top_and_leaf();
        let inst = db.add_instance("Leaf", leaf, top).unwrap();
        let decl = db.add_declaration(top, "data_s", true, None).unwrap();
        let pin = db.add_pin(inst, "data_o", "data_s", false).unwrap();
        let port = db.add_port(leaf, "data_o", PortDirection::Output).unwrap();

        let net = db.add_net("data", &[decl, pin, port, pin]).unwrap();
        assert_eq!(db.net_by_name("data"), Some(net));
        assert_eq!(db.net(net).unwrap().members, vec![decl, pin, port]);
        for member in [decl, pin, port] {
            assert_eq!(db.object(member).unwrap().net(), Some(net));
            assert_eq!(db.attr_get(member, "signal"), Some("data"));
            assert_eq!(db.attr_get(member, "netid"), Some("net::data"));
        }
        assert!(db.attr_set(pin, "signal", "x", false).is_err());
    }

    #[test]
    fn net_rejections_leave_database_unchanged() {
        let (mut db, top, _) = top_and_leaf();
        let decl = db.add_declaration(top, "a_s", true, None).unwrap();
        db.add_net("a", &[decl]).unwrap();
        let before = db.len();

        assert_eq!(db.add_net("a", &[]), Err(DbError::NetExists("a".into())));
        assert!(matches!(db.add_net("b", &[decl]), Err(DbError::AlreadyInNet { .. })));
        assert!(matches!(db.add_net("c", &[top]), Err(DbError::Internal(_))));
        assert_eq!(db.add_net("", &[]), Err(DbError::EmptyName("net")));
        assert_eq!(db.len(), before);
        assert_eq!(db.nets().count(), 1);
    }

    #[test]
    fn declaration_assignment_attribute() {
        let (mut db, top, _) = top_and_leaf();
        let d = db.add_declaration(top, "const_s", false, Some("1'b0")).unwrap();
        assert_eq!(db.attr_get(d, "assign"), Some("1'b0"));
        assert_eq!(db.attr_get(d, "default_type"), Some("false"));
        let decl = db.declaration(d).unwrap();
        assert_eq!(decl.default_assignment.map(|a| db.resolve(a)), Some("1'b0"));
    }

    #[test]
    fn adjustment_on_instance() {
        let (mut db, top, leaf) = top_and_leaf();
        let inst = db.add_instance("Leaf", leaf, top).unwrap();
        let adj = db.add_adjustment(inst, "WIDTH", "WIDTH_TOP").unwrap();
        assert_eq!(db.id_of(adj), Some("adjustment::Leaf.WIDTH"));
        assert_eq!(db.attr_get(adj, "value"), Some("WIDTH_TOP"));
        assert_eq!(db.instance(inst).unwrap().adjustments, vec![adj]);
    }

    #[test]
    fn clear_invalidates_everything() {
        let (mut db, top, _) = top_and_leaf();
        db.clear();
        assert!(db.is_empty());
        assert!(db.object(top).is_none());
        assert!(db.module_by_name("Top").is_none());
        assert!(db.interner().is_empty());
        assert!(db.add_module("Top", false, false).is_ok());
    }

    #[test]
    fn objects_listed_in_creation_order() {
        let (db, _, _) = top_and_leaf();
        let ids: Vec<_> = db.objects().map(|(h, _)| db.id_of(h).unwrap()).collect();
        assert_eq!(
            ids,
            ["module::Top", "instance::Top", "module::Leaf", "instance::Leaf"]
        );
    }
}
