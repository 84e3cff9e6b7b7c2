//! Lazily materialized stubs.
//!
//! A [`Stub`] stands in for an instance of a registered type. Its members
//! (properties and declared methods) are resolved on first access and cached
//! in a per-member once-cell, so a member that is never read is never
//! generated. Resolution follows the same priority as the population engine:
//! type overrides, the mode's scalar table, enum pick, containers, then
//! nested beans.
//!
//! Overrides and collection sizes live in context layers. Every stub owns a
//! layer and hands a child layer to the stubs nested under it, so an override
//! registered on a stub applies to everything below it.

use crate::config::{BuildMode, Configuration};
use crate::engine::Populator;
use crate::error::GeneratorError;
use crate::factory::ValueFactory;
use crate::scalars::ScalarSource;
use crate::size::SizeRange;
use crate::stack::TypeStack;
use crate::table::FactoryTable;
use beanfill_core::{
    Instance, PropertyKind, PropertyPath, TypeDescriptor, TypeKind, TypeRef, TypeRegistry, Value,
};
use once_cell::unsync::OnceCell;
use rand::seq::SliceRandom;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Member names answered by the runtime itself rather than by generation.
const DELEGATED_MEMBERS: &[&str] = &[
    "equals",
    "hash_code",
    "hashcode",
    "to_string",
    "tostring",
    "iterator",
    "into_iter",
    "finalize",
    "drop",
    "clone",
];

struct StubShared<'r> {
    registry: &'r TypeRegistry,
    config: Configuration,
    table: FactoryTable,
    source: RefCell<Box<dyn ScalarSource>>,
}

struct StubLayer {
    parent: Option<Rc<StubLayer>>,
    overrides: RefCell<Vec<(TypeRef, ValueFactory)>>,
    size: Cell<Option<SizeRange>>,
}

impl StubLayer {
    fn root(config: &Configuration) -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            overrides: RefCell::new(config.type_factories().to_vec()),
            size: Cell::new(None),
        })
    }

    fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            overrides: RefCell::new(Vec::new()),
            size: Cell::new(None),
        })
    }

    fn insert(&self, ty: TypeRef, factory: ValueFactory) {
        let mut overrides = self.overrides.borrow_mut();
        match overrides.iter_mut().find(|(t, _)| *t == ty) {
            Some(entry) => entry.1 = factory,
            None => overrides.push((ty, factory)),
        }
    }

    /// Nearest override assignable from `declared`, this layer first.
    fn type_factory(&self, registry: &TypeRegistry, declared: &TypeRef) -> Option<ValueFactory> {
        let own = self
            .overrides
            .borrow()
            .iter()
            .find(|(target, _)| registry.is_assignable(target, declared))
            .map(|(_, factory)| factory.clone());
        own.or_else(|| {
            self.parent
                .as_ref()
                .and_then(|parent| parent.type_factory(registry, declared))
        })
    }

    fn collection_size(&self) -> Option<SizeRange> {
        self.size
            .get()
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.collection_size()))
    }
}

/// Creates stubs for registered types.
pub struct Stubber<'r> {
    shared: Rc<StubShared<'r>>,
    root: Rc<StubLayer>,
}

impl<'r> Stubber<'r> {
    /// Create a stubber over a registry, with the overrides and mode of
    /// `config` and its own scalar source.
    pub fn new(
        registry: &'r TypeRegistry,
        config: Configuration,
        source: Box<dyn ScalarSource>,
    ) -> Self {
        let root = StubLayer::root(&config);
        let shared = StubShared {
            registry,
            table: FactoryTable::for_mode(config.mode()),
            config,
            source: RefCell::new(source),
        };
        Self {
            shared: Rc::new(shared),
            root,
        }
    }

    /// Stub a non-generic type by name.
    pub fn stub(&self, type_name: &str) -> Result<Stub<'r>, GeneratorError> {
        let descriptor = self.descriptor(type_name)?;
        if descriptor.is_generic() {
            return Err(GeneratorError::UnresolvedGenericType(type_name.to_string()));
        }
        self.create(TypeRef::named(type_name), descriptor)
    }

    /// Stub a generic type with reified arguments, e.g. `Page<Person>`.
    pub fn stub_reified(&self, ty: &TypeRef) -> Result<Stub<'r>, GeneratorError> {
        let TypeRef::Named { name, args } = ty else {
            return Err(GeneratorError::NotGeneric(ty.to_string()));
        };
        let descriptor = self.descriptor(name)?;
        if !descriptor.is_generic() || args.is_empty() || args.len() != descriptor.type_params.len()
        {
            return Err(GeneratorError::NotGeneric(ty.to_string()));
        }
        self.create(ty.clone(), descriptor)
    }

    fn descriptor(&self, type_name: &str) -> Result<&'r TypeDescriptor, GeneratorError> {
        let descriptor = self
            .shared
            .registry
            .get(type_name)
            .ok_or_else(|| GeneratorError::UnknownType(type_name.to_string()))?;
        if descriptor.is_final {
            return Err(GeneratorError::FinalType(type_name.to_string()));
        }
        Ok(descriptor)
    }

    fn create(&self, ty: TypeRef, descriptor: &'r TypeDescriptor) -> Result<Stub<'r>, GeneratorError> {
        if descriptor.kind == TypeKind::Enum {
            return Err(GeneratorError::NotInstantiable(descriptor.name.clone()));
        }
        let path = match self.shared.config.root_name() {
            Some(name) => PropertyPath::root(name),
            None => PropertyPath::for_type(&descriptor.name),
        };
        debug!("Stubbing {} at {}", ty, path);
        let stack = TypeStack::root(&ty);
        Ok(Stub::new(
            Rc::clone(&self.shared),
            StubLayer::child(&self.root),
            ty,
            descriptor,
            stack,
            path,
        ))
    }
}

struct Member<'r> {
    name: String,
    returns: TypeRef,
    is_property: bool,
    delegated: bool,
    cell: OnceCell<StubValue<'r>>,
}

/// A lazily resolved member value.
pub enum StubValue<'r> {
    /// A resolved terminal or eagerly built value
    Value(Value),
    /// A nested stub
    Stub(Stub<'r>),
    /// Array, list or set elements
    Elements {
        kind: PropertyKind,
        items: Vec<StubValue<'r>>,
    },
    /// Map entries
    Entries(Vec<(StubValue<'r>, StubValue<'r>)>),
}

impl<'r> StubValue<'r> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_stub(&self) -> Option<&Stub<'r>> {
        match self {
            Self::Stub(stub) => Some(stub),
            _ => None,
        }
    }

    /// Elements of an array, list or set.
    pub fn elements(&self) -> Option<&[StubValue<'r>]> {
        match self {
            Self::Elements { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Resolve everything below this value into a plain [`Value`].
    pub fn materialize(&self) -> Result<Value, GeneratorError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Stub(stub) => stub.materialize(),
            Self::Elements { kind, items } => {
                let mut container = match kind {
                    PropertyKind::Array => Value::Array(Vec::new()),
                    PropertyKind::Set => Value::Set(Vec::new()),
                    _ => Value::List(Vec::new()),
                };
                for item in items {
                    container.push_element(item.materialize()?);
                }
                Ok(container)
            }
            Self::Entries(entries) => {
                let mut map = Value::Map(Vec::new());
                for (key, value) in entries {
                    map.insert_entry(key.materialize()?, value.materialize()?);
                }
                Ok(map)
            }
        }
    }
}

/// Outcome of invoking a stub member.
pub enum Invocation<'s, 'r> {
    /// The member's (cached) value
    Value(&'s StubValue<'r>),
    /// Handled by the runtime; nothing was generated
    Delegated,
}

/// An instance whose members are generated on first access.
///
/// Stubs share their context through [`Rc`] and are therefore `!Send`.
pub struct Stub<'r> {
    ty: TypeRef,
    descriptor: &'r TypeDescriptor,
    shared: Rc<StubShared<'r>>,
    layer: Rc<StubLayer>,
    stack: TypeStack,
    path: PropertyPath,
    members: Vec<Member<'r>>,
}

impl<'r> Stub<'r> {
    fn new(
        shared: Rc<StubShared<'r>>,
        layer: Rc<StubLayer>,
        ty: TypeRef,
        descriptor: &'r TypeDescriptor,
        stack: TypeStack,
        path: PropertyPath,
    ) -> Self {
        let bindings: HashMap<String, TypeRef> = descriptor.bindings(&reified_args(&ty));
        let properties = descriptor
            .properties
            .iter()
            .map(|p| (p.name.as_str(), &p.property_type, true));
        let methods = descriptor
            .methods
            .iter()
            .map(|m| (m.name.as_str(), &m.returns, false));

        let members = properties
            .chain(methods)
            .map(|(name, returns, is_property)| {
                let returns = returns.substitute(&bindings);
                Member {
                    name: name.to_string(),
                    delegated: is_delegated(name) || returns == TypeRef::Unit,
                    returns,
                    is_property,
                    cell: OnceCell::new(),
                }
            })
            .collect();

        Self {
            ty,
            descriptor,
            shared,
            layer,
            stack,
            path,
            members,
        }
    }

    /// The stubbed type, with reified arguments.
    pub fn type_ref(&self) -> &TypeRef {
        &self.ty
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Names of all members, properties first.
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// Whether a member has already been resolved.
    pub fn is_resolved(&self, member: &str) -> bool {
        self.member(member).is_ok_and(|m| m.cell.get().is_some())
    }

    /// Register a type-keyed override for this stub and everything nested
    /// under it. Members already resolved keep their values.
    pub fn with(&self, ty: TypeRef, factory: impl Into<ValueFactory>) -> &Self {
        self.layer.insert(ty, factory.into());
        self
    }

    /// Collection size for containers resolved from this stub and below.
    pub fn with_collection_size(&self, min: usize, max: usize) -> Result<&Self, GeneratorError> {
        self.layer.size.set(Some(SizeRange::new(min, max)?));
        Ok(self)
    }

    /// Invoke a member, resolving and caching its value on first access.
    pub fn invoke(&self, member: &str) -> Result<Invocation<'_, 'r>, GeneratorError> {
        let slot = self.member(member)?;
        if slot.delegated {
            trace!("Delegating {}.{}", self.ty, slot.name);
            return Ok(Invocation::Delegated);
        }
        let value = slot
            .cell
            .get_or_try_init(|| self.resolve(&slot.returns, &self.path.child(&slot.name)))?;
        Ok(Invocation::Value(value))
    }

    /// The value of a member, or `None` for delegated members.
    pub fn value(&self, member: &str) -> Result<Option<&StubValue<'r>>, GeneratorError> {
        match self.invoke(member)? {
            Invocation::Value(value) => Ok(Some(value)),
            Invocation::Delegated => Ok(None),
        }
    }

    /// Resolve every property into a plain bean.
    pub fn materialize(&self) -> Result<Value, GeneratorError> {
        let mut instance = Instance::new(self.descriptor.name.clone())
            .with_type_args(reified_args(&self.ty));
        for member in self.members.iter().filter(|m| m.is_property) {
            let value = match self.invoke(&member.name)? {
                Invocation::Value(value) => value.materialize()?,
                Invocation::Delegated => continue,
            };
            instance.put(member.name.clone(), value);
        }
        Ok(Value::Bean(instance))
    }

    fn member(&self, name: &str) -> Result<&Member<'r>, GeneratorError> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| GeneratorError::UnknownMember {
                type_name: self.ty.to_string(),
                member: name.to_string(),
            })
    }

    fn resolve(&self, declared: &TypeRef, path: &PropertyPath) -> Result<StubValue<'r>, GeneratorError> {
        let shared = &self.shared;
        if shared.config.mode() == BuildMode::Null {
            return Ok(StubValue::Value(Value::unset(declared)));
        }
        trace!("Resolving {} as {}", path, declared);

        if let Some(factory) = self.layer.type_factory(shared.registry, declared) {
            let value = factory.produce(shared.source.borrow_mut().rng());
            return Ok(StubValue::Value(value));
        }

        match declared {
            TypeRef::Primitive(_) | TypeRef::Scalar(_) => {
                let mut source = shared.source.borrow_mut();
                let value = shared.table.produce(declared, &mut **source);
                Ok(StubValue::Value(value.unwrap_or(Value::Null)))
            }
            TypeRef::Array(_) | TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) => {
                self.resolve_container(declared, path)
            }
            TypeRef::Named { name, .. } if shared.registry.is_enum(name) => self.pick_constant(name),
            TypeRef::Named { .. } => self.resolve_bean(declared, path),
            TypeRef::Param(_) | TypeRef::Unit => Ok(StubValue::Value(Value::Null)),
        }
    }

    fn pick_constant(&self, enum_name: &str) -> Result<StubValue<'r>, GeneratorError> {
        let shared = &self.shared;
        if shared.config.mode() != BuildMode::Random {
            return Ok(StubValue::Value(Value::Null));
        }
        let descriptor = shared
            .registry
            .get(enum_name)
            .ok_or_else(|| GeneratorError::UnknownType(enum_name.to_string()))?;
        let mut source = shared.source.borrow_mut();
        let constant = descriptor
            .constants
            .choose(source.rng())
            .ok_or_else(|| GeneratorError::EmptyEnumeration(enum_name.to_string()))?;
        Ok(StubValue::Value(Value::Enum {
            type_name: enum_name.to_string(),
            constant: constant.clone(),
        }))
    }

    fn resolve_bean(&self, declared: &TypeRef, path: &PropertyPath) -> Result<StubValue<'r>, GeneratorError> {
        let shared = &self.shared;
        let concrete = {
            let mut source = shared.source.borrow_mut();
            declared
                .type_name()
                .and_then(|name| shared.config.subtypes_of(name).choose(source.rng()))
                .cloned()
                .unwrap_or_else(|| declared.clone())
        };
        if self.stack.would_overflow(&concrete) {
            trace!("Not entering {} at {}: re-entered", concrete, path);
            return Ok(StubValue::Value(Value::Null));
        }

        let name = concrete.type_name().unwrap_or_default();
        let descriptor = shared
            .registry
            .get(name)
            .ok_or_else(|| GeneratorError::UnknownType(name.to_string()))?;

        if descriptor.is_final {
            debug!("Building final type {} at {} eagerly", concrete, path);
            let mut source = shared.source.borrow_mut();
            let value = Populator::new(shared.registry, &shared.config, &mut **source)
                .generate(&concrete, path, &self.stack)?;
            return Ok(StubValue::Value(value));
        }

        Ok(StubValue::Stub(Stub::new(
            Rc::clone(shared),
            StubLayer::child(&self.layer),
            concrete.clone(),
            descriptor,
            self.stack.push(&concrete),
            path.clone(),
        )))
    }

    fn resolve_container(
        &self,
        declared: &TypeRef,
        path: &PropertyPath,
    ) -> Result<StubValue<'r>, GeneratorError> {
        let size = {
            let range = self
                .layer
                .collection_size()
                .unwrap_or_else(|| self.shared.config.sizes().default_range());
            range.draw(self.shared.source.borrow_mut().rng())
        };

        match declared {
            TypeRef::Array(element) => {
                // Arrays keep null elements
                let items = (0..size)
                    .map(|i| self.resolve_element(element, &path.index(i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(StubValue::Elements {
                    kind: PropertyKind::Array,
                    items,
                })
            }
            TypeRef::List(element) | TypeRef::Set(element) => {
                let is_set = matches!(declared, TypeRef::Set(_));
                let mut items: Vec<StubValue<'r>> = Vec::with_capacity(size);
                for i in 0..size {
                    let item = self.resolve_element(element, &path.index(i))?;
                    if item.is_null() || (is_set && contains_value(&items, &item)) {
                        continue;
                    }
                    items.push(item);
                }
                let kind = if is_set { PropertyKind::Set } else { PropertyKind::List };
                Ok(StubValue::Elements { kind, items })
            }
            TypeRef::Map(key_type, value_type) => {
                let mut entries: Vec<(StubValue<'r>, StubValue<'r>)> = Vec::with_capacity(size);
                for i in 0..size {
                    let entry_path = path.index(i);
                    let key = self.resolve_element(key_type, &entry_path)?;
                    let value = self.resolve_element(value_type, &entry_path)?;
                    if key.is_null() {
                        continue;
                    }
                    match entries
                        .iter_mut()
                        .find(|(k, _)| k.as_value().is_some() && k.as_value() == key.as_value())
                    {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(StubValue::Entries(entries))
            }
            _ => Ok(StubValue::Value(Value::Null)),
        }
    }

    fn resolve_element(&self, element: &TypeRef, path: &PropertyPath) -> Result<StubValue<'r>, GeneratorError> {
        if self.stack.would_overflow(element) {
            trace!("Skipping {}: {} re-entered", path, element);
            return Ok(StubValue::Value(Value::Null));
        }
        self.resolve(element, path)
    }
}

fn is_delegated(name: &str) -> bool {
    DELEGATED_MEMBERS
        .iter()
        .any(|delegated| delegated.eq_ignore_ascii_case(name))
}

fn reified_args(ty: &TypeRef) -> Vec<TypeRef> {
    match ty {
        TypeRef::Named { args, .. } => args.clone(),
        _ => Vec::new(),
    }
}

fn contains_value(items: &[StubValue<'_>], item: &StubValue<'_>) -> bool {
    match item.as_value() {
        Some(value) => items.iter().any(|existing| existing.as_value() == Some(value)),
        None => false,
    }
}
