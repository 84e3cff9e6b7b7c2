//! Graph population engine.
//!
//! [`Populator`] walks an instance graph depth-first. For every writable
//! property it applies, in order: exclusions, explicit path/property
//! factories, the skip rules (already set, under an explicitly assigned
//! parent, type re-entry) and finally default generation by classification.
//!
//! Termination on cyclic type graphs rests on the [`TypeStack`] check: a
//! position whose declared type (or any nested generic argument) already
//! occurs twice on the stack is never entered.

use crate::config::{BuildMode, Configuration};
use crate::error::GeneratorError;
use crate::scalars::ScalarSource;
use crate::stack::TypeStack;
use crate::table::FactoryTable;
use beanfill_core::{
    Instance, PropertyIntrospector, PropertyPath, RegistryIntrospector, TypeKind, TypeRef,
    TypeRegistry, Value,
};
use rand::seq::SliceRandom;
use tracing::{debug, info, trace};

/// Populates instance graphs for one build configuration.
pub struct Populator<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) introspector: RegistryIntrospector<'a>,
    pub(crate) config: &'a Configuration,
    pub(crate) table: FactoryTable,
    pub(crate) source: &'a mut dyn ScalarSource,
    /// Lower-cased exact paths that received an explicit value
    assigned: Vec<String>,
}

impl<'a> Populator<'a> {
    /// Create a populator over a registry, a configuration and a scalar source.
    pub fn new(
        registry: &'a TypeRegistry,
        config: &'a Configuration,
        source: &'a mut dyn ScalarSource,
    ) -> Self {
        Self {
            registry,
            introspector: RegistryIntrospector::new(registry),
            config,
            table: FactoryTable::for_mode(config.mode()),
            source,
            assigned: Vec::new(),
        }
    }

    /// Lower-cased exact paths assigned from explicit factories so far.
    pub fn assigned_paths(&self) -> &[String] {
        &self.assigned
    }

    /// Build a value of the given type.
    ///
    /// Named bean types are instantiated through the construction strategy
    /// and, unless the mode is [`BuildMode::Null`], populated with the stack
    /// holding only the root type. Other types are generated directly.
    pub fn build(&mut self, ty: &TypeRef) -> Result<Value, GeneratorError> {
        let root = self.root_path(ty);
        info!(
            "Building {} (mode: {:?}, root: {})",
            ty,
            self.config.mode(),
            root
        );

        let value = match ty {
            TypeRef::Named { name, .. } if !self.registry.is_enum(name) => {
                if !self.registry.contains(name) {
                    return Err(GeneratorError::UnknownType(name.clone()));
                }
                let concrete = self.substitute_subtype(ty);
                let stack = TypeStack::root(&concrete);
                let instance = self.create_instance(&concrete, &root, &stack)?;
                let mut value = Value::Bean(instance);
                if self.config.mode() != BuildMode::Null {
                    self.populate(&mut value, &root, &stack)?;
                }
                value
            }
            _ if self.config.mode() == BuildMode::Null => {
                Value::empty_container(ty).unwrap_or_else(|| Value::unset(ty))
            }
            _ => self.generate(ty, &root, &TypeStack::new())?,
        };

        info!("Finished building {} ({} explicit assignments)", ty, self.assigned.len());
        Ok(value)
    }

    /// Build a registered type by name.
    pub fn build_type(&mut self, name: &str) -> Result<Value, GeneratorError> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| GeneratorError::UnknownType(name.to_string()))?;
        if descriptor.is_generic() {
            return Err(GeneratorError::UnresolvedGenericType(name.to_string()));
        }
        self.build(&TypeRef::named(name))
    }

    fn root_path(&self, ty: &TypeRef) -> PropertyPath {
        match (self.config.root_name(), ty.type_name()) {
            (Some(name), _) => PropertyPath::root(name),
            (None, Some(type_name)) => PropertyPath::for_type(type_name),
            (None, None) => PropertyPath::root("root"),
        }
    }

    /// Populate a value in place. Null and scalars are left untouched;
    /// containers are populated element by element.
    pub fn populate(
        &mut self,
        value: &mut Value,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<(), GeneratorError> {
        match value {
            Value::Bean(instance) => self.populate_instance(instance, path, stack),
            Value::Array(items) | Value::List(items) | Value::Set(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.populate_nested(item, &path.index(i), stack)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (i, (key, item)) in entries.iter_mut().enumerate() {
                    let element_path = path.index(i);
                    self.populate_nested(key, &element_path, stack)?;
                    self.populate_nested(item, &element_path, stack)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Populate a freshly assigned or contained value, extending the stack
    /// by its runtime type.
    fn populate_nested(
        &mut self,
        value: &mut Value,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<(), GeneratorError> {
        match value.runtime_type() {
            Some(runtime) => self.populate(value, path, &stack.push(&runtime)),
            None => Ok(()),
        }
    }

    fn populate_instance(
        &mut self,
        instance: &mut Instance,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<(), GeneratorError> {
        let introspector = self.introspector;
        let config = self.config;
        let properties = introspector
            .list_properties(instance.type_name())
            .map_err(|_| GeneratorError::UnknownType(instance.type_name().to_string()))?;

        for property in properties.iter().filter(|p| p.writable) {
            let name = property.name.as_str();
            let property_path = path.child(name);
            let assignment_error = |source| GeneratorError::PropertyAssignment {
                path: property_path.exact(),
                source,
            };

            if config.is_excluded(&property_path) {
                trace!("Skipping {}: excluded", property_path);
                continue;
            }

            if let Some(factory) = config.explicit_factory(&property_path) {
                let value = factory.produce(self.source.rng());
                debug!("Assigning explicit value to {}", property_path);
                introspector
                    .set_value(instance, name, value)
                    .map_err(assignment_error)?;
                self.assigned.push(property_path.exact_key());
                let slot = introspector
                    .get_value_mut(instance, name)
                    .map_err(assignment_error)?;
                self.populate_nested(slot, &property_path, stack)?;
                continue;
            }

            let declared = introspector.resolved_type(instance, property);
            let current = introspector
                .get_value(instance, name)
                .map_err(assignment_error)?;
            if current.is_set_for(&declared) {
                trace!("Skipping {}: already set", property_path);
                continue;
            }
            if self.assigned.iter().any(|a| property_path.is_child_of(a)) {
                trace!("Skipping {}: under an explicitly assigned path", property_path);
                continue;
            }
            if stack.would_overflow(&declared) {
                trace!("Skipping {}: {} re-entered", property_path, declared);
                continue;
            }

            let value = self.generate(&declared, &property_path, stack)?;
            if value.is_null() {
                continue;
            }
            introspector
                .set_value(instance, name, value)
                .map_err(assignment_error)?;
        }
        Ok(())
    }

    /// Generate a value for a position of the declared type.
    ///
    /// Resolution order: type-keyed override, the mode's scalar table, enum
    /// pick, containers, then bean construction. Generated beans are
    /// populated before they are returned.
    pub fn generate(
        &mut self,
        declared: &TypeRef,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<Value, GeneratorError> {
        let config = self.config;
        if let Some(factory) = config.type_factory(self.registry, declared) {
            let mut value = factory.produce(self.source.rng());
            self.populate_nested(&mut value, path, stack)?;
            return Ok(value);
        }

        match declared {
            TypeRef::Primitive(_) | TypeRef::Scalar(_) => Ok(self
                .table
                .produce(declared, &mut *self.source)
                .unwrap_or(Value::Null)),
            TypeRef::Array(_) | TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) => {
                self.generate_container(declared, path, stack)
            }
            TypeRef::Named { name, .. } if self.registry.is_enum(name) => self.pick_constant(name),
            TypeRef::Named { .. } => self.generate_bean(declared, path, stack),
            TypeRef::Param(_) | TypeRef::Unit => Ok(Value::Null),
        }
    }

    fn pick_constant(&mut self, enum_name: &str) -> Result<Value, GeneratorError> {
        if self.config.mode() != BuildMode::Random {
            return Ok(Value::Null);
        }
        let registry = self.registry;
        let descriptor = registry
            .get(enum_name)
            .ok_or_else(|| GeneratorError::UnknownType(enum_name.to_string()))?;
        let constant = descriptor
            .constants
            .choose(self.source.rng())
            .ok_or_else(|| GeneratorError::EmptyEnumeration(enum_name.to_string()))?;
        Ok(Value::Enum {
            type_name: enum_name.to_string(),
            constant: constant.clone(),
        })
    }

    fn generate_bean(
        &mut self,
        declared: &TypeRef,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<Value, GeneratorError> {
        let concrete = self.substitute_subtype(declared);
        if stack.would_overflow(&concrete) {
            trace!("Not entering {} at {}: re-entered", concrete, path);
            return Ok(Value::Null);
        }
        let nested = stack.push(&concrete);
        let instance = self.create_instance(&concrete, path, &nested)?;
        let mut value = Value::Bean(instance);
        self.populate(&mut value, path, &nested)?;
        Ok(value)
    }

    /// Replace a declared type with one of its bound subtypes, picked uniformly.
    pub(crate) fn substitute_subtype(&mut self, declared: &TypeRef) -> TypeRef {
        let Some(name) = declared.type_name() else {
            return declared.clone();
        };
        let config = self.config;
        match config.subtypes_of(name).choose(self.source.rng()) {
            Some(candidate) => {
                trace!("Substituting {} with {}", declared, candidate);
                candidate.clone()
            }
            None => declared.clone(),
        }
    }

    fn generate_container(
        &mut self,
        declared: &TypeRef,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<Value, GeneratorError> {
        let size = self.config.sizes().resolve(path).draw(self.source.rng());
        let mut container = Value::empty_container(declared).unwrap_or(Value::Null);

        match declared {
            TypeRef::Array(element) => {
                for i in 0..size {
                    let item = self.generate_element(element, &path.index(i), stack)?;
                    // Arrays keep null elements
                    container.push_element(item);
                }
            }
            TypeRef::List(element) | TypeRef::Set(element) => {
                for i in 0..size {
                    let item = self.generate_element(element, &path.index(i), stack)?;
                    if !item.is_null() {
                        container.push_element(item);
                    }
                }
            }
            TypeRef::Map(key_type, value_type) => {
                for i in 0..size {
                    let entry_path = path.index(i);
                    let key = self.generate_element(key_type, &entry_path, stack)?;
                    let item = self.generate_element(value_type, &entry_path, stack)?;
                    if key.is_null() {
                        trace!("Dropping map entry at {}: null key", entry_path);
                        continue;
                    }
                    container.insert_entry(key, item);
                }
            }
            _ => {}
        }
        Ok(container)
    }

    /// One container element: an exact indexed path override wins, then
    /// default resolution.
    fn generate_element(
        &mut self,
        element: &TypeRef,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<Value, GeneratorError> {
        let config = self.config;
        if let Some(factory) = config.exact_path_factory(path) {
            let mut value = factory.produce(self.source.rng());
            debug!("Assigning explicit value to {}", path);
            self.assigned.push(path.exact_key());
            self.populate_nested(&mut value, path, stack)?;
            return Ok(value);
        }
        if stack.would_overflow(element) {
            trace!("Skipping {}: {} re-entered", path, element);
            return Ok(Value::Null);
        }
        self.generate(element, path, stack)
    }

    /// Whether a name refers to an abstract type or interface.
    pub(crate) fn is_abstract(&self, name: &str) -> bool {
        self.registry
            .get(name)
            .is_some_and(|d| matches!(d.kind, TypeKind::Abstract | TypeKind::Interface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ValueFactory;
    use crate::scalars::RandomScalars;
    use beanfill_core::{ScalarKind, TypeDescriptor};
    use rust_decimal::Decimal;

    fn car_registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(TypeDescriptor::bean("Engine").property("capacity", "decimal").unwrap())
            .unwrap()
            .with(TypeDescriptor::bean("Wheel").property("diameter", "i32?").unwrap())
            .unwrap()
            .with(
                TypeDescriptor::bean("Car")
                    .property("engine", "Engine")
                    .unwrap()
                    .property("wheels", "List<Wheel>")
                    .unwrap(),
            )
            .unwrap()
    }

    fn build(registry: &TypeRegistry, config: &Configuration, name: &str) -> Value {
        let mut source = RandomScalars::seeded(42);
        Populator::new(registry, config, &mut source)
            .build_type(name)
            .unwrap()
    }

    #[test]
    fn test_random_car() {
        let registry = car_registry();
        let mut config = Configuration::new(BuildMode::Random);
        config.set_collection_size(1, 1).unwrap();

        let car = build(&registry, &config, "Car");
        assert!(matches!(car.lookup("engine.capacity"), Some(Value::Decimal(_))));
        assert_eq!(car.lookup("wheels").and_then(Value::len), Some(1));
        assert!(matches!(car.lookup("wheels[0].diameter"), Some(Value::Int32(_))));
    }

    #[test]
    fn test_path_override_and_children() {
        let registry = car_registry();
        let mut config = Configuration::new(BuildMode::Random);
        config.set_path("CAR.ENGINE.CAPACITY", ValueFactory::fixed(4.0));

        let car = build(&registry, &config, "Car");
        assert_eq!(
            car.lookup("engine.capacity"),
            Some(&Value::Decimal(Decimal::new(4, 0)))
        );
    }

    #[test]
    fn test_explicit_parent_blocks_default_children() {
        let registry = car_registry();
        let mut config = Configuration::new(BuildMode::Random);
        config.set_path("car.engine", Value::Bean(Instance::new("Engine")));

        let mut source = RandomScalars::seeded(1);
        let mut populator = Populator::new(&registry, &config, &mut source);
        let car = populator.build_type("Car").unwrap();

        assert_eq!(populator.assigned_paths(), &["car.engine".to_string()]);
        // The explicit Engine has no capacity slot and none was generated
        assert_eq!(car.lookup("engine.capacity"), None);
    }

    #[test]
    fn test_self_reference_cut_at_second_occurrence() {
        let registry = TypeRegistry::new()
            .with(
                TypeDescriptor::bean("Node")
                    .property("label", "string")
                    .unwrap()
                    .property("next", "Node")
                    .unwrap(),
            )
            .unwrap();
        let config = Configuration::new(BuildMode::Random);

        let node = build(&registry, &config, "Node");
        assert!(matches!(node.lookup("next.label"), Some(Value::String(_))));
        assert_eq!(node.lookup("next.next"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_mode_scalars() {
        let registry = TypeRegistry::new()
            .with(
                TypeDescriptor::bean("Flags")
                    .property("count", "i32")
                    .unwrap()
                    .property("maybe", "i32?")
                    .unwrap()
                    .property("name", "string")
                    .unwrap(),
            )
            .unwrap();
        let config = Configuration::new(BuildMode::Empty);

        let flags = build(&registry, &config, "Flags");
        assert_eq!(flags.lookup("count"), Some(&Value::Int32(0)));
        assert_eq!(flags.lookup("maybe"), Some(&Value::Null));
        assert_eq!(flags.lookup("name"), Some(&Value::Null));
    }

    #[test]
    fn test_null_mode_leaves_root_unpopulated() {
        let registry = car_registry();
        let config = Configuration::new(BuildMode::Null);

        let car = build(&registry, &config, "Car");
        assert_eq!(car.lookup("engine"), Some(&Value::Null));
        assert_eq!(car.lookup("wheels"), Some(&Value::Null));
    }

    #[test]
    fn test_type_override_applies_by_assignability() {
        let registry = car_registry();
        let mut config = Configuration::new(BuildMode::Random);
        config
            .set_collection_size(2, 2)
            .unwrap()
            .set_type(TypeRef::Scalar(ScalarKind::Int32), ValueFactory::fixed(21));

        let car = build(&registry, &config, "Car");
        assert_eq!(car.lookup("wheels[0].diameter"), Some(&Value::Int32(21)));
        assert_eq!(car.lookup("wheels[1].diameter"), Some(&Value::Int32(21)));
    }

    #[test]
    fn test_map_keeps_null_values() {
        let registry = TypeRegistry::new()
            .with(TypeDescriptor::bean("Key").property("id", "i32").unwrap())
            .unwrap()
            .with(TypeDescriptor::bean("Holder").property("m", "Map<Key, i32?>").unwrap())
            .unwrap();
        let mut config = Configuration::new(BuildMode::Empty);
        config.set_collection_size(2, 2).unwrap();

        let holder = build(&registry, &config, "Holder");
        let entries = holder.lookup("m").and_then(Value::as_entries).unwrap();
        // Both keys are Key { id: 0 }, so the second replaces the first
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.lookup("id"), Some(&Value::Int32(0)));
        assert_eq!(entries[0].1, Value::Null);
    }

    #[test]
    fn test_enum_without_constants_fails() {
        let registry = TypeRegistry::new()
            .with(TypeDescriptor::enumeration("Shade", Vec::<String>::new()))
            .unwrap()
            .with(TypeDescriptor::bean("Palette").property("shade", "Shade").unwrap())
            .unwrap();
        let config = Configuration::new(BuildMode::Random);

        let mut source = RandomScalars::seeded(1);
        let result = Populator::new(&registry, &config, &mut source).build_type("Palette");
        assert!(matches!(result, Err(GeneratorError::EmptyEnumeration(name)) if name == "Shade"));
    }

    #[test]
    fn test_setter_mismatch_propagates() {
        let registry = car_registry();
        let mut config = Configuration::new(BuildMode::Random);
        config.set_property("diameter", ValueFactory::fixed("huge"));

        let mut source = RandomScalars::seeded(1);
        let result = Populator::new(&registry, &config, &mut source).build_type("Car");
        assert!(matches!(result, Err(GeneratorError::PropertyAssignment { .. })));
    }
}
