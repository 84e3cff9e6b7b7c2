//! Instance construction strategy.
//!
//! The constructor with the fewest parameters is chosen; among equals the
//! first declared wins. Parameters bind the same-named properties: container
//! parameters receive empty containers and every other parameter a value
//! from default resolution, guarded by the type stack.

use crate::config::BuildMode;
use crate::engine::Populator;
use crate::error::{ConstructError, GeneratorError};
use crate::stack::TypeStack;
use beanfill_core::{AccessError, Instance, PropertyIntrospector, PropertyPath, TypeRef, Value};
use tracing::trace;

impl Populator<'_> {
    /// Create an instance of a concrete bean type.
    ///
    /// `stack` is the stack at the new instance, already holding its type.
    /// Every property slot starts unset; constructor parameters are then
    /// written directly, bypassing setters, so read-only properties receive
    /// their values here.
    pub fn create_instance(
        &mut self,
        ty: &TypeRef,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<Instance, ConstructError> {
        let TypeRef::Named { name, args } = ty else {
            return Err(ConstructError::failed(
                ty.to_string(),
                GeneratorError::NotInstantiable(ty.to_string()),
            ));
        };
        let registry = self.registry;
        let descriptor = registry.get(name).ok_or_else(|| {
            ConstructError::failed(name.clone(), GeneratorError::UnknownType(name.clone()))
        })?;
        if self.is_abstract(name) {
            return Err(ConstructError::failed(
                name.clone(),
                GeneratorError::NotInstantiable(name.clone()),
            ));
        }
        if !descriptor.is_instantiable() {
            return Err(ConstructError::failed(
                name.clone(),
                GeneratorError::NotInstantiable(name.clone()),
            ));
        }

        let constructor = descriptor
            .constructors()
            .iter()
            .min_by_key(|c| c.arity())
            .ok_or_else(|| ConstructError::NoDefaultConstructor {
                type_name: name.clone(),
            })?;

        let introspector = self.introspector;
        let mut instance = Instance::new(name.clone()).with_type_args(args.clone());
        for property in &descriptor.properties {
            let declared = introspector.resolved_type(&instance, property);
            instance.put(property.name.clone(), Value::unset(&declared));
        }

        for param in &constructor.params {
            let property = descriptor.get_property(param).ok_or_else(|| {
                ConstructError::failed(
                    name.clone(),
                    GeneratorError::UnknownMember {
                        type_name: name.clone(),
                        member: param.clone(),
                    },
                )
            })?;
            let declared = introspector.resolved_type(&instance, property);
            let param_path = path.child(param);

            let argument = match self.constructor_argument(&declared, &param_path, stack) {
                Ok(argument) => argument,
                Err(GeneratorError::NoDefaultConstructor(type_name)) => {
                    return Err(ConstructError::NoDefaultConstructor { type_name });
                }
                Err(err) => return Err(ConstructError::failed(name.clone(), err)),
            };

            let found = argument.describe();
            let argument = introspector.conform(argument, &declared).ok_or_else(|| {
                ConstructError::failed(
                    name.clone(),
                    GeneratorError::PropertyAssignment {
                        path: param_path.exact(),
                        source: AccessError::TypeMismatch {
                            property: param.clone(),
                            expected: declared.to_string(),
                            found,
                        },
                    },
                )
            })?;
            instance.put(param.clone(), argument);
        }

        trace!("Constructed {} with {} argument(s)", ty, constructor.arity());
        Ok(instance)
    }

    fn constructor_argument(
        &mut self,
        declared: &TypeRef,
        path: &PropertyPath,
        stack: &TypeStack,
    ) -> Result<Value, GeneratorError> {
        if let Some(empty) = Value::empty_container(declared) {
            return Ok(empty);
        }
        if self.config.mode() == BuildMode::Null || stack.would_overflow(declared) {
            return Ok(Value::unset(declared));
        }
        let argument = self.generate(declared, path, stack)?;
        if argument.is_null() {
            return Ok(Value::unset(declared));
        }
        Ok(argument)
    }
}
