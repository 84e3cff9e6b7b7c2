//! Property introspection over registered types.
//!
//! The population engine never touches instance slots directly; it goes
//! through a [`PropertyIntrospector`], which enumerates a type's properties,
//! classifies them, and reads or writes values with declared-type checks.

use crate::schema::{PropertyDescriptor, TypeKind, TypeRegistry};
use crate::types::{ScalarKind, TypeRef};
use crate::values::{Instance, Value};
use rust_decimal::Decimal;

/// Error type for property access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    /// The type is not registered
    #[error("Type not registered: {0}")]
    UnknownType(String),

    /// The property does not exist on the type
    #[error("Type '{type_name}' has no property '{property}'")]
    UnknownProperty { type_name: String, property: String },

    /// The property has no setter
    #[error("Property '{property}' of '{type_name}' is read-only")]
    ReadOnly { type_name: String, property: String },

    /// The value does not conform to the declared type
    #[error("Property '{property}' expects {expected} but got {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },
}

/// Container classification of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Terminal value (scalars and enums)
    Scalar,
    /// Fixed-length array
    Array,
    /// Ordered list
    List,
    /// Set
    Set,
    /// Map
    Map,
    /// Nested bean
    Bean,
}

/// Enumerates, classifies, reads and writes properties of instances.
pub trait PropertyIntrospector {
    /// Properties of a type in a stable declaration order.
    fn list_properties(&self, type_name: &str) -> Result<&[PropertyDescriptor], AccessError>;

    /// Classify a property by its declared type.
    fn classify(&self, property: &PropertyDescriptor) -> PropertyKind;

    /// Declared type of a property, with the instance's generic arguments applied.
    fn resolved_type(&self, instance: &Instance, property: &PropertyDescriptor) -> TypeRef;

    /// Read a property value.
    fn get_value<'v>(&self, instance: &'v Instance, property: &str)
        -> Result<&'v Value, AccessError>;

    /// Mutable access to a property value, for in-place population.
    fn get_value_mut<'v>(
        &self,
        instance: &'v mut Instance,
        property: &str,
    ) -> Result<&'v mut Value, AccessError>;

    /// Write a property value through its setter.
    fn set_value(
        &self,
        instance: &mut Instance,
        property: &str,
        value: Value,
    ) -> Result<(), AccessError>;
}

/// Introspector backed by a [`TypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryIntrospector<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> RegistryIntrospector<'r> {
    /// Create an introspector over a registry.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    fn descriptor_property(
        &self,
        instance: &Instance,
        property: &str,
    ) -> Result<&'r PropertyDescriptor, AccessError> {
        let descriptor = self
            .registry
            .get(instance.type_name())
            .ok_or_else(|| AccessError::UnknownType(instance.type_name().to_string()))?;
        descriptor
            .get_property(property)
            .ok_or_else(|| AccessError::UnknownProperty {
                type_name: instance.type_name().to_string(),
                property: property.to_string(),
            })
    }

    /// Check `value` against `ty`, applying lossless coercions.
    ///
    /// Returns the value to store, or `None` if it does not conform.
    pub fn conform(&self, value: Value, ty: &TypeRef) -> Option<Value> {
        match (value, ty) {
            (Value::Null, ty) => ty.is_nullable().then_some(Value::Null),
            (_, TypeRef::Unit) => None,
            (value, TypeRef::Param(_)) => Some(value),
            (value, TypeRef::Primitive(kind) | TypeRef::Scalar(kind)) => coerce_scalar(value, *kind),
            (Value::Enum { type_name, constant }, TypeRef::Named { name, .. }) => {
                let descriptor = self.registry.get(name)?;
                let matches = descriptor.kind == TypeKind::Enum
                    && type_name == *name
                    && descriptor.constants.contains(&constant);
                matches.then_some(Value::Enum { type_name, constant })
            }
            // Constant names, as written in YAML profiles
            (Value::String(constant), TypeRef::Named { name, .. }) if self.registry.is_enum(name) => {
                let descriptor = self.registry.get(name)?;
                descriptor
                    .constants
                    .contains(&constant)
                    .then(|| Value::Enum {
                        type_name: name.clone(),
                        constant,
                    })
            }
            (Value::Bean(instance), TypeRef::Named { name, .. }) => {
                let assignable = instance.type_name() == name
                    || self
                        .registry
                        .supertypes_of(instance.type_name())
                        .contains(&name.as_str());
                assignable.then_some(Value::Bean(instance))
            }
            (Value::Array(items), TypeRef::Array(element)) => {
                self.conform_all(items, element).map(Value::Array)
            }
            (Value::List(items), TypeRef::List(element)) => {
                self.conform_all(items, element).map(Value::List)
            }
            (Value::Set(items), TypeRef::Set(element)) => {
                self.conform_all(items, element).map(Value::Set)
            }
            (Value::Map(entries), TypeRef::Map(key_type, value_type)) => entries
                .into_iter()
                .map(|(k, v)| Some((self.conform(k, key_type)?, self.conform(v, value_type)?)))
                .collect::<Option<Vec<_>>>()
                .map(Value::Map),
            _ => None,
        }
    }

    fn conform_all(&self, items: Vec<Value>, element: &TypeRef) -> Option<Vec<Value>> {
        items
            .into_iter()
            .map(|item| self.conform(item, element))
            .collect()
    }
}

fn coerce_scalar(value: Value, kind: ScalarKind) -> Option<Value> {
    if value.scalar_kind() == Some(kind) {
        return Some(value);
    }
    let coerced = match (kind, &value) {
        (ScalarKind::Int16, Value::Int8(i)) => Value::Int16(i16::from(*i)),
        (ScalarKind::Int16, Value::UInt8(i)) => Value::Int16(i16::from(*i)),
        (ScalarKind::Int32, v) => Value::Int32(v.as_i32()?),
        (ScalarKind::Int64, v) => Value::Int64(v.as_i64()?),
        (ScalarKind::Float64, Value::Float32(f)) => Value::Float64(f64::from(*f)),
        (ScalarKind::Decimal, Value::Float64(f)) => Value::Decimal(Decimal::try_from(*f).ok()?),
        (ScalarKind::Decimal, Value::Float32(f)) => Value::Decimal(Decimal::try_from(*f).ok()?),
        (ScalarKind::Decimal, v) => Value::Decimal(Decimal::from(v.as_i64()?)),
        _ => return None,
    };
    Some(coerced)
}

impl PropertyIntrospector for RegistryIntrospector<'_> {
    fn list_properties(&self, type_name: &str) -> Result<&[PropertyDescriptor], AccessError> {
        self.registry
            .get(type_name)
            .map(|d| d.properties.as_slice())
            .ok_or_else(|| AccessError::UnknownType(type_name.to_string()))
    }

    fn classify(&self, property: &PropertyDescriptor) -> PropertyKind {
        match &property.property_type {
            TypeRef::Array(_) => PropertyKind::Array,
            TypeRef::List(_) => PropertyKind::List,
            TypeRef::Set(_) => PropertyKind::Set,
            TypeRef::Map(_, _) => PropertyKind::Map,
            TypeRef::Named { name, .. } if !self.registry.is_enum(name) => PropertyKind::Bean,
            _ => PropertyKind::Scalar,
        }
    }

    fn resolved_type(&self, instance: &Instance, property: &PropertyDescriptor) -> TypeRef {
        match self.registry.get(instance.type_name()) {
            Some(descriptor) if descriptor.is_generic() => property
                .property_type
                .substitute(&descriptor.bindings(instance.type_args())),
            _ => property.property_type.clone(),
        }
    }

    fn get_value<'v>(
        &self,
        instance: &'v Instance,
        property: &str,
    ) -> Result<&'v Value, AccessError> {
        self.descriptor_property(instance, property)?;
        Ok(instance.get(property).unwrap_or(&Value::Null))
    }

    fn get_value_mut<'v>(
        &self,
        instance: &'v mut Instance,
        property: &str,
    ) -> Result<&'v mut Value, AccessError> {
        let descriptor = self.descriptor_property(instance, property)?;
        let type_name = instance.type_name().to_string();
        if instance.get(property).is_none() {
            instance.put(property, Value::unset(&descriptor.property_type));
        }
        instance
            .get_mut(property)
            .ok_or(AccessError::UnknownProperty {
                type_name,
                property: property.to_string(),
            })
    }

    fn set_value(
        &self,
        instance: &mut Instance,
        property: &str,
        value: Value,
    ) -> Result<(), AccessError> {
        let descriptor = self.descriptor_property(instance, property)?;
        if !descriptor.writable {
            return Err(AccessError::ReadOnly {
                type_name: instance.type_name().to_string(),
                property: property.to_string(),
            });
        }
        let declared = self.resolved_type(instance, descriptor);
        let found = value.describe();
        let value = self
            .conform(value, &declared)
            .ok_or_else(|| AccessError::TypeMismatch {
                property: property.to_string(),
                expected: declared.to_string(),
                found,
            })?;
        instance.put(property, value);
        Ok(())
    }
}
