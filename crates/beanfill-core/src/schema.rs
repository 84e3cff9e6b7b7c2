//! Type descriptors and the type registry.
//!
//! A [`TypeRegistry`] is the introspection source for every build: it maps a
//! type name to its [`TypeDescriptor`] (properties, constructors, supertypes,
//! generic parameters). Registries are assembled in code or loaded from a
//! YAML schema document.
//!
//! ```yaml
//! version: 1
//! types:
//!   - name: Engine
//!     properties:
//!       - { name: capacity, type: decimal }
//!   - name: Car
//!     properties:
//!       - { name: engine, type: Engine }
//!       - { name: wheels, type: "List<Wheel>" }
//!   - name: Wheel
//!     properties:
//!       - { name: diameter, type: "i32?" }
//! ```

use crate::types::{TypeParseError, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Error parsing a type expression
    #[error(transparent)]
    TypeParse(#[from] TypeParseError),

    /// A type with the same name is already registered
    #[error("Type already registered: {0}")]
    DuplicateType(String),

    /// A referenced type is not registered
    #[error("Type '{referenced}' referenced by '{owner}' is not registered")]
    UnknownType { owner: String, referenced: String },

    /// Wrong number of generic arguments
    #[error("Type '{name}' expects {expected} type argument(s) but '{owner}' supplies {found}")]
    GenericArity {
        owner: String,
        name: String,
        expected: usize,
        found: usize,
    },

    /// Constructor parameter without a matching property
    #[error("Constructor parameter '{parameter}' of '{type_name}' does not name a property")]
    UnboundParameter {
        type_name: String,
        parameter: String,
    },

    /// Enum declared without an enum kind, or constants on a non-enum
    #[error("Type '{0}' declares enum constants but is not an enum")]
    ConstantsOnNonEnum(String),
}

// ============================================================================
// Descriptors
// ============================================================================

/// What sort of type a descriptor describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Concrete bean with properties
    #[default]
    Bean,
    /// Abstract type: cannot be instantiated, may be stubbed
    Abstract,
    /// Interface: cannot be instantiated, may be stubbed
    Interface,
    /// Enumeration of named constants
    Enum,
}

/// A property of a registered type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub property_type: TypeRef,

    /// Whether the property has a setter; read-only properties are only
    /// assigned through constructor parameters
    #[serde(default = "default_writable")]
    pub writable: bool,
}

fn default_writable() -> bool {
    true
}

impl PropertyDescriptor {
    /// Create a writable property.
    pub fn new(name: impl Into<String>, property_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            property_type,
            writable: true,
        }
    }

    /// Create a read-only property.
    pub fn read_only(name: impl Into<String>, property_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            property_type,
            writable: false,
        }
    }
}

/// A constructor, described by the properties its parameters bind, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructorDescriptor {
    /// Parameter names; each names a property of the owning type
    pub params: Vec<String>,
}

impl ConstructorDescriptor {
    /// The zero-argument constructor.
    pub fn no_arg() -> Self {
        Self::default()
    }

    /// A constructor binding the given properties.
    pub fn binding<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of formal parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A non-property member that can be intercepted on a stub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,

    /// Declared return type (`()` for none)
    #[serde(default = "default_unit")]
    pub returns: TypeRef,
}

fn default_unit() -> TypeRef {
    TypeRef::Unit
}

/// Description of a registered type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name
    pub name: String,

    /// Kind of type
    #[serde(default)]
    pub kind: TypeKind,

    /// Whether the type cannot be subclassed (and therefore not stubbed)
    #[serde(default, rename = "final")]
    pub is_final: bool,

    /// Declared generic type parameters
    #[serde(default)]
    pub type_params: Vec<String>,

    /// Direct supertypes (for assignability of type-keyed overrides)
    #[serde(default)]
    pub supertypes: Vec<String>,

    /// Enum constants (enums only)
    #[serde(default)]
    pub constants: Vec<String>,

    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,

    /// Declared constructors; `None` means the implicit no-argument constructor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructors: Option<Vec<ConstructorDescriptor>>,

    /// Additional members visible to stubs
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_final: false,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            constants: Vec::new(),
            properties: Vec::new(),
            constructors: None,
            methods: Vec::new(),
        }
    }

    /// Describe a concrete bean.
    pub fn bean(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Bean)
    }

    /// Describe an abstract type.
    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Abstract)
    }

    /// Describe an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    /// Describe an enum with its constants.
    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut descriptor = Self::with_kind(name, TypeKind::Enum);
        descriptor.constants = constants.into_iter().map(Into::into).collect();
        descriptor
    }

    /// Add a writable property from a type expression.
    pub fn property(self, name: impl Into<String>, type_expr: &str) -> Result<Self, SchemaError> {
        let ty = TypeRef::parse(type_expr)?;
        Ok(self.property_typed(PropertyDescriptor::new(name, ty)))
    }

    /// Add a read-only (constructor-only) property from a type expression.
    pub fn read_only_property(
        self,
        name: impl Into<String>,
        type_expr: &str,
    ) -> Result<Self, SchemaError> {
        let ty = TypeRef::parse(type_expr)?;
        Ok(self.property_typed(PropertyDescriptor::read_only(name, ty)))
    }

    /// Add a property descriptor.
    pub fn property_typed(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a method visible to stubs.
    pub fn method(mut self, name: impl Into<String>, returns: &str) -> Result<Self, SchemaError> {
        self.methods.push(MethodDescriptor {
            name: name.into(),
            returns: TypeRef::parse(returns)?,
        });
        Ok(self)
    }

    /// Declare a constructor. The first declaration replaces the implicit
    /// no-argument constructor.
    pub fn constructor<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constructors
            .get_or_insert_with(Vec::new)
            .push(ConstructorDescriptor::binding(params));
        self
    }

    /// Declare that the type has no accessible constructor at all.
    pub fn without_constructors(mut self) -> Self {
        self.constructors = Some(Vec::new());
        self
    }

    /// Declare generic type parameters.
    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Declare a direct supertype.
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Mark the type as final.
    pub fn final_type(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Whether the type can be instantiated directly.
    pub fn is_instantiable(&self) -> bool {
        self.kind == TypeKind::Bean
    }

    /// Whether the type has unbound generic parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Declared constructors, after registry normalization.
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        self.constructors.as_deref().unwrap_or(&[])
    }

    /// Get a property by exact name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Get a property by name, ignoring case.
    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.get_property(name)
            .or_else(|| self.properties.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
    }

    /// Get all property names.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// Map type parameters to the given reified arguments.
    pub fn bindings(&self, args: &[TypeRef]) -> HashMap<String, TypeRef> {
        self.type_params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect()
    }

    /// Rebind type parameters, apply the implicit constructor, and check
    /// constructor parameters.
    fn normalize(&mut self) -> Result<(), SchemaError> {
        if self.kind != TypeKind::Enum && !self.constants.is_empty() {
            return Err(SchemaError::ConstantsOnNonEnum(self.name.clone()));
        }

        let params = self.type_params.clone();
        for property in &mut self.properties {
            property.property_type = property.property_type.bind_params(&params);
        }
        for method in &mut self.methods {
            method.returns = method.returns.bind_params(&params);
        }

        if self.constructors.is_none() {
            self.constructors = Some(if self.kind == TypeKind::Bean {
                vec![ConstructorDescriptor::no_arg()]
            } else {
                Vec::new()
            });
        }

        for constructor in self.constructors() {
            for param in &constructor.params {
                if self.get_property(param).is_none() {
                    return Err(SchemaError::UnboundParameter {
                        type_name: self.name.clone(),
                        parameter: param.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Registry
// ============================================================================

fn default_version() -> u32 {
    1
}

/// YAML schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Type definitions
    pub types: Vec<TypeDescriptor>,
}

/// Registry of type descriptors, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    type_map: HashMap<String, usize>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from a YAML schema document and validate references.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_yaml::from_str(yaml)?;
        let mut registry = Self::new();
        for descriptor in document.types {
            registry.register(descriptor)?;
        }
        registry.validate()?;
        debug!(
            "Loaded schema version {} with {} types",
            document.version,
            registry.types.len()
        );
        Ok(registry)
    }

    /// Load a registry from a YAML schema file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Register a type descriptor.
    pub fn register(&mut self, mut descriptor: TypeDescriptor) -> Result<(), SchemaError> {
        if self.type_map.contains_key(&descriptor.name) {
            return Err(SchemaError::DuplicateType(descriptor.name));
        }
        descriptor.normalize()?;
        let idx = self.types.len();
        self.type_map.insert(descriptor.name.clone(), idx);
        self.types.push(descriptor);
        Ok(())
    }

    /// Register a type descriptor (builder style).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Result<Self, SchemaError> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Check that every named reference resolves with the right generic arity.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for descriptor in &self.types {
            let declared = descriptor
                .properties
                .iter()
                .map(|p| &p.property_type)
                .chain(descriptor.methods.iter().map(|m| &m.returns));
            for ty in declared {
                for nested in ty.walk() {
                    if let TypeRef::Named { name, args } = nested {
                        let target = self.get(name).ok_or_else(|| SchemaError::UnknownType {
                            owner: descriptor.name.clone(),
                            referenced: name.clone(),
                        })?;
                        // Raw references to generic types are allowed
                        if !args.is_empty() && args.len() != target.type_params.len() {
                            return Err(SchemaError::GenericArity {
                                owner: descriptor.name.clone(),
                                name: name.clone(),
                                expected: target.type_params.len(),
                                found: args.len(),
                            });
                        }
                    }
                }
            }
            for supertype in &descriptor.supertypes {
                if !self.contains(supertype) {
                    return Err(SchemaError::UnknownType {
                        owner: descriptor.name.clone(),
                        referenced: supertype.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a type descriptor by name.
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_map.get(name).and_then(|&idx| self.types.get(idx))
    }

    /// Whether a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// All registered type names, in registration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Whether `name` refers to a registered enum.
    pub fn is_enum(&self, name: &str) -> bool {
        self.get(name).is_some_and(|t| t.kind == TypeKind::Enum)
    }

    /// Transitive supertypes of a type, nearest first.
    pub fn supertypes_of(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![name];
        while let Some(current) = pending.pop() {
            if let Some(descriptor) = self.get(current) {
                for supertype in &descriptor.supertypes {
                    if seen.insert(supertype.as_str()) {
                        out.push(supertype.as_str());
                        pending.push(supertype.as_str());
                    }
                }
            }
        }
        out
    }

    /// Whether a value declared as `declared` can be supplied by something
    /// registered for `target`.
    ///
    /// Scalars match on kind regardless of nullability, named types match
    /// themselves and their transitive supertypes, and a target without
    /// generic arguments matches every instantiation of the same name.
    pub fn is_assignable(&self, target: &TypeRef, declared: &TypeRef) -> bool {
        if target == declared {
            return true;
        }
        match (target, declared) {
            (t, d) if t.scalar_kind().is_some() => t.scalar_kind() == d.scalar_kind(),
            (
                TypeRef::Named { name: t_name, args: t_args },
                TypeRef::Named { name: d_name, args: d_args },
            ) => {
                let args_match = t_args.is_empty() || t_args == d_args;
                if t_name == d_name {
                    return args_match;
                }
                t_args.is_empty() && self.supertypes_of(d_name).contains(&t_name.as_str())
            }
            (TypeRef::List(t), TypeRef::List(d))
            | (TypeRef::Set(t), TypeRef::Set(d))
            | (TypeRef::Array(t), TypeRef::Array(d)) => self.is_assignable(t, d),
            (TypeRef::Map(tk, tv), TypeRef::Map(dk, dv)) => {
                self.is_assignable(tk, dk) && self.is_assignable(tv, dv)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;
    use std::io::Write;

    const CAR_SCHEMA: &str = r#"
version: 1
types:
  - name: Engine
    properties:
      - name: capacity
        type: decimal
  - name: Car
    properties:
      - name: engine
        type: Engine
      - name: wheels
        type: "List<Wheel>"
  - name: Wheel
    properties:
      - name: diameter
        type: "i32?"
"#;

    #[test]
    fn test_load_yaml() {
        let registry = TypeRegistry::from_yaml(CAR_SCHEMA).unwrap();

        assert_eq!(registry.type_names(), vec!["Engine", "Car", "Wheel"]);
        let car = registry.get("Car").unwrap();
        assert_eq!(car.property_names(), vec!["engine", "wheels"]);
        assert_eq!(
            car.get_property("wheels").unwrap().property_type,
            TypeRef::list(TypeRef::named("Wheel"))
        );
        // Implicit no-arg constructor
        assert_eq!(car.constructors(), &[ConstructorDescriptor::no_arg()]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CAR_SCHEMA.as_bytes()).unwrap();

        let registry = TypeRegistry::from_file(file.path()).unwrap();
        assert!(registry.contains("Wheel"));
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let yaml = r#"
types:
  - name: Car
    properties:
      - { name: engine, type: Engine }
"#;
        let result = TypeRegistry::from_yaml(yaml);
        assert!(matches!(result, Err(SchemaError::UnknownType { .. })));
    }

    #[test]
    fn test_duplicate_type() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::bean("Car")).unwrap();
        let result = registry.register(TypeDescriptor::bean("Car"));
        assert!(matches!(result, Err(SchemaError::DuplicateType(_))));
    }

    #[test]
    fn test_unbound_constructor_parameter() {
        let descriptor = TypeDescriptor::bean("Point")
            .read_only_property("x", "i32")
            .unwrap()
            .constructor(["x", "y"]);
        let result = TypeRegistry::new().with(descriptor);
        assert!(matches!(result, Err(SchemaError::UnboundParameter { .. })));
    }

    #[test]
    fn test_type_params_are_bound() {
        let registry = TypeRegistry::new()
            .with(
                TypeDescriptor::bean("Box")
                    .type_params(["T"])
                    .property("content", "T")
                    .unwrap(),
            )
            .unwrap();
        let content = registry.get("Box").unwrap().get_property("content").unwrap();
        assert_eq!(content.property_type, TypeRef::Param("T".to_string()));
    }

    #[test]
    fn test_explicit_constructors_replace_implicit() {
        let registry = TypeRegistry::new()
            .with(
                TypeDescriptor::bean("Point")
                    .read_only_property("x", "i32")
                    .unwrap()
                    .constructor(["x"]),
            )
            .unwrap()
            .with(TypeDescriptor::bean("Sealed").without_constructors())
            .unwrap();
        assert_eq!(registry.get("Point").unwrap().constructors().len(), 1);
        assert_eq!(registry.get("Point").unwrap().constructors()[0].arity(), 1);
        assert!(registry.get("Sealed").unwrap().constructors().is_empty());
    }

    #[test]
    fn test_assignability() {
        let registry = TypeRegistry::new()
            .with(TypeDescriptor::interface("Vehicle"))
            .unwrap()
            .with(TypeDescriptor::abstract_type("Motor").extends("Vehicle"))
            .unwrap()
            .with(TypeDescriptor::bean("Car").extends("Motor"))
            .unwrap();

        let vehicle = TypeRef::named("Vehicle");
        let car = TypeRef::named("Car");
        assert!(registry.is_assignable(&vehicle, &car));
        assert!(!registry.is_assignable(&car, &vehicle));
        assert!(registry.is_assignable(
            &TypeRef::Scalar(ScalarKind::Int32),
            &TypeRef::Primitive(ScalarKind::Int32)
        ));
        assert!(!registry.is_assignable(
            &TypeRef::Scalar(ScalarKind::Int32),
            &TypeRef::Scalar(ScalarKind::Int64)
        ));
        assert!(registry.is_assignable(
            &TypeRef::named("Box"),
            &TypeRef::generic("Box", vec![TypeRef::named("Car")])
        ));
    }

    #[test]
    fn test_enum_descriptor() {
        let registry = TypeRegistry::from_yaml(
            r#"
types:
  - name: Color
    kind: enum
    constants: [RED, GREEN]
"#,
        )
        .unwrap();
        assert!(registry.is_enum("Color"));
        assert!(registry.get("Color").unwrap().constructors().is_empty());
    }
}
