//! Core types for the beanfill framework.
//!
//! This crate provides the type model that object-graph population runs on:
//!
//! - [`TypeRef`] - Type of a position in an object graph
//! - [`Value`] / [`Instance`] - Dynamic values produced by population
//! - [`TypeRegistry`] - Type descriptors, assembled in code or loaded from YAML
//! - [`PropertyIntrospector`] - Property enumeration and checked access
//! - [`PropertyPath`] - Exact and index-erased property paths
//!
//! # Architecture
//!
//! ```text
//! beanfill-core (this crate)
//!    │
//!    └─── beanfill-generator  (population engine, construction, stubs)
//!            │
//!            └─── beanfill    (fixture builder facade)
//! ```
//!
//! # Example
//!
//! ```rust
//! use beanfill_core::{Instance, PropertyIntrospector, RegistryIntrospector, TypeDescriptor, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new()
//!     .with(TypeDescriptor::bean("Wheel").property("diameter", "i32?").unwrap())
//!     .unwrap();
//!
//! let introspector = RegistryIntrospector::new(&registry);
//! let mut wheel = Instance::new("Wheel");
//! introspector.set_value(&mut wheel, "diameter", Value::Int32(17)).unwrap();
//! assert_eq!(wheel.get("diameter"), Some(&Value::Int32(17)));
//! ```

pub mod introspect;
pub mod path;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use introspect::{AccessError, PropertyIntrospector, PropertyKind, RegistryIntrospector};
pub use path::{normalize_key, PropertyPath};
pub use schema::{
    ConstructorDescriptor, MethodDescriptor, PropertyDescriptor, SchemaDocument, SchemaError,
    TypeDescriptor, TypeKind, TypeRegistry,
};
pub use types::{ScalarKind, TypeParseError, TypeRef};
pub use values::{Instance, Value};
