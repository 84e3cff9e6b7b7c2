//! beanfill
//!
//! Populated object graphs for unit tests, without a hand-written factory
//! per type.
//!
//! # Features
//!
//! - Random, empty and null build modes
//! - Overrides by property name, exact or erased path, and declared type
//! - Per-path and per-property collection sizes
//! - Cycle-safe population of self-referencing type graphs
//! - Constructor-only (immutable) types
//! - Lazy stubs for interfaces and abstract types
//! - YAML schemas and build profiles
//!
//! # Crates
//!
//! - `beanfill_core` - type descriptors, registry, values, paths, introspection
//! - `beanfill_generator` - population engine, construction strategy, stubs
//!
//! # Example
//!
//! ```rust
//! use beanfill::{Fixture, TypeRegistry, Value, ValueFactory};
//!
//! let registry = TypeRegistry::from_yaml(r#"
//! types:
//!   - name: Wheel
//!     properties:
//!       - { name: diameter, type: "i32?" }
//!   - name: Car
//!     properties:
//!       - { name: wheels, type: "List<Wheel>" }
//! "#).unwrap();
//!
//! let car = Fixture::random(&registry)
//!     .seed(42)
//!     .collection_size(4)
//!     .path("car.wheels[0].diameter", ValueFactory::fixed(19))
//!     .build("Car")
//!     .unwrap();
//!
//! assert_eq!(car.lookup("wheels").and_then(Value::len), Some(4));
//! assert_eq!(car.lookup("wheels[0].diameter"), Some(&Value::Int32(19)));
//! ```

pub mod builder;
pub mod error;
pub mod testing;

pub use builder::Fixture;
pub use error::FixtureError;

// Re-exports for convenience
pub use beanfill_core::{
    Instance, PropertyPath, ScalarKind, TypeDescriptor, TypeKind, TypeRef, TypeRegistry, Value,
};
pub use beanfill_generator::{
    BuildMode, Configuration, FactorySpec, GeneratorError, Invocation, Profile, RandomScalars,
    ScalarSource, SizeRange, Stub, StubValue, ValueFactory,
};
