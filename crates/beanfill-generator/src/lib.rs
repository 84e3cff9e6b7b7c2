//! Object-graph population engine for the beanfill framework.
//!
//! This crate provides the [`Populator`], which builds and fills instance
//! graphs for types registered in a [`beanfill_core::TypeRegistry`], and the
//! [`Stubber`], which produces stubs whose members are generated lazily.
//!
//! # Architecture
//!
//! ```text
//! Configuration (code or YAML Profile)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │      Populator       │
//! │                      │
//! │  - FactoryTable      │  per-mode scalar defaults
//! │  - ScalarSource      │  seeded StdRng
//! │  - TypeStack         │  re-entry guard
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    Value::Bean(Instance { slots })
//! ```
//!
//! # Example
//!
//! ```rust
//! use beanfill_core::{TypeDescriptor, TypeRegistry, Value};
//! use beanfill_generator::{BuildMode, Configuration, Populator, RandomScalars, ValueFactory};
//!
//! let registry = TypeRegistry::new()
//!     .with(TypeDescriptor::bean("Wheel").property("diameter", "i32?").unwrap())
//!     .unwrap();
//!
//! let mut config = Configuration::new(BuildMode::Random);
//! config.set_property("diameter", ValueFactory::fixed(17));
//!
//! let mut source = RandomScalars::seeded(42);
//! let wheel = Populator::new(&registry, &config, &mut source)
//!     .build_type("Wheel")
//!     .unwrap();
//! assert_eq!(wheel.lookup("diameter"), Some(&Value::Int32(17)));
//! ```
//!
//! # Profile factories
//!
//! YAML profiles bind declarative factories to paths, properties and types:
//!
//! - `static` - Static value
//! - `one_of` - Random selection from a list
//! - `int_range` / `float_range` / `decimal_range` - Random number in a range
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `timestamp_range` - Random timestamp between two bounds
//! - `duration_range` - Random duration in seconds
//! - `weighted_bool` - Boolean with configurable true probability
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `null` - Null value

pub mod config;
pub mod construct;
pub mod engine;
pub mod error;
pub mod factory;
pub mod profile;
pub mod scalars;
pub mod size;
pub mod stack;
pub mod stub;
pub mod table;

// Re-exports for convenience
pub use config::{BuildMode, Configuration};
pub use engine::Populator;
pub use error::{ConstructError, GeneratorError};
pub use factory::ValueFactory;
pub use profile::{FactorySpec, Profile};
pub use scalars::{RandomScalars, ScalarSource};
pub use size::{SizePolicy, SizeRange};
pub use stack::TypeStack;
pub use stub::{Invocation, Stub, StubValue, Stubber};
pub use table::{DefaultFactory, FactoryTable};
