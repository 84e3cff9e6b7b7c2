//! Build mode and per-build override configuration.

use crate::error::GeneratorError;
use crate::factory::ValueFactory;
use crate::size::{SizePolicy, SizeRange};
use beanfill_core::{normalize_key, PropertyPath, TypeRef, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default value policy for positions without an explicit override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    /// Every position receives a generated value
    #[default]
    Random,
    /// Containers are traversed and beans instantiated; scalar leaves get
    /// zero (primitives) or null
    Empty,
    /// The root is instantiated and left unpopulated
    Null,
}

/// Overrides in effect for one build.
///
/// Property and path keys are stored lower-cased. Type-keyed factories are
/// checked in registration order.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    mode: BuildMode,
    seed: Option<u64>,
    root_name: Option<String>,
    properties: HashMap<String, ValueFactory>,
    paths: HashMap<String, ValueFactory>,
    types: Vec<(TypeRef, ValueFactory)>,
    excluded_properties: HashSet<String>,
    excluded_paths: HashSet<String>,
    sizes: SizePolicy,
    subtypes: HashMap<String, Vec<TypeRef>>,
}

impl Configuration {
    /// An empty configuration for the given mode.
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BuildMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Root path name override.
    pub fn root_name(&self) -> Option<&str> {
        self.root_name.as_deref()
    }

    pub fn set_root_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.root_name = Some(name.into());
        self
    }

    /// Bind a factory to a property name, anywhere in the graph.
    pub fn set_property(&mut self, name: &str, factory: impl Into<ValueFactory>) -> &mut Self {
        self.properties.insert(normalize_key(name), factory.into());
        self
    }

    /// Bind a factory to an exact (`car.wheels[0].diameter`) or erased path.
    pub fn set_path(&mut self, path: &str, factory: impl Into<ValueFactory>) -> &mut Self {
        self.paths.insert(normalize_key(path), factory.into());
        self
    }

    /// Bind a factory to every position whose declared type it is assignable from.
    pub fn set_type(&mut self, ty: TypeRef, factory: impl Into<ValueFactory>) -> &mut Self {
        let factory = factory.into();
        match self.types.iter_mut().find(|(t, _)| *t == ty) {
            Some(entry) => entry.1 = factory,
            None => self.types.push((ty, factory)),
        }
        self
    }

    pub fn exclude_property(&mut self, name: &str) -> &mut Self {
        self.excluded_properties.insert(normalize_key(name));
        self
    }

    pub fn exclude_path(&mut self, path: &str) -> &mut Self {
        self.excluded_paths.insert(normalize_key(path));
        self
    }

    /// Replace the default collection size range.
    pub fn set_collection_size(&mut self, min: usize, max: usize) -> Result<&mut Self, GeneratorError> {
        self.sizes.set_default(SizeRange::new(min, max)?);
        Ok(self)
    }

    pub fn set_property_collection_size(
        &mut self,
        name: &str,
        min: usize,
        max: usize,
    ) -> Result<&mut Self, GeneratorError> {
        self.sizes.set_property(name, SizeRange::new(min, max)?);
        Ok(self)
    }

    pub fn set_path_collection_size(
        &mut self,
        path: &str,
        min: usize,
        max: usize,
    ) -> Result<&mut Self, GeneratorError> {
        self.sizes.set_path(path, SizeRange::new(min, max)?);
        Ok(self)
    }

    /// Bind candidate subtypes for a supertype; one is picked at random per
    /// resolution.
    pub fn bind_subtypes<I>(&mut self, supertype: &str, candidates: I) -> &mut Self
    where
        I: IntoIterator<Item = TypeRef>,
    {
        self.subtypes
            .entry(supertype.to_string())
            .or_default()
            .extend(candidates);
        self
    }

    pub fn sizes(&self) -> &SizePolicy {
        &self.sizes
    }

    /// Type-keyed factories in registration order.
    pub fn type_factories(&self) -> &[(TypeRef, ValueFactory)] {
        &self.types
    }

    /// Candidate subtypes bound for a type name.
    pub fn subtypes_of(&self, name: &str) -> &[TypeRef] {
        self.subtypes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a position is excluded by exact path, erased path or property name.
    pub fn is_excluded(&self, path: &PropertyPath) -> bool {
        self.excluded_paths.contains(&path.exact_key())
            || self.excluded_paths.contains(&path.erased_key())
            || path
                .property_name()
                .is_some_and(|name| self.excluded_properties.contains(&normalize_key(name)))
    }

    /// Explicit factory for a property position: exact path, erased path,
    /// then property name.
    pub fn explicit_factory(&self, path: &PropertyPath) -> Option<&ValueFactory> {
        self.paths
            .get(&path.exact_key())
            .or_else(|| self.paths.get(&path.erased_key()))
            .or_else(|| {
                path.property_name()
                    .and_then(|name| self.properties.get(&normalize_key(name)))
            })
    }

    /// Explicit factory bound to exactly this indexed path.
    pub fn exact_path_factory(&self, path: &PropertyPath) -> Option<&ValueFactory> {
        self.paths.get(&path.exact_key())
    }

    /// First type-keyed factory assignable from `declared`.
    pub fn type_factory(&self, registry: &TypeRegistry, declared: &TypeRef) -> Option<&ValueFactory> {
        self.types
            .iter()
            .find(|(target, _)| registry.is_assignable(target, declared))
            .map(|(_, factory)| factory)
    }
}
