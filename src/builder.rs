//! Fluent fixture builder.
//!
//! A [`Fixture`] collects overrides in any order and is consumed by exactly
//! one terminal call: [`Fixture::build`], [`Fixture::build_as`],
//! [`Fixture::fill`], [`Fixture::stub`] or [`Fixture::stub_reified`].
//!
//! Invalid collection sizes do not break the chain. The first one is kept
//! and returned by the terminal call.

use crate::error::FixtureError;
use beanfill_core::{PropertyPath, TypeRef, TypeRegistry, Value};
use beanfill_generator::{
    BuildMode, Configuration, GeneratorError, Populator, Profile, RandomScalars, ScalarSource,
    SizeRange, Stub, Stubber, TypeStack, ValueFactory,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Builder for one populated object graph or stub.
pub struct Fixture<'r> {
    registry: &'r TypeRegistry,
    config: Configuration,
    source: Option<Box<dyn ScalarSource>>,
    pending_error: Option<GeneratorError>,
}

impl<'r> Fixture<'r> {
    /// A fixture in the given mode.
    pub fn new(registry: &'r TypeRegistry, mode: BuildMode) -> Self {
        Self {
            registry,
            config: Configuration::new(mode),
            source: None,
            pending_error: None,
        }
    }

    /// Every position without an override gets a generated value.
    pub fn random(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, BuildMode::Random)
    }

    /// Containers and beans are instantiated; scalar leaves stay zero or null.
    pub fn empty(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, BuildMode::Empty)
    }

    /// Only the root is instantiated.
    pub fn null(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, BuildMode::Null)
    }

    /// Override every property with this name, at any depth.
    pub fn property(mut self, name: &str, factory: impl Into<ValueFactory>) -> Self {
        self.config.set_property(name, factory);
        self
    }

    /// Override an exact (`car.wheels[0].diameter`) or erased
    /// (`car.wheels.diameter`) path.
    pub fn path(mut self, path: &str, factory: impl Into<ValueFactory>) -> Self {
        self.config.set_path(path, factory);
        self
    }

    /// Override every position whose declared type `ty` is assignable from.
    pub fn with_type(mut self, ty: TypeRef, factory: impl Into<ValueFactory>) -> Self {
        self.config.set_type(ty, factory);
        self
    }

    pub fn exclude_property(mut self, name: &str) -> Self {
        self.config.exclude_property(name);
        self
    }

    pub fn exclude_path(mut self, path: &str) -> Self {
        self.config.exclude_path(path);
        self
    }

    /// Fixed size for every collection without a more specific size.
    pub fn collection_size(self, size: usize) -> Self {
        self.collection_size_range(size, size)
    }

    pub fn collection_size_range(mut self, min: usize, max: usize) -> Self {
        let result = self.config.set_collection_size(min, max).map(|_| ());
        self.record(result)
    }

    pub fn property_collection_size(self, name: &str, size: usize) -> Self {
        self.property_collection_size_range(name, size, size)
    }

    pub fn property_collection_size_range(mut self, name: &str, min: usize, max: usize) -> Self {
        let result = self
            .config
            .set_property_collection_size(name, min, max)
            .map(|_| ());
        self.record(result)
    }

    pub fn path_collection_size(self, path: &str, size: usize) -> Self {
        self.path_collection_size_range(path, size, size)
    }

    pub fn path_collection_size_range(mut self, path: &str, min: usize, max: usize) -> Self {
        let result = self.config.set_path_collection_size(path, min, max).map(|_| ());
        self.record(result)
    }

    /// Substitute `subtype` wherever `supertype` is instantiated.
    pub fn subtype(self, supertype: &str, subtype: TypeRef) -> Self {
        self.subtypes(supertype, [subtype])
    }

    /// Substitute one of `candidates`, picked at random per position.
    pub fn subtypes<I>(mut self, supertype: &str, candidates: I) -> Self
    where
        I: IntoIterator<Item = TypeRef>,
    {
        self.config.bind_subtypes(supertype, candidates);
        self
    }

    /// Seed the default scalar source for a reproducible build.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.set_seed(seed);
        self
    }

    /// Name of the root path segment, used by path overrides.
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.config.set_root_name(name);
        self
    }

    /// Replace the default scalar source.
    pub fn scalar_source(mut self, source: impl ScalarSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Apply a YAML profile on top of what is configured so far.
    pub fn profile(mut self, profile: &Profile) -> Self {
        let result = profile.apply_to(&mut self.config);
        self.record(result)
    }

    fn record(mut self, result: Result<(), GeneratorError>) -> Self {
        if let Err(err) = result {
            self.pending_error.get_or_insert(err);
        }
        self
    }

    fn finish(self) -> Result<(Configuration, Box<dyn ScalarSource>), FixtureError> {
        if let Some(err) = self.pending_error {
            return Err(err.into());
        }
        let config = self.config;
        let source = match self.source {
            Some(source) => source,
            None => Box::new(RandomScalars::new(config.seed())),
        };
        Ok((config, source))
    }

    /// Build a populated graph for a registered, non-generic type.
    pub fn build(self, type_name: &str) -> Result<Value, FixtureError> {
        let registry = self.registry;
        let (config, mut source) = self.finish()?;
        let value = Populator::new(registry, &config, &mut *source).build_type(type_name)?;
        Ok(value)
    }

    /// Build a graph for any type, including reified generics
    /// (`Page<Person>`) and containers (`List<Car>`).
    pub fn build_reified(self, ty: &TypeRef) -> Result<Value, FixtureError> {
        let registry = self.registry;
        let (config, mut source) = self.finish()?;
        let value = Populator::new(registry, &config, &mut *source).build(ty)?;
        Ok(value)
    }

    /// Build and convert into a user type through serde.
    pub fn build_as<T: DeserializeOwned>(self, type_name: &str) -> Result<T, FixtureError> {
        let value = self.build(type_name)?;
        Ok(serde_json::from_value(value.to_json())?)
    }

    /// Populate an existing value in place. Slots that are already set are
    /// kept.
    pub fn fill(self, value: &mut Value) -> Result<(), FixtureError> {
        let registry = self.registry;
        let root = match (self.config.root_name(), value.runtime_type()) {
            (Some(name), _) => PropertyPath::root(name),
            (None, Some(ty)) => ty
                .type_name()
                .map(PropertyPath::for_type)
                .unwrap_or_else(|| PropertyPath::root("root")),
            (None, None) => return Ok(()),
        };
        let stack = value
            .runtime_type()
            .map(|ty| TypeStack::root(&ty))
            .unwrap_or_default();
        let (config, mut source) = self.finish()?;
        debug!("Filling existing value at {}", root);
        Populator::new(registry, &config, &mut *source).populate(value, &root, &stack)?;
        Ok(())
    }

    /// A lazy stub of a registered, non-generic, non-final type.
    pub fn stub(self, type_name: &str) -> Result<Stub<'r>, FixtureError> {
        let registry = self.registry;
        let (config, source) = self.finish()?;
        Ok(Stubber::new(registry, config, source).stub(type_name)?)
    }

    /// A lazy stub of a generic type with reified arguments.
    pub fn stub_reified(self, ty: &TypeRef) -> Result<Stub<'r>, FixtureError> {
        let registry = self.registry;
        let (config, source) = self.finish()?;
        Ok(Stubber::new(registry, config, source).stub_reified(ty)?)
    }

    /// The size range currently in effect for collections without a more
    /// specific size.
    pub fn default_collection_size(&self) -> SizeRange {
        self.config.sizes().default_range()
    }
}
