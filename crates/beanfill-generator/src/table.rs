//! Per-mode default factory tables for scalar positions.

use crate::config::BuildMode;
use crate::scalars::ScalarSource;
use beanfill_core::{ScalarKind, TypeRef, Value};

/// Default factory for one scalar type.
#[derive(Debug, Clone)]
pub enum DefaultFactory {
    /// Draw a value of this kind from the scalar source
    Generate(ScalarKind),
    /// Always the same value
    Fixed(Value),
}

impl DefaultFactory {
    /// Produce one value.
    pub fn produce(&self, source: &mut dyn ScalarSource) -> Value {
        match self {
            Self::Generate(kind) => source.generate(*kind),
            Self::Fixed(value) => value.clone(),
        }
    }
}

/// Ordered map from scalar type to its default factory.
///
/// Positions without an entry default to null.
#[derive(Debug, Clone, Default)]
pub struct FactoryTable {
    entries: Vec<(TypeRef, DefaultFactory)>,
}

impl FactoryTable {
    /// Every scalar kind, primitive and nullable, drawn from the source.
    pub fn random() -> Self {
        let mut table = Self::default();
        for kind in ScalarKind::ALL {
            let generate = DefaultFactory::Generate(kind);
            if kind.is_primitive_capable() {
                table.insert(TypeRef::Primitive(kind), generate.clone());
            }
            table.insert(TypeRef::Scalar(kind), generate);
        }
        table
    }

    /// Primitive kinds map to their zero value; nullable kinds are absent.
    pub fn empty() -> Self {
        let mut table = Self::default();
        for kind in ScalarKind::ALL.into_iter().filter(|k| k.is_primitive_capable()) {
            table.insert(TypeRef::Primitive(kind), DefaultFactory::Fixed(Value::zero(kind)));
        }
        table
    }

    /// The table for a build mode.
    pub fn for_mode(mode: BuildMode) -> Self {
        match mode {
            BuildMode::Random => Self::random(),
            BuildMode::Empty | BuildMode::Null => Self::empty(),
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, ty: TypeRef, factory: DefaultFactory) {
        match self.entries.iter_mut().find(|(t, _)| *t == ty) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((ty, factory)),
        }
    }

    /// The entry for a declared type.
    pub fn get(&self, ty: &TypeRef) -> Option<&DefaultFactory> {
        self.entries.iter().find(|(t, _)| t == ty).map(|(_, f)| f)
    }

    /// Produce the default value for a declared type, if the table has one.
    pub fn produce(&self, ty: &TypeRef, source: &mut dyn ScalarSource) -> Option<Value> {
        self.get(ty).map(|f| f.produce(source))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
