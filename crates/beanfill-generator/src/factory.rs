//! Value factories: argument-free value producers.
//!
//! A [`ValueFactory`] is built once at configuration time and invoked any
//! number of times during population. It may draw on the randomness handed
//! to it but carries no other state unless it is built as a counter.

use beanfill_core::Value;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type ProduceFn = dyn Fn(&mut dyn RngCore) -> Value + Send + Sync;

/// Shareable value producer.
#[derive(Clone)]
pub struct ValueFactory {
    produce: Arc<ProduceFn>,
}

impl ValueFactory {
    /// A factory producing values from a closure over the random source.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        Self {
            produce: Arc::new(f),
        }
    }

    /// A factory always producing the same value.
    pub fn fixed(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::from_fn(move |_| value.clone())
    }

    /// A factory producing null.
    pub fn null() -> Self {
        Self::fixed(Value::Null)
    }

    /// A factory picking uniformly from candidates; null when there are none.
    pub fn one_of<I, V>(candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let candidates: Vec<Value> = candidates.into_iter().map(Into::into).collect();
        Self::from_fn(move |rng| candidates.choose(rng).cloned().unwrap_or(Value::Null))
    }

    /// A factory counting invocations from `start`, mapping each count to a value.
    pub fn counting<F>(start: u64, f: F) -> Self
    where
        F: Fn(u64, &mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        let counter = AtomicU64::new(start);
        Self::from_fn(move |rng| f(counter.fetch_add(1, Ordering::Relaxed), rng))
    }

    /// A factory delegating to `self` and transforming its output.
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::from_fn(move |rng| f(self.produce(rng)))
    }

    /// Produce one value.
    pub fn produce(&self, rng: &mut dyn RngCore) -> Value {
        (self.produce)(rng)
    }
}

impl fmt::Debug for ValueFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFactory")
    }
}

impl From<Value> for ValueFactory {
    fn from(value: Value) -> Self {
        Self::fixed(value)
    }
}
