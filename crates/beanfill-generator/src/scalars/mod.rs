//! Scalar value source: terminal values for every [`ScalarKind`].
//!
//! [`ScalarSource`] has one generator per kind. Every generator has a
//! default implementation drawing from [`ScalarSource::rng`], so an
//! implementation only needs to supply the random source and override the
//! kinds it wants to control.

pub mod numeric;
pub mod temporal;
pub mod text;
pub mod uuid;

use beanfill_core::{ScalarKind, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rust_decimal::Decimal;
use std::time::Duration;

/// Source of terminal values.
pub trait ScalarSource {
    /// The underlying random source.
    fn rng(&mut self) -> &mut dyn RngCore;

    fn bool(&mut self) -> bool {
        self.rng().gen()
    }

    fn char(&mut self) -> char {
        text::generate_char(self.rng())
    }

    fn i8(&mut self) -> i8 {
        self.rng().gen()
    }

    fn i16(&mut self) -> i16 {
        self.rng().gen()
    }

    fn i32(&mut self) -> i32 {
        self.rng().gen()
    }

    fn i64(&mut self) -> i64 {
        self.rng().gen()
    }

    fn u8(&mut self) -> u8 {
        self.rng().gen()
    }

    fn f32(&mut self) -> f32 {
        numeric::generate_f32(self.rng())
    }

    fn f64(&mut self) -> f64 {
        numeric::generate_f64(self.rng())
    }

    fn decimal(&mut self) -> Decimal {
        numeric::generate_decimal(self.rng())
    }

    fn string(&mut self) -> String {
        text::generate_string(self.rng())
    }

    fn bytes(&mut self) -> Vec<u8> {
        text::generate_bytes(self.rng())
    }

    fn date(&mut self) -> NaiveDate {
        temporal::generate_date(self.rng())
    }

    fn time(&mut self) -> NaiveTime {
        temporal::generate_time(self.rng())
    }

    fn date_time(&mut self) -> NaiveDateTime {
        temporal::generate_date_time(self.rng())
    }

    fn timestamp(&mut self) -> DateTime<Utc> {
        temporal::generate_timestamp(self.rng())
    }

    fn duration(&mut self) -> Duration {
        temporal::generate_duration(self.rng())
    }

    fn uuid(&mut self) -> ::uuid::Uuid {
        uuid::generate_uuid_v4(self.rng())
    }

    /// Generate a value of the given kind.
    fn generate(&mut self, kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Bool => Value::Bool(self.bool()),
            ScalarKind::Char => Value::Char(self.char()),
            ScalarKind::Int8 => Value::Int8(self.i8()),
            ScalarKind::Int16 => Value::Int16(self.i16()),
            ScalarKind::Int32 => Value::Int32(self.i32()),
            ScalarKind::Int64 => Value::Int64(self.i64()),
            ScalarKind::UInt8 => Value::UInt8(self.u8()),
            ScalarKind::Float32 => Value::Float32(self.f32()),
            ScalarKind::Float64 => Value::Float64(self.f64()),
            ScalarKind::Decimal => Value::Decimal(self.decimal()),
            ScalarKind::String => Value::String(self.string()),
            ScalarKind::Bytes => Value::Bytes(self.bytes()),
            ScalarKind::Date => Value::Date(self.date()),
            ScalarKind::Time => Value::Time(self.time()),
            ScalarKind::DateTime => Value::DateTime(self.date_time()),
            ScalarKind::Timestamp => Value::Timestamp(self.timestamp()),
            ScalarKind::Duration => Value::Duration(self.duration()),
            ScalarKind::Uuid => Value::Uuid(self.uuid()),
        }
    }
}

/// Random scalar source over any RNG; seedable through [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomScalars<R = StdRng> {
    rng: R,
}

impl RandomScalars<StdRng> {
    /// Create a source seeded with `seed`, or from OS entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Create a source seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl<R: RngCore> RandomScalars<R> {
    /// Wrap an existing RNG.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> ScalarSource for RandomScalars<R> {
    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}
