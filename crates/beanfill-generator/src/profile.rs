//! Declarative factories and YAML build profiles.
//!
//! A profile carries everything a [`Configuration`] does, with factories
//! written as [`FactorySpec`]s:
//!
//! ```yaml
//! mode: random
//! seed: 42
//! collection_size: { min: 1, max: 3 }
//! sizes:
//!   paths:
//!     car.wheels: { min: 4, max: 4 }
//! exclude:
//!   properties: [serial]
//! paths:
//!   car.engine.capacity: { type: static, value: 4.0 }
//! properties:
//!   diameter: { type: int_range, min: 15, max: 19 }
//! types:
//!   string: { type: pattern, pattern: "item-{index}" }
//! subtypes:
//!   Vehicle: [Car, Truck]
//! ```

use crate::config::{BuildMode, Configuration};
use crate::error::GeneratorError;
use crate::factory::ValueFactory;
use crate::scalars::{numeric, temporal, text, uuid};
use crate::size::SizeRange;
use beanfill_core::{TypeRef, Value};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Declarative factory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FactorySpec {
    /// A static value
    Static {
        /// The value to produce
        value: YamlValue,
    },

    /// Random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<YamlValue>,
    },

    /// Random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Random decimals with 2 decimal places in a range
    DecimalRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Strings from a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N})
        pattern: String,
    },

    /// UTC timestamps in a range
    TimestampRange {
        /// Start timestamp (RFC 3339 or YYYY-MM-DD)
        start: String,
        /// End timestamp (RFC 3339 or YYYY-MM-DD)
        end: String,
    },

    /// Durations in a range of seconds
    DurationRange {
        /// Minimum duration in seconds (inclusive)
        min_secs: u64,
        /// Maximum duration in seconds (inclusive)
        max_secs: u64,
    },

    /// Booleans with a configurable probability of true
    WeightedBool {
        /// Weight for true (0.0 to 1.0)
        true_weight: f64,
    },

    /// Random UUIDs (v4)
    UuidV4,

    /// Sequential integers, one per invocation
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Null
    Null,
}

impl FactorySpec {
    /// Build the factory described by this entry.
    pub fn to_factory(&self) -> Result<ValueFactory, GeneratorError> {
        let factory = match self.clone() {
            Self::Static { value } => ValueFactory::fixed(yaml_to_value(&value)),
            Self::OneOf { values } => ValueFactory::one_of(values.iter().map(yaml_to_value)),
            Self::IntRange { min, max } => ValueFactory::from_fn(move |rng| {
                integer_value(numeric::generate_int_range(rng, min, max))
            }),
            Self::FloatRange { min, max } => {
                check_finite("float_range", min, max)?;
                ValueFactory::from_fn(move |rng| {
                    Value::Float64(numeric::generate_float_range(rng, min, max))
                })
            }
            Self::DecimalRange { min, max } => {
                check_finite("decimal_range", min, max)?;
                ValueFactory::from_fn(move |rng| {
                    Value::Decimal(numeric::generate_decimal_range(rng, min, max))
                })
            }
            Self::Pattern { pattern } => ValueFactory::counting(0, move |index, rng| {
                Value::String(text::generate_pattern(&pattern, rng, index))
            }),
            Self::TimestampRange { start, end } => {
                if temporal::parse_timestamp(&start).is_none()
                    && temporal::parse_timestamp(&end).is_none()
                {
                    return Err(GeneratorError::Profile(format!(
                        "timestamp_range bounds '{start}' and '{end}' are not timestamps"
                    )));
                }
                ValueFactory::from_fn(move |rng| {
                    temporal::generate_timestamp_range(rng, &start, &end)
                        .map(Value::Timestamp)
                        .unwrap_or(Value::Null)
                })
            }
            Self::DurationRange { min_secs, max_secs } => ValueFactory::from_fn(move |rng| {
                Value::Duration(temporal::generate_duration_range(rng, min_secs, max_secs))
            }),
            Self::WeightedBool { true_weight } => {
                if !(0.0..=1.0).contains(&true_weight) {
                    return Err(GeneratorError::Profile(format!(
                        "weighted_bool true_weight {true_weight} is outside 0.0..=1.0"
                    )));
                }
                ValueFactory::from_fn(move |rng| Value::Bool(rng.gen_bool(true_weight)))
            }
            Self::UuidV4 => ValueFactory::from_fn(|rng| Value::Uuid(uuid::generate_uuid_v4(rng))),
            Self::Sequential { start } => ValueFactory::counting(0, move |index, _| {
                integer_value(start.wrapping_add(index as i64))
            }),
            Self::Null => ValueFactory::null(),
        };
        Ok(factory)
    }
}

/// Integers that fit in 32 bits become `Int32`, wider ones `Int64`.
///
/// `Int32` widens to every wider integer and decimal position on assignment.
fn integer_value(i: i64) -> Value {
    i32::try_from(i).map(Value::Int32).unwrap_or(Value::Int64(i))
}

fn check_finite(kind: &str, min: f64, max: f64) -> Result<(), GeneratorError> {
    if min.is_finite() && max.is_finite() {
        return Ok(());
    }
    Err(GeneratorError::Profile(format!(
        "{kind} bounds {min} and {max} must be finite"
    )))
}

/// Convert a YAML value to a [`Value`].
///
/// Sequences become lists and mappings become maps.
pub fn yaml_to_value(yaml: &YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                integer_value(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float64(f)
            } else {
                Value::String(n.to_string())
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::List(items.iter().map(yaml_to_value).collect()),
        YamlValue::Mapping(map) => {
            let mut out = Value::Map(Vec::new());
            for (k, v) in map {
                out.insert_entry(yaml_to_value(k), yaml_to_value(v));
            }
            out
        }
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

/// Size overrides by path and property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeOverrides {
    #[serde(default)]
    pub paths: BTreeMap<String, SizeRange>,
    #[serde(default)]
    pub properties: BTreeMap<String, SizeRange>,
}

/// Excluded paths and property names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exclusions {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub properties: Vec<String>,
}

/// YAML build profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Build mode; unchanged when absent
    #[serde(default)]
    pub mode: Option<BuildMode>,

    /// Random seed for reproducible builds
    #[serde(default)]
    pub seed: Option<u64>,

    /// Root path name
    #[serde(default)]
    pub root_name: Option<String>,

    /// Default collection size range
    #[serde(default)]
    pub collection_size: Option<SizeRange>,

    #[serde(default)]
    pub sizes: SizeOverrides,

    #[serde(default)]
    pub exclude: Exclusions,

    /// Factories by exact or erased path
    #[serde(default)]
    pub paths: BTreeMap<String, FactorySpec>,

    /// Factories by property name
    #[serde(default)]
    pub properties: BTreeMap<String, FactorySpec>,

    /// Factories by declared type expression, checked in key order
    #[serde(default)]
    pub types: BTreeMap<String, FactorySpec>,

    /// Candidate subtypes by supertype name
    #[serde(default)]
    pub subtypes: BTreeMap<String, Vec<String>>,
}

impl Profile {
    /// Parse a profile from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, GeneratorError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a profile from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Apply this profile on top of an existing configuration.
    pub fn apply_to(&self, config: &mut Configuration) -> Result<(), GeneratorError> {
        if let Some(mode) = self.mode {
            config.set_mode(mode);
        }
        if let Some(seed) = self.seed {
            config.set_seed(seed);
        }
        if let Some(name) = &self.root_name {
            config.set_root_name(name.clone());
        }
        if let Some(range) = self.collection_size {
            config.set_collection_size(range.min, range.max)?;
        }
        for (path, range) in &self.sizes.paths {
            config.set_path_collection_size(path, range.min, range.max)?;
        }
        for (property, range) in &self.sizes.properties {
            config.set_property_collection_size(property, range.min, range.max)?;
        }
        for path in &self.exclude.paths {
            config.exclude_path(path);
        }
        for property in &self.exclude.properties {
            config.exclude_property(property);
        }
        for (path, spec) in &self.paths {
            config.set_path(path, spec.to_factory()?);
        }
        for (property, spec) in &self.properties {
            config.set_property(property, spec.to_factory()?);
        }
        for (expr, spec) in &self.types {
            config.set_type(parse_type(expr)?, spec.to_factory()?);
        }
        for (supertype, candidates) in &self.subtypes {
            let candidates = candidates
                .iter()
                .map(|c| parse_type(c))
                .collect::<Result<Vec<_>, _>>()?;
            config.bind_subtypes(supertype, candidates);
        }
        Ok(())
    }

    /// Build a fresh configuration from this profile; mode defaults to random.
    pub fn to_configuration(&self) -> Result<Configuration, GeneratorError> {
        let mut config = Configuration::new(self.mode.unwrap_or_default());
        self.apply_to(&mut config)?;
        Ok(config)
    }
}

fn parse_type(expr: &str) -> Result<TypeRef, GeneratorError> {
    TypeRef::parse(expr).map_err(|e| GeneratorError::Profile(e.to_string()))
}
