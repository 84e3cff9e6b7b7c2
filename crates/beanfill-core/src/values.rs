//! Runtime value representations for generated object graphs.
//!
//! `Value` is the type-agnostic value tree produced by the population engine.
//! Beans are held as [`Instance`]s: a runtime type name plus ordered property
//! slots.

use crate::types::{ScalarKind, TypeRef};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;
use uuid::Uuid;

/// A generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// Unicode scalar value
    Char(char),

    /// 8-bit signed integer
    Int8(i8),

    /// 16-bit signed integer
    Int16(i16),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// Unsigned byte
    UInt8(u8),

    /// 32-bit floating point
    Float32(f32),

    /// 64-bit floating point
    Float64(f64),

    /// Arbitrary-precision decimal
    Decimal(Decimal),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Date only
    Date(NaiveDate),

    /// Time only
    Time(NaiveTime),

    /// Date and time without timezone
    DateTime(NaiveDateTime),

    /// UTC timestamp
    Timestamp(DateTime<Utc>),

    /// Elapsed time
    Duration(Duration),

    /// UUID value
    Uuid(Uuid),

    /// Enum constant
    Enum {
        /// Enum type name
        type_name: String,
        /// Selected constant
        constant: String,
    },

    /// Fixed-length array (null elements allowed)
    Array(Vec<Value>),

    /// Ordered list
    List(Vec<Value>),

    /// Insertion-ordered set without duplicates
    Set(Vec<Value>),

    /// Insertion-ordered map with unique keys
    Map(Vec<(Value, Value)>),

    /// Bean instance
    Bean(Instance),
}

impl Value {
    /// The zero value of a scalar kind.
    ///
    /// Kinds without a numeric zero (strings, temporal values, ...) yield
    /// their empty or epoch value.
    pub fn zero(kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Char => Value::Char('\0'),
            ScalarKind::Int8 => Value::Int8(0),
            ScalarKind::Int16 => Value::Int16(0),
            ScalarKind::Int32 => Value::Int32(0),
            ScalarKind::Int64 => Value::Int64(0),
            ScalarKind::UInt8 => Value::UInt8(0),
            ScalarKind::Float32 => Value::Float32(0.0),
            ScalarKind::Float64 => Value::Float64(0.0),
            ScalarKind::Decimal => Value::Decimal(Decimal::ZERO),
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Bytes => Value::Bytes(Vec::new()),
            ScalarKind::Date => Value::Date(NaiveDate::default()),
            ScalarKind::Time => Value::Time(NaiveTime::default()),
            ScalarKind::DateTime => Value::DateTime(NaiveDateTime::default()),
            ScalarKind::Timestamp => Value::Timestamp(DateTime::<Utc>::default()),
            ScalarKind::Duration => Value::Duration(Duration::ZERO),
            ScalarKind::Uuid => Value::Uuid(Uuid::nil()),
        }
    }

    /// The unset state of a position of the given type.
    pub fn unset(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Primitive(kind) => Value::zero(*kind),
            _ => Value::Null,
        }
    }

    /// An empty container of the given type, or `None` for non-containers.
    pub fn empty_container(ty: &TypeRef) -> Option<Value> {
        match ty {
            TypeRef::Array(_) => Some(Value::Array(Vec::new())),
            TypeRef::List(_) => Some(Value::List(Vec::new())),
            TypeRef::Set(_) => Some(Value::Set(Vec::new())),
            TypeRef::Map(_, _) => Some(Value::Map(Vec::new())),
            _ => None,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value counts as already set for a position of type `ty`.
    ///
    /// Null is never set, containers must be non-empty and primitive
    /// positions must differ from their zero value.
    pub fn is_set_for(&self, ty: &TypeRef) -> bool {
        match self {
            Self::Null => false,
            Self::Array(items) | Self::List(items) | Self::Set(items) => !items.is_empty(),
            Self::Map(entries) => !entries.is_empty(),
            other => match ty {
                TypeRef::Primitive(kind) => *other != Value::zero(*kind),
                _ => true,
            },
        }
    }

    /// The scalar kind carried by this value, if it is a scalar.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Char(_) => ScalarKind::Char,
            Self::Int8(_) => ScalarKind::Int8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt8(_) => ScalarKind::UInt8,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Decimal(_) => ScalarKind::Decimal,
            Self::String(_) => ScalarKind::String,
            Self::Bytes(_) => ScalarKind::Bytes,
            Self::Date(_) => ScalarKind::Date,
            Self::Time(_) => ScalarKind::Time,
            Self::DateTime(_) => ScalarKind::DateTime,
            Self::Timestamp(_) => ScalarKind::Timestamp,
            Self::Duration(_) => ScalarKind::Duration,
            Self::Uuid(_) => ScalarKind::Uuid,
            _ => return None,
        };
        Some(kind)
    }

    /// Runtime type of this value, used to extend the type occurrence stack.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        match self {
            Self::Null => None,
            Self::Bean(instance) => Some(instance.runtime_type()),
            Self::Enum { type_name, .. } => Some(TypeRef::named(type_name.clone())),
            Self::Array(_) => Some(TypeRef::array(TypeRef::Unit)),
            Self::List(_) => Some(TypeRef::list(TypeRef::Unit)),
            Self::Set(_) => Some(TypeRef::set(TypeRef::Unit)),
            Self::Map(_) => Some(TypeRef::map(TypeRef::Unit, TypeRef::Unit)),
            scalar => scalar.scalar_kind().map(TypeRef::Scalar),
        }
    }

    /// Short description of the value's shape for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bean(instance) => instance.type_name().to_string(),
            Self::Enum { type_name, .. } => type_name.clone(),
            Self::Array(_) => "array".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Set(_) => "set".to_string(),
            Self::Map(_) => "map".to_string(),
            scalar => scalar
                .scalar_kind()
                .map(|k| k.keyword().to_string())
                .unwrap_or_default(),
        }
    }

    /// Append an element to a list or array, or insert it into a set.
    ///
    /// Returns false when the element was not added (duplicate set member or
    /// not a sequence container).
    pub fn push_element(&mut self, element: Value) -> bool {
        match self {
            Self::Array(items) | Self::List(items) => {
                items.push(element);
                true
            }
            Self::Set(items) => {
                if items.contains(&element) {
                    false
                } else {
                    items.push(element);
                    true
                }
            }
            _ => false,
        }
    }

    /// Insert an entry into a map, replacing any existing entry with an equal key.
    pub fn insert_entry(&mut self, key: Value, value: Value) -> bool {
        match self {
            Self::Map(entries) => {
                if let Some(existing) = entries.iter_mut().find(|(k, _)| *k == key) {
                    existing.1 = value;
                } else {
                    entries.push((key, value));
                }
                true
            }
            _ => false,
        }
    }

    /// Number of elements in a container.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Array(items) | Self::List(items) | Self::Set(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(i) => Some(*i),
            Self::Int16(i) => Some(*i as i32),
            Self::Int8(i) => Some(*i as i32),
            Self::UInt8(i) => Some(*i as i32),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            other => other.as_i32().map(i64::from),
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            Self::Float32(f) => Some(*f as f64),
            _ => None,
        }
    }

    /// Try to get this value as a decimal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the elements of an array, list or set.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) | Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get mutable elements of an array, list or set.
    pub fn as_elements_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) | Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get the entries of a map.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get this value as a bean instance.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Bean(instance) => Some(instance),
            _ => None,
        }
    }

    /// Try to get this value as a mutable bean instance.
    pub fn as_instance_mut(&mut self) -> Option<&mut Instance> {
        match self {
            Self::Bean(instance) => Some(instance),
            _ => None,
        }
    }

    /// Look up a nested value by a relative path such as `wheels[0].diameter`.
    ///
    /// Property names match case-insensitively. Map values are addressed by
    /// entry position.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in split_lookup_path(path)? {
            current = match segment {
                LookupSegment::Property(name) => current.as_instance()?.get_ignore_case(name)?,
                LookupSegment::Index(index) => match current {
                    Self::Map(entries) => &entries.get(index)?.1,
                    other => other.as_elements()?.get(index)?,
                },
            };
        }
        Some(current)
    }

    /// Convert this value into JSON for typed deserialization.
    ///
    /// Decimals become strings to keep their precision; maps become objects
    /// when every key is a string or scalar, otherwise arrays of pairs.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Char(c) => Json::String(c.to_string()),
            Self::Int8(i) => Json::from(*i),
            Self::Int16(i) => Json::from(*i),
            Self::Int32(i) => Json::from(*i),
            Self::Int64(i) => Json::from(*i),
            Self::UInt8(i) => Json::from(*i),
            Self::Float32(f) => Json::from(*f as f64),
            Self::Float64(f) => Json::from(*f),
            Self::Decimal(d) => Json::String(d.to_string()),
            Self::String(s) => Json::String(s.clone()),
            Self::Bytes(b) => Json::Array(b.iter().map(|v| Json::from(*v)).collect()),
            Self::Date(d) => Json::String(d.to_string()),
            Self::Time(t) => Json::String(t.to_string()),
            Self::DateTime(dt) => Json::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Self::Timestamp(ts) => Json::String(ts.to_rfc3339()),
            Self::Duration(d) => serde_json::json!({ "secs": d.as_secs(), "nanos": d.subsec_nanos() }),
            Self::Uuid(u) => Json::String(u.to_string()),
            Self::Enum { constant, .. } => Json::String(constant.clone()),
            Self::Array(items) | Self::List(items) | Self::Set(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Map(entries) => {
                let keys: Option<Vec<String>> = entries.iter().map(|(k, _)| json_key(k)).collect();
                match keys {
                    Some(keys) => Json::Object(
                        keys.into_iter()
                            .zip(entries.iter().map(|(_, v)| v.to_json()))
                            .collect(),
                    ),
                    None => Json::Array(
                        entries
                            .iter()
                            .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                            .collect(),
                    ),
                }
            }
            Self::Bean(instance) => Json::Object(
                instance
                    .slots()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn json_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Enum { constant, .. } => Some(constant.clone()),
        Value::Uuid(u) => Some(u.to_string()),
        Value::Char(c) => Some(c.to_string()),
        other if other.as_i64().is_some() => other.as_i64().map(|i| i.to_string()),
        _ => None,
    }
}

enum LookupSegment<'a> {
    Property(&'a str),
    Index(usize),
}

fn split_lookup_path(path: &str) -> Option<Vec<LookupSegment<'_>>> {
    let mut segments = Vec::new();
    for part in path.split('.').filter(|p| !p.is_empty()) {
        let (name, mut rest) = match part.find('[') {
            Some(at) => (&part[..at], &part[at..]),
            None => (part, ""),
        };
        if !name.is_empty() {
            segments.push(LookupSegment::Property(name));
        }
        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']')?;
            segments.push(LookupSegment::Index(stripped[..end].parse().ok()?));
            rest = &stripped[end + 1..];
        }
    }
    Some(segments)
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from!(
    bool => Bool,
    char => Char,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
    Duration => Duration,
    Uuid => Uuid,
    Instance => Bean,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A bean instance: runtime type plus ordered property slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_name: String,
    type_args: Vec<TypeRef>,
    slots: Vec<(String, Value)>,
}

impl Instance {
    /// Create an instance without slots.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            type_args: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Set the reified generic arguments of this instance.
    pub fn with_type_args(mut self, type_args: Vec<TypeRef>) -> Self {
        self.type_args = type_args;
        self
    }

    /// Add a slot (builder style).
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(name, value.into());
        self
    }

    /// Runtime type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Reified generic arguments.
    pub fn type_args(&self) -> &[TypeRef] {
        &self.type_args
    }

    /// Runtime type including generic arguments.
    pub fn runtime_type(&self) -> TypeRef {
        TypeRef::generic(self.type_name.clone(), self.type_args.clone())
    }

    /// All slots in declaration order.
    pub fn slots(&self) -> &[(String, Value)] {
        &self.slots
    }

    /// Get a slot value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a slot value by name, ignoring case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&Value> {
        self.get(name).or_else(|| {
            self.slots
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    /// Get a mutable slot value by exact name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.slots.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Store a slot value without any type checking, adding the slot if needed.
    pub fn put(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.slots.push((name, value)),
        }
    }

    /// Number of slots.
    pub fn field_count(&self) -> usize {
        self.slots.len()
    }
}
