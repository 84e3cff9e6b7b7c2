//! Type references for the beanfill framework.
//!
//! This module defines `TypeRef`, the description of a type as it appears at a
//! position in an object graph (a property, a constructor parameter, a
//! container element), and `ScalarKind`, the universe of terminal value types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Terminal value types supported by the scalar value source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    /// Boolean value
    Bool,
    /// Unicode scalar value
    Char,
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// Unsigned byte
    UInt8,
    /// 32-bit IEEE 754 floating point
    Float32,
    /// 64-bit IEEE 754 floating point
    Float64,
    /// Arbitrary-precision decimal
    Decimal,
    /// UTF-8 string
    String,
    /// Byte array
    Bytes,
    /// Date only (YYYY-MM-DD)
    Date,
    /// Time only (HH:MM:SS)
    Time,
    /// Date and time without timezone
    DateTime,
    /// UTC timestamp
    Timestamp,
    /// Elapsed time
    Duration,
    /// UUID (128-bit)
    Uuid,
}

impl ScalarKind {
    /// Every supported scalar kind, in declaration order.
    pub const ALL: [ScalarKind; 18] = [
        ScalarKind::Bool,
        ScalarKind::Char,
        ScalarKind::Int8,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::UInt8,
        ScalarKind::Float32,
        ScalarKind::Float64,
        ScalarKind::Decimal,
        ScalarKind::String,
        ScalarKind::Bytes,
        ScalarKind::Date,
        ScalarKind::Time,
        ScalarKind::DateTime,
        ScalarKind::Timestamp,
        ScalarKind::Duration,
        ScalarKind::Uuid,
    ];

    /// Keyword used in type expressions.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt8 => "u8",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date_time",
            Self::Timestamp => "timestamp",
            Self::Duration => "duration",
            Self::Uuid => "uuid",
        }
    }

    /// Look up a scalar kind by keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "i8" => Self::Int8,
            "i16" => Self::Int16,
            "i32" => Self::Int32,
            "i64" => Self::Int64,
            "u8" => Self::UInt8,
            "f32" => Self::Float32,
            "f64" => Self::Float64,
            "decimal" => Self::Decimal,
            "string" | "String" => Self::String,
            "bytes" => Self::Bytes,
            "date" => Self::Date,
            "time" => Self::Time,
            "date_time" | "datetime" => Self::DateTime,
            "timestamp" | "timestamp_tz" => Self::Timestamp,
            "duration" => Self::Duration,
            "uuid" => Self::Uuid,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this kind has a never-null primitive form with a zero default.
    pub fn is_primitive_capable(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Char
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::Float32
                | Self::Float64
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Reference to a type at one position of an object graph.
///
/// # Textual form
///
/// ```text
/// i32            primitive, never null, zero by default
/// i32?           nullable scalar (also Option<i32>)
/// string         nullable scalar (non-numeric kinds are always nullable)
/// Wheel          named bean or enum
/// Box<Person>    named generic type with reified arguments
/// [f64]          array
/// List<Wheel>    list (also Vec<..>)
/// Set<string>    set (also HashSet<..>, BTreeSet<..>)
/// Map<string, i32>  map (also HashMap<..>, BTreeMap<..>)
/// ()             no value
/// ```
///
/// Bare names matching a declared type parameter of the owning type are
/// rebound to [`TypeRef::Param`] by [`TypeRef::bind_params`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Never-null scalar with a zero default
    Primitive(ScalarKind),

    /// Nullable scalar
    Scalar(ScalarKind),

    /// Registered bean, abstract type, interface or enum
    Named {
        /// Registered type name
        name: String,
        /// Reified generic arguments (empty when not generic or raw)
        args: Vec<TypeRef>,
    },

    /// Unbound generic type parameter
    Param(String),

    /// Fixed-length array
    Array(Box<TypeRef>),

    /// Ordered list
    List(Box<TypeRef>),

    /// Set without duplicates
    Set(Box<TypeRef>),

    /// Key/value map
    Map(Box<TypeRef>, Box<TypeRef>),

    /// No value (method return type only)
    Unit,
}

impl TypeRef {
    /// Reference a named type without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Reference a named generic type with reified arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    /// Create a list type.
    pub fn list(element: TypeRef) -> Self {
        Self::List(Box::new(element))
    }

    /// Create a set type.
    pub fn set(element: TypeRef) -> Self {
        Self::Set(Box::new(element))
    }

    /// Create an array type.
    pub fn array(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// Create a map type.
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Parse a type expression.
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser::new(input);
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(parsed)
    }

    /// Whether a null value may be stored at a position of this type.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Self::Primitive(_))
    }

    /// Whether this is an array, list, set or map.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Array(_) | Self::List(_) | Self::Set(_) | Self::Map(_, _)
        )
    }

    /// The scalar kind for primitive and nullable scalar types.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Primitive(kind) | Self::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The registered type name for named types.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Direct generic arguments: container element types or reified arguments.
    pub fn type_arguments(&self) -> Vec<&TypeRef> {
        match self {
            Self::Named { args, .. } => args.iter().collect(),
            Self::Array(element) | Self::List(element) | Self::Set(element) => {
                vec![element.as_ref()]
            }
            Self::Map(key, value) => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }

    /// This type and every nested generic argument, depth first.
    pub fn walk(&self) -> Vec<&TypeRef> {
        let mut out = vec![self];
        for arg in self.type_arguments() {
            out.extend(arg.walk());
        }
        out
    }

    /// Identity used for cycle detection: generic arguments are dropped and
    /// primitives collapse onto their nullable form.
    pub fn erasure(&self) -> TypeRef {
        match self {
            Self::Primitive(kind) => Self::Scalar(*kind),
            Self::Named { name, .. } => Self::named(name.clone()),
            Self::Array(_) => Self::array(Self::Unit),
            Self::List(_) => Self::list(Self::Unit),
            Self::Set(_) => Self::set(Self::Unit),
            Self::Map(_, _) => Self::map(Self::Unit, Self::Unit),
            other => other.clone(),
        }
    }

    /// Whether any unbound type parameter remains in this type.
    pub fn has_params(&self) -> bool {
        self.walk().iter().any(|t| matches!(t, Self::Param(_)))
    }

    /// Rebind bare names that match a declared type parameter as `Param`.
    pub fn bind_params(&self, params: &[String]) -> TypeRef {
        match self {
            Self::Named { name, args } if args.is_empty() && params.contains(name) => {
                Self::Param(name.clone())
            }
            Self::Named { name, args } => Self::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.bind_params(params)).collect(),
            },
            Self::Array(e) => Self::Array(Box::new(e.bind_params(params))),
            Self::List(e) => Self::List(Box::new(e.bind_params(params))),
            Self::Set(e) => Self::Set(Box::new(e.bind_params(params))),
            Self::Map(k, v) => Self::Map(
                Box::new(k.bind_params(params)),
                Box::new(v.bind_params(params)),
            ),
            other => other.clone(),
        }
    }

    /// Replace type parameters with their bound arguments.
    ///
    /// Parameters without a binding are left in place.
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            Self::Param(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Named { name, args } => Self::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            Self::Array(e) => Self::Array(Box::new(e.substitute(bindings))),
            Self::List(e) => Self::List(Box::new(e.substitute(bindings))),
            Self::Set(e) => Self::Set(Box::new(e.substitute(bindings))),
            Self::Map(k, v) => {
                Self::Map(Box::new(k.substitute(bindings)), Box::new(v.substitute(bindings)))
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Scalar(kind) if kind.is_primitive_capable() => write!(f, "{kind}?"),
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Named { name, args } if args.is_empty() => f.write_str(name),
            Self::Named { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Param(name) => f.write_str(name),
            Self::Array(e) => write!(f, "[{e}]"),
            Self::List(e) => write!(f, "List<{e}>"),
            Self::Set(e) => write!(f, "Set<{e}>"),
            Self::Map(k, v) => write!(f, "Map<{k}, {v}>"),
            Self::Unit => f.write_str("()"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ScalarKind> for TypeRef {
    fn from(kind: ScalarKind) -> Self {
        TypeRef::Scalar(kind)
    }
}

/// Error produced when a type expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid type expression '{input}' at offset {offset}: {message}")]
pub struct TypeParseError {
    /// The full expression
    pub input: String,
    /// Byte offset of the failure
    pub offset: usize,
    /// What went wrong
    pub message: String,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> TypeParseError {
        TypeParseError {
            input: self.input.to_string(),
            offset: self.pos,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' || c == ':' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_args(&mut self) -> Result<Vec<TypeRef>, TypeParseError> {
        let mut args = Vec::new();
        if !self.eat('<') {
            return Ok(args);
        }
        loop {
            args.push(self.parse_type()?);
            if self.eat(',') {
                continue;
            }
            self.expect('>')?;
            return Ok(args);
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        if self.eat('(') {
            self.expect(')')?;
            return Ok(TypeRef::Unit);
        }
        if self.eat('[') {
            let element = self.parse_type()?;
            self.expect(']')?;
            return Ok(TypeRef::array(element));
        }

        let name = self.ident()?;
        let mut args = self.parse_args()?;
        let optional = self.eat('?');

        let arity = |args: &Vec<TypeRef>, n: usize, parser: &Self| {
            if args.len() == n {
                Ok(())
            } else {
                Err(parser.error(format!("'{name}' takes {n} type argument(s)")))
            }
        };

        let parsed = match name {
            "List" | "Vec" | "VecDeque" => {
                arity(&args, 1, self)?;
                TypeRef::list(args.remove(0))
            }
            "Set" | "HashSet" | "BTreeSet" => {
                arity(&args, 1, self)?;
                TypeRef::set(args.remove(0))
            }
            "Map" | "HashMap" | "BTreeMap" => {
                arity(&args, 2, self)?;
                let key = args.remove(0);
                TypeRef::map(key, args.remove(0))
            }
            "Option" => {
                arity(&args, 1, self)?;
                match args.remove(0) {
                    TypeRef::Primitive(kind) => TypeRef::Scalar(kind),
                    other => other,
                }
            }
            _ => match ScalarKind::from_keyword(name) {
                Some(kind) => {
                    if !args.is_empty() {
                        return Err(self.error(format!("scalar '{name}' is not generic")));
                    }
                    if kind.is_primitive_capable() && !optional {
                        TypeRef::Primitive(kind)
                    } else {
                        TypeRef::Scalar(kind)
                    }
                }
                None => TypeRef::Named {
                    name: name.to_string(),
                    args,
                },
            },
        };
        Ok(parsed)
    }
}

// Type references are written as their textual expression.

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct TypeRefVisitor;

        impl Visitor<'_> for TypeRefVisitor {
            type Value = TypeRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a type expression such as \"List<Wheel>\" or \"i32?\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                TypeRef::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TypeRefVisitor)
    }
}
