//! Error types for population, construction and stubbing.

use beanfill_core::AccessError;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Type not found in the registry
    #[error("Type not registered: {0}")]
    UnknownType(String),

    /// A type has no constructor at all
    #[error("Type '{0}' has no usable constructor")]
    NoDefaultConstructor(String),

    /// Constructing an instance failed
    #[error("Failed to construct '{type_name}'")]
    ConstructionFailed {
        type_name: String,
        #[source]
        source: Box<GeneratorError>,
    },

    /// Abstract types and interfaces need a subtype binding
    #[error("Type '{0}' is abstract or an interface and has no subtype binding")]
    NotInstantiable(String),

    /// Final types cannot be stubbed
    #[error("Type '{0}' is final and cannot be stubbed")]
    FinalType(String),

    /// A generic type was stubbed without type arguments
    #[error("Type '{0}' has unresolved type parameters; stub it through a reified type reference")]
    UnresolvedGenericType(String),

    /// A reified type reference was given for a non-generic type
    #[error("'{0}' is not a generic type with matching type arguments")]
    NotGeneric(String),

    /// Random pick from an enum without constants
    #[error("Enum '{0}' declares no constants")]
    EmptyEnumeration(String),

    /// A property setter rejected a value
    #[error("Failed to assign '{path}'")]
    PropertyAssignment {
        path: String,
        #[source]
        source: AccessError,
    },

    /// A collection size range with min above max
    #[error("Invalid collection size range: min {min} > max {max}")]
    InvalidSizeRange { min: usize, max: usize },

    /// A stub member that the type does not declare
    #[error("Type '{type_name}' has no member '{member}'")]
    UnknownMember { type_name: String, member: String },

    /// Profile document error
    #[error("Profile error: {0}")]
    Profile(String),

    /// Error reading a profile file
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing profile YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Outcome of a failed instance construction.
///
/// Callers inspect the variant: a missing constructor is a structural
/// property of the type, anything else is a failure of this attempt.
#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
    /// The type declares no constructor
    #[error("Type '{type_name}' has no usable constructor")]
    NoDefaultConstructor { type_name: String },

    /// Construction was attempted and failed
    #[error("Failed to construct '{type_name}'")]
    Failed {
        type_name: String,
        #[source]
        source: Box<GeneratorError>,
    },
}

impl ConstructError {
    pub(crate) fn failed(type_name: impl Into<String>, source: GeneratorError) -> Self {
        Self::Failed {
            type_name: type_name.into(),
            source: Box::new(source),
        }
    }
}

impl From<ConstructError> for GeneratorError {
    fn from(err: ConstructError) -> Self {
        match err {
            ConstructError::NoDefaultConstructor { type_name } => {
                GeneratorError::NoDefaultConstructor(type_name)
            }
            ConstructError::Failed { type_name, source } => {
                GeneratorError::ConstructionFailed { type_name, source }
            }
        }
    }
}
