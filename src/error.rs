//! Error type for the fixture facade.

use beanfill_core::SchemaError;
use beanfill_generator::GeneratorError;

/// Error type for fixture builds.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Population, construction or stubbing failed
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// A schema could not be loaded
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The built value does not deserialize into the requested type
    #[error("Failed to convert built value: {0}")]
    Conversion(#[from] serde_json::Error),
}
