//! Test support: logging setup and sample schemas.
//!

pub mod test_helpers;

pub use test_helpers::init_logging;
