//! Population integration tests.
//!
//! Each module builds graphs from the sample schemas in
//! `beanfill::testing::schemas_for_tests` and checks one family of
//! behaviors end to end through the `Fixture` surface.

mod car_scenario;
mod construction;
mod cycles;
mod modes;
mod overrides;
mod profiles;
mod reproducibility;
mod sizes;
mod stubs;
mod subtypes;
