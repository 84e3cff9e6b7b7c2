use beanfill::testing::schemas_for_tests::person_registry;
use beanfill::{Fixture, FixtureError, GeneratorError, TypeDescriptor, TypeRegistry, Value};

#[test]
fn test_immutable_type_built_from_constructor() -> anyhow::Result<()> {
    let registry = person_registry();

    let person = Fixture::random(&registry).collection_size(1).build("Person")?;

    assert!(matches!(person.lookup("address.street"), Some(Value::String(_))));
    assert!(matches!(person.lookup("address.city"), Some(Value::String(_))));
    Ok(())
}

#[test]
fn test_read_only_properties_ignore_overrides() -> anyhow::Result<()> {
    let registry = person_registry();

    // Read-only slots are never assigned through setters
    let person = Fixture::random(&registry)
        .path("person.address.city", Value::from("Springfield"))
        .build("Person")?;

    assert_ne!(person.lookup("address.city"), Some(&Value::from("Springfield")));
    Ok(())
}

#[test]
fn test_missing_constructor_is_a_distinct_failure() -> anyhow::Result<()> {
    let registry = TypeRegistry::new()
        .with(TypeDescriptor::bean("Token").without_constructors())?
        .with(TypeDescriptor::bean("Session").property("token", "Token")?)?;

    let result = Fixture::random(&registry).build("Session");
    assert!(matches!(
        result,
        Err(FixtureError::Generator(GeneratorError::NoDefaultConstructor(name))) if name == "Token"
    ));
    Ok(())
}

#[test]
fn test_argument_failure_is_wrapped() -> anyhow::Result<()> {
    let registry = TypeRegistry::new()
        .with(TypeDescriptor::interface("Clock"))?
        .with(
            TypeDescriptor::bean("Scheduler")
                .read_only_property("clock", "Clock")?
                .constructor(["clock"]),
        )?;

    let result = Fixture::random(&registry).build("Scheduler");
    assert!(matches!(
        result,
        Err(FixtureError::Generator(GeneratorError::ConstructionFailed { type_name, .. }))
            if type_name == "Scheduler"
    ));
    Ok(())
}
