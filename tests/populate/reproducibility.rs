use beanfill::testing::schemas_for_tests::{car_registry, person_registry};
use beanfill::{Fixture, RandomScalars, Value};

#[test]
fn test_same_seed_same_graph() -> anyhow::Result<()> {
    let registry = person_registry();

    let first = Fixture::random(&registry).seed(2024).build("Person")?;
    let second = Fixture::random(&registry).seed(2024).build("Person")?;
    let other = Fixture::random(&registry).seed(2025).build("Person")?;

    assert_eq!(first, second);
    assert_ne!(first, other);
    Ok(())
}

#[test]
fn test_custom_scalar_source() -> anyhow::Result<()> {
    let registry = car_registry();

    let first = Fixture::random(&registry)
        .scalar_source(RandomScalars::seeded(8))
        .build("Car")?;
    let second = Fixture::random(&registry)
        .seed(8)
        .build("Car")?;

    assert_eq!(first.to_json(), second.to_json());
    assert!(matches!(first.lookup("serial"), Some(Value::String(_))));
    Ok(())
}
