use beanfill::testing::schemas_for_tests::{car_registry, person_registry};
use beanfill::{Fixture, GeneratorError, Value, FixtureError};

#[test]
fn test_fixed_size_applies_to_every_container() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::random(&registry).collection_size(4).build("Car")?;

    assert_eq!(car.lookup("wheels").and_then(Value::len), Some(4));
    // Random strings and keys may collide, so set and map sizes are bounds
    assert!(car.lookup("tags").and_then(Value::len).is_some_and(|n| n <= 4));
    assert!(car.lookup("mileage").and_then(Value::len).is_some_and(|n| n <= 4));
    Ok(())
}

#[test]
fn test_range_is_half_open() -> anyhow::Result<()> {
    let registry = car_registry();

    for seed in 0..20 {
        let car = Fixture::random(&registry)
            .seed(seed)
            .collection_size_range(2, 4)
            .build("Car")?;
        let wheels = car.lookup("wheels").and_then(Value::len).unwrap();
        assert!((2..4).contains(&wheels), "seed {seed}: {wheels} wheels");
    }
    Ok(())
}

#[test]
fn test_specific_sizes_beat_the_default() -> anyhow::Result<()> {
    let registry = person_registry();

    let person = Fixture::random(&registry)
        .collection_size(1)
        .property_collection_size("nicknames", 3)
        .path_collection_size("person.friends", 2)
        .build("Person")?;

    assert_eq!(person.lookup("friends").and_then(Value::len), Some(2));
    assert_eq!(person.lookup("nicknames").and_then(Value::len), Some(3));
    // The property size applies at any depth; the path size does not
    assert_eq!(person.lookup("partner.nicknames").and_then(Value::len), Some(3));
    Ok(())
}

#[test]
fn test_arrays_keep_null_elements() -> anyhow::Result<()> {
    let registry = person_registry();

    let person = Fixture::empty(&registry).collection_size(2).build("Person")?;

    let nicknames = person.lookup("nicknames").and_then(Value::as_elements).unwrap();
    assert_eq!(nicknames, &[Value::Null, Value::Null]);
    Ok(())
}

#[test]
fn test_inverted_range_is_rejected() {
    let registry = car_registry();

    let result = Fixture::random(&registry)
        .property_collection_size_range("wheels", 5, 1)
        .build("Car");

    assert!(matches!(
        result,
        Err(FixtureError::Generator(GeneratorError::InvalidSizeRange { min: 5, max: 1 }))
    ));
}
