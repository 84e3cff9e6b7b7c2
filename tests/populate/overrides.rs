use beanfill::testing::schemas_for_tests::car_registry;
use beanfill::{Fixture, Instance, ScalarKind, TypeRef, Value, ValueFactory};
use rust_decimal::Decimal;

#[test]
fn test_indexed_path_targets_single_element() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::random(&registry)
        .collection_size(3)
        .path("car.wheels[1].diameter", ValueFactory::fixed(21))
        .build("Car")?;

    assert_eq!(car.lookup("wheels[1].diameter"), Some(&Value::Int32(21)));
    Ok(())
}

#[test]
fn test_erased_path_targets_every_element() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::random(&registry)
        .collection_size(3)
        .path("Car.Wheels.Diameter", ValueFactory::fixed(17))
        .build("Car")?;

    for i in 0..3 {
        assert_eq!(
            car.lookup(&format!("wheels[{i}].diameter")),
            Some(&Value::Int32(17))
        );
    }
    // The spare wheel has a different path
    assert_ne!(car.lookup("spare.diameter"), Some(&Value::Int32(17)));
    Ok(())
}

#[test]
fn test_exact_path_beats_property_name() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::random(&registry)
        .collection_size(2)
        .property("diameter", ValueFactory::fixed(15))
        .path("car.wheels[0].diameter", ValueFactory::fixed(19))
        .build("Car")?;

    assert_eq!(car.lookup("wheels[0].diameter"), Some(&Value::Int32(19)));
    assert_eq!(car.lookup("wheels[1].diameter"), Some(&Value::Int32(15)));
    assert_eq!(car.lookup("spare.diameter"), Some(&Value::Int32(15)));
    Ok(())
}

#[test]
fn test_explicit_parent_wins_over_default_children() -> anyhow::Result<()> {
    let registry = car_registry();
    let engine = Instance::new("Engine").with_slot("capacity", Decimal::new(16, 1));

    let car = Fixture::random(&registry)
        .path("car.engine", Value::Bean(engine))
        .build("Car")?;

    assert_eq!(
        car.lookup("engine.capacity"),
        Some(&Value::Decimal(Decimal::new(16, 1)))
    );
    // No default was generated under the explicit engine
    assert_eq!(car.lookup("engine.horsepower"), None);
    Ok(())
}

#[test]
fn test_type_override_covers_nullable_and_primitive() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::random(&registry)
        .collection_size(2)
        .with_type(TypeRef::Primitive(ScalarKind::Int32), ValueFactory::fixed(3))
        .build("Car")?;

    assert_eq!(car.lookup("year"), Some(&Value::Int32(3)));
    assert_eq!(car.lookup("engine.horsepower"), Some(&Value::Int32(3)));
    assert_eq!(car.lookup("wheels[0].diameter"), Some(&Value::Int32(3)));
    Ok(())
}

#[test]
fn test_one_of_and_counting_factories() -> anyhow::Result<()> {
    let registry = car_registry();
    let serials = ValueFactory::counting(1, |n, _| Value::from(format!("SN-{n}")));

    let car = Fixture::random(&registry)
        .property("serial", serials)
        .property("diameter", ValueFactory::one_of([16, 17, 18]))
        .build("Car")?;

    assert_eq!(car.lookup("serial"), Some(&Value::from("SN-1")));
    let diameter = car.lookup("spare.diameter").and_then(Value::as_i32).unwrap();
    assert!((16..=18).contains(&diameter));
    Ok(())
}

#[test]
fn test_mismatched_override_fails_the_build() {
    let registry = car_registry();

    let result = Fixture::random(&registry)
        .property("year", ValueFactory::fixed("last year"))
        .build("Car");

    assert!(result.is_err());
}
