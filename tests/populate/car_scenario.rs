use beanfill::testing::init_logging;
use beanfill::testing::schemas_for_tests::car_registry;
use beanfill::{Fixture, Value, ValueFactory};
use rust_decimal::Decimal;

#[test]
fn test_random_car_with_single_wheel() -> anyhow::Result<()> {
    init_logging();
    let registry = car_registry();

    let car = Fixture::random(&registry).collection_size(1).build("Car")?;

    assert!(matches!(car.lookup("engine.capacity"), Some(Value::Decimal(_))));
    assert_eq!(car.lookup("wheels").and_then(Value::len), Some(1));
    assert!(matches!(car.lookup("wheels[0].diameter"), Some(Value::Int32(_))));
    assert!(matches!(car.lookup("color"), Some(Value::Enum { .. })));
    assert!(matches!(car.lookup("spare.diameter"), Some(Value::Int32(_))));
    Ok(())
}

#[test]
fn test_capacity_path_override_in_every_mode() -> anyhow::Result<()> {
    init_logging();
    let registry = car_registry();
    let four = Value::Decimal(Decimal::new(4, 0));

    let random = Fixture::random(&registry)
        .path("car.engine.capacity", ValueFactory::fixed(4.0))
        .build("Car")?;
    assert_eq!(random.lookup("engine.capacity"), Some(&four));

    let empty = Fixture::empty(&registry)
        .path("car.engine.capacity", ValueFactory::fixed(4.0))
        .build("Car")?;
    assert_eq!(empty.lookup("engine.capacity"), Some(&four));
    Ok(())
}

#[test]
fn test_capacity_property_override_matches_path_override() -> anyhow::Result<()> {
    let registry = car_registry();

    for key in ["Capacity", "capacity", "CAPACITY"] {
        let car = Fixture::random(&registry)
            .property(key, ValueFactory::fixed(4.0))
            .build("Car")?;
        assert_eq!(
            car.lookup("engine.capacity"),
            Some(&Value::Decimal(Decimal::new(4, 0))),
            "override key {key}"
        );
    }
    Ok(())
}

#[test]
fn test_built_car_converts_to_json() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::random(&registry)
        .seed(11)
        .collection_size(2)
        .property("serial", ValueFactory::fixed("SN-001"))
        .build("Car")?;
    let json = car.to_json();

    assert_eq!(json["serial"], "SN-001");
    assert_eq!(json["wheels"].as_array().map(Vec::len), Some(2));
    assert!(json["engine"].is_object());
    Ok(())
}
