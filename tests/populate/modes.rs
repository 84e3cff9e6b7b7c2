use beanfill::testing::schemas_for_tests::car_registry;
use beanfill::{Fixture, TypeDescriptor, TypeRegistry, Value};

fn scalar_registry() -> anyhow::Result<TypeRegistry> {
    let registry = TypeRegistry::new().with(
        TypeDescriptor::bean("Reading")
            .property("valid", "bool")?
            .property("count", "i32")?
            .property("ratio", "f64")?
            .property("offset", "i32?")?
            .property("label", "string")?
            .property("amount", "decimal")?
            .property("taken_at", "timestamp")?
            .property("sensor", "uuid")?
            .property("elapsed", "duration")?,
    )?;
    Ok(registry)
}

#[test]
fn test_random_mode_sets_every_scalar() -> anyhow::Result<()> {
    let registry = scalar_registry()?;

    let reading = Fixture::random(&registry).build("Reading")?;

    let instance = reading.as_instance().unwrap();
    assert_eq!(instance.field_count(), 9);
    for (name, value) in instance.slots() {
        assert!(!value.is_null(), "{name} was left null");
    }
    Ok(())
}

#[test]
fn test_empty_mode_zero_and_null() -> anyhow::Result<()> {
    let registry = scalar_registry()?;

    let reading = Fixture::empty(&registry).build("Reading")?;

    assert_eq!(reading.lookup("valid"), Some(&Value::Bool(false)));
    assert_eq!(reading.lookup("count"), Some(&Value::Int32(0)));
    assert_eq!(reading.lookup("ratio"), Some(&Value::Float64(0.0)));
    for nullable in ["offset", "label", "amount", "taken_at", "sensor", "elapsed"] {
        assert_eq!(reading.lookup(nullable), Some(&Value::Null), "{nullable}");
    }
    Ok(())
}

#[test]
fn test_empty_mode_traverses_containers_and_beans() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::empty(&registry).collection_size(2).build("Car")?;

    // Beans are instantiated, their scalar leaves stay unset
    assert_eq!(car.lookup("engine.capacity"), Some(&Value::Null));
    assert_eq!(car.lookup("engine.horsepower"), Some(&Value::Int32(0)));
    assert_eq!(car.lookup("color"), Some(&Value::Null));
    // Wheels are built; null string tags are dropped
    assert_eq!(car.lookup("wheels").and_then(Value::len), Some(2));
    assert_eq!(car.lookup("wheels[1].diameter"), Some(&Value::Null));
    assert_eq!(car.lookup("tags").and_then(Value::len), Some(0));
    Ok(())
}

#[test]
fn test_null_mode_builds_only_the_root() -> anyhow::Result<()> {
    let registry = car_registry();

    let car = Fixture::null(&registry).build("Car")?;

    assert_eq!(car.as_instance().map(|i| i.type_name()), Some("Car"));
    assert_eq!(car.lookup("engine"), Some(&Value::Null));
    assert_eq!(car.lookup("wheels"), Some(&Value::Null));
    assert_eq!(car.lookup("year"), Some(&Value::Int32(0)));
    Ok(())
}

#[test]
fn test_exclusion_keeps_unset_value_in_every_mode() -> anyhow::Result<()> {
    let registry = car_registry();

    let random = Fixture::random(&registry)
        .exclude_property("Serial")
        .exclude_path("car.engine")
        .build("Car")?;
    assert_eq!(random.lookup("serial"), Some(&Value::Null));
    assert_eq!(random.lookup("engine"), Some(&Value::Null));

    let empty = Fixture::empty(&registry).exclude_path("car.wheels").build("Car")?;
    assert_eq!(empty.lookup("wheels"), Some(&Value::Null));
    Ok(())
}
