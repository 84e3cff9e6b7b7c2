use beanfill::testing::schemas_for_tests::vehicle_registry;
use beanfill::{Fixture, FixtureError, GeneratorError, Instance, TypeRef, Value, ValueFactory};
use std::collections::BTreeSet;

fn type_name(value: &Value) -> Option<&str> {
    value.as_instance().map(Instance::type_name)
}

#[test]
fn test_single_subtype_binding() -> anyhow::Result<()> {
    let registry = vehicle_registry();

    let garage = Fixture::random(&registry)
        .subtype("Vehicle", TypeRef::named("Truck"))
        .collection_size(2)
        .build("Garage")?;

    assert_eq!(garage.lookup("vehicle").and_then(type_name), Some("Truck"));
    assert!(matches!(garage.lookup("vehicle.payload"), Some(Value::Float64(_))));
    let vehicles = garage.lookup("vehicles").and_then(Value::as_elements).unwrap();
    assert!(vehicles.iter().all(|v| type_name(v) == Some("Truck")));
    Ok(())
}

#[test]
fn test_candidates_are_picked_per_position() -> anyhow::Result<()> {
    let registry = vehicle_registry();

    let garage = Fixture::random(&registry)
        .seed(5)
        .subtypes("Vehicle", [TypeRef::named("Car"), TypeRef::named("Truck")])
        .collection_size(24)
        .build("Garage")?;

    let vehicles = garage.lookup("vehicles").and_then(Value::as_elements).unwrap();
    let seen: BTreeSet<&str> = vehicles.iter().filter_map(type_name).collect();
    assert_eq!(seen, BTreeSet::from(["Car", "Truck"]));
    Ok(())
}

#[test]
fn test_interface_without_binding_fails() {
    let registry = vehicle_registry();

    let result = Fixture::random(&registry).build("Garage");

    assert!(matches!(
        result,
        Err(FixtureError::Generator(GeneratorError::ConstructionFailed { .. }))
    ));
}

#[test]
fn test_supertype_override_supplies_the_value() -> anyhow::Result<()> {
    let registry = vehicle_registry();
    let parked = Instance::new("Car").with_slot("brand", "Tatra");

    let garage = Fixture::random(&registry)
        .with_type(TypeRef::named("Vehicle"), Value::Bean(parked))
        .collection_size(1)
        .build("Garage")?;

    assert_eq!(garage.lookup("vehicle.brand"), Some(&Value::from("Tatra")));
    assert_eq!(garage.lookup("vehicles[0].brand"), Some(&Value::from("Tatra")));
    // The override value is populated like any other
    assert!(matches!(garage.lookup("vehicle.wheels"), Some(Value::Int32(_))));
    Ok(())
}

#[test]
fn test_override_by_factory() -> anyhow::Result<()> {
    let registry = vehicle_registry();
    let wheels = ValueFactory::fixed(6).map(|v| match v {
        Value::Int32(n) => Value::Int32(n * 3),
        other => other,
    });

    let garage = Fixture::random(&registry)
        .subtype("Vehicle", TypeRef::named("Truck"))
        .property("wheels", wheels)
        .build("Garage")?;

    assert_eq!(garage.lookup("vehicle.wheels"), Some(&Value::Int32(18)));
    Ok(())
}
