use beanfill::testing::schemas_for_tests::{car_registry, vehicle_registry};
use beanfill::{Fixture, FixtureError, GeneratorError, Instance, Profile, Value};
use rust_decimal::Decimal;
use std::io::Write;

const CAR_PROFILE: &str = r#"
seed: 99
collection_size: { min: 2, max: 2 }
sizes:
  properties:
    wheels: { min: 4, max: 4 }
exclude:
  properties: [mileage]
paths:
  car.engine.capacity: { type: decimal_range, min: 1.0, max: 2.0 }
properties:
  diameter: { type: int_range, min: 15, max: 19 }
  serial: { type: pattern, pattern: "CAR-{index}" }
  color: { type: one_of, values: [Red] }
"#;

#[test]
fn test_profile_drives_a_build() -> anyhow::Result<()> {
    let registry = car_registry();
    let profile = Profile::from_yaml(CAR_PROFILE)?;

    let car = Fixture::random(&registry).profile(&profile).build("Car")?;

    assert_eq!(car.lookup("serial"), Some(&Value::from("CAR-0")));
    assert_eq!(car.lookup("wheels").and_then(Value::len), Some(4));
    assert_eq!(car.lookup("mileage"), Some(&Value::Null));
    for i in 0..4 {
        let diameter = car
            .lookup(&format!("wheels[{i}].diameter"))
            .and_then(Value::as_i32)
            .unwrap();
        assert!((15..=19).contains(&diameter));
    }
    let capacity = car.lookup("engine.capacity").and_then(Value::as_decimal).unwrap();
    assert!(capacity >= Decimal::ONE && capacity <= Decimal::TWO);
    Ok(())
}

#[test]
fn test_enum_constants_by_name() -> anyhow::Result<()> {
    let registry = car_registry();
    let profile = Profile::from_yaml(CAR_PROFILE)?;

    let car = Fixture::random(&registry).profile(&profile).build("Car")?;
    assert_eq!(
        car.lookup("color"),
        Some(&Value::Enum {
            type_name: "Color".to_string(),
            constant: "Red".to_string(),
        })
    );

    let unknown = Profile::from_yaml("properties: { color: { type: static, value: Purple } }")?;
    let result = Fixture::random(&registry).profile(&unknown).build("Car");
    assert!(matches!(
        result,
        Err(FixtureError::Generator(GeneratorError::PropertyAssignment { .. }))
    ));
    Ok(())
}

#[test]
fn test_profile_subtypes_and_mode() -> anyhow::Result<()> {
    let registry = vehicle_registry();
    let profile = Profile::from_yaml(
        r#"
mode: empty
subtypes:
  Vehicle: [Car]
"#,
    )?;

    let garage = Fixture::random(&registry)
        .collection_size(1)
        .profile(&profile)
        .build("Garage")?;

    assert_eq!(
        garage.lookup("vehicle").and_then(Value::as_instance).map(Instance::type_name),
        Some("Car")
    );
    assert_eq!(garage.lookup("vehicle.brand"), Some(&Value::Null));
    Ok(())
}

#[test]
fn test_profile_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(CAR_PROFILE.as_bytes())?;

    let profile = Profile::from_file(file.path())?;
    assert_eq!(profile.seed, Some(99));
    assert_eq!(profile.properties.len(), 3);
    Ok(())
}
