use beanfill::testing::schemas_for_tests::library_registry;
use beanfill::{
    Fixture, FixtureError, GeneratorError, Invocation, ScalarKind, StubValue, TypeRef, Value,
    ValueFactory,
};

#[test]
fn test_members_resolve_lazily_and_once() -> anyhow::Result<()> {
    let registry = library_registry();
    let repository = Fixture::random(&registry).seed(1).stub("Repository")?;

    assert!(!repository.is_resolved("name"));
    let first = repository.value("name")?.and_then(StubValue::as_value).cloned();
    let second = repository.value("name")?.and_then(StubValue::as_value).cloned();

    assert!(repository.is_resolved("name"));
    assert!(!repository.is_resolved("find"));
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_utility_members_are_delegated() -> anyhow::Result<()> {
    let registry = library_registry();
    let repository = Fixture::random(&registry).stub("Repository")?;

    assert!(matches!(repository.invoke("equals")?, Invocation::Delegated));
    assert!(matches!(repository.invoke("close")?, Invocation::Delegated));
    assert!(repository.value("equals")?.is_none());
    Ok(())
}

#[test]
fn test_nested_beans_are_stubs_and_final_beans_are_built() -> anyhow::Result<()> {
    let registry = library_registry();
    let repository = Fixture::random(&registry).stub("Repository")?;

    let book = repository.value("find")?.and_then(StubValue::as_stub).unwrap();
    assert!(!book.is_resolved("title"));
    assert!(matches!(
        book.value("pages")?.and_then(StubValue::as_value),
        Some(Value::Int32(_))
    ));

    let settings = repository.value("settings")?.and_then(StubValue::as_value).unwrap();
    assert!(matches!(settings.lookup("retries"), Some(Value::Int32(_))));
    assert!(matches!(settings.lookup("endpoint"), Some(Value::String(_))));
    Ok(())
}

#[test]
fn test_fixture_overrides_reach_stubs() -> anyhow::Result<()> {
    let registry = library_registry();
    let repository = Fixture::random(&registry)
        .with_type(TypeRef::Scalar(ScalarKind::String), ValueFactory::fixed("stubbed"))
        .collection_size(2)
        .stub("Repository")?;

    assert_eq!(
        repository.value("name")?.and_then(StubValue::as_value),
        Some(&Value::from("stubbed"))
    );
    let all = repository.value("all")?.unwrap().materialize()?;
    assert_eq!(all.len(), Some(2));
    assert_eq!(all.lookup("[0].title"), Some(&Value::from("stubbed")));
    Ok(())
}

#[test]
fn test_stub_overrides_apply_below_the_stub() -> anyhow::Result<()> {
    let registry = library_registry();
    let repository = Fixture::random(&registry).stub("Repository")?;
    repository.with(TypeRef::Primitive(ScalarKind::Int32), ValueFactory::fixed(300));

    let book = repository.value("find")?.and_then(StubValue::as_stub).unwrap();
    assert_eq!(
        book.value("pages")?.and_then(StubValue::as_value),
        Some(&Value::Int32(300))
    );
    Ok(())
}

#[test]
fn test_reified_page() -> anyhow::Result<()> {
    let registry = library_registry();
    let page_of_books = TypeRef::generic("Page", vec![TypeRef::named("Book")]);

    let page = Fixture::random(&registry)
        .collection_size(3)
        .stub_reified(&page_of_books)?;

    assert_eq!(page.type_ref(), &page_of_books);
    let items = page.value("items")?.and_then(StubValue::elements).unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.as_stub().is_some()));

    let materialized = page.materialize()?;
    assert!(matches!(materialized.lookup("first.title"), Some(Value::String(_))));
    Ok(())
}

#[test]
fn test_stub_failures() {
    let registry = library_registry();

    assert!(matches!(
        Fixture::random(&registry).stub("Settings"),
        Err(FixtureError::Generator(GeneratorError::FinalType(_)))
    ));
    assert!(matches!(
        Fixture::random(&registry).stub("Page"),
        Err(FixtureError::Generator(GeneratorError::UnresolvedGenericType(_)))
    ));
    assert!(matches!(
        Fixture::random(&registry).stub_reified(&TypeRef::named("Book")),
        Err(FixtureError::Generator(GeneratorError::NotGeneric(_)))
    ));
    assert!(matches!(
        Fixture::random(&registry).stub_reified(&TypeRef::named("Page")),
        Err(FixtureError::Generator(GeneratorError::NotGeneric(_)))
    ));
}
