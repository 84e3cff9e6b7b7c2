use beanfill::testing::init_logging;
use beanfill::testing::schemas_for_tests::person_registry;
use beanfill::{Fixture, TypeDescriptor, TypeRegistry, Value};

#[test]
fn test_person_siblings_cut_at_second_occurrence() -> anyhow::Result<()> {
    init_logging();
    let registry = person_registry();

    let person = Fixture::random(&registry).collection_size(1).build("Person")?;

    assert_eq!(person.lookup("friends").and_then(Value::len), Some(1));
    assert!(matches!(person.lookup("friends[0].name"), Some(Value::String(_))));
    assert_eq!(person.lookup("friends[0].friends"), Some(&Value::Null));
    assert_eq!(person.lookup("partner.partner"), Some(&Value::Null));
    assert_eq!(person.lookup("partner.friends"), Some(&Value::Null));
    Ok(())
}

#[test]
fn test_mutual_recursion_terminates() -> anyhow::Result<()> {
    let registry = TypeRegistry::new()
        .with(TypeDescriptor::bean("Author").property("books", "List<Book>")?)?
        .with(
            TypeDescriptor::bean("Book")
                .property("title", "string")?
                .property("author", "Author")?,
        )?;

    let author = Fixture::random(&registry).collection_size(2).build("Author")?;

    let books = author.lookup("books").and_then(Value::as_elements).unwrap();
    assert_eq!(books.len(), 2);
    for book in books {
        assert!(matches!(book.lookup("title"), Some(Value::String(_))));
        let nested = book.lookup("author").unwrap();
        let nested_books = nested.lookup("books").and_then(Value::as_elements).unwrap();
        // Author and Book are both on the chain twice by now
        for nested_book in nested_books {
            assert_eq!(nested_book.lookup("author"), Some(&Value::Null));
        }
    }
    Ok(())
}

#[test]
fn test_generic_argument_counts_toward_reentry() -> anyhow::Result<()> {
    let registry = TypeRegistry::new()
        .with(
            TypeDescriptor::bean("Tree")
                .property("label", "i32?")?
                .property("children", "Map<string, Tree>")?,
        )?;

    let tree = Fixture::random(&registry).collection_size(1).build("Tree")?;

    let entries = tree.lookup("children").and_then(Value::as_entries).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].1.lookup("children"), Some(&Value::Null));
    Ok(())
}
