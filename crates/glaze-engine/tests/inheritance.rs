use glaze_engine::*;
use glaze_testing::assertions::{assert_field_order, nested};
use glaze_testing::fixtures::employee;
use std::sync::Arc;

/// Appends `step` to the manual `trace` field.
fn record_step(presenter: &mut Hydration<'_>, step: &str) -> Result<()> {
    let mut steps = presenter
        .get("trace")?
        .as_list()
        .map(<[Value]>::to_vec)
        .unwrap_or_default();
    steps.push(Value::from(step));
    presenter.set("trace", steps)
}

fn layered_registry() -> Arc<Registry> {
    Registry::builder()
        .register(
            ClassBuilder::new("Root")
                .fields(["trace"], Resolver::new().manual())
                .unwrap()
                .fields(["id", "name"], Resolver::new())
                .unwrap()
                .hydrate(|p| record_step(p, "root 1"))
                .hydrate(|p| record_step(p, "root 2")),
        )
        .unwrap()
        .register(
            ClassBuilder::new("Middle")
                .extends("Root")
                .fields(["title"], Resolver::new().null_alias("none"))
                .unwrap()
                .fields(["name"], Resolver::new().transform_with("shout"))
                .unwrap()
                .transform("shout", |_, value| {
                    Ok(value.as_str().map(str::to_uppercase).into())
                })
                .hydrate(|p| record_step(p, "middle")),
        )
        .unwrap()
        .register(
            ClassBuilder::new("Leaf")
                .extends("Middle")
                .fields(["badge"], Resolver::new().method())
                .unwrap()
                .fields(["id"], Resolver::new().mask().mask_len(1))
                .unwrap()
                .method("badge", |p| {
                    let id = p.source().member("id").unwrap_or_default();
                    Ok(Value::from(format!("#{}", id)))
                })
                .hydrate(|p| record_step(p, "leaf")),
        )
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_redeclared_fields_keep_inherited_position_across_levels() {
    let registry = layered_registry();
    let presenter = registry
        .present("Leaf", employee(42, "ada"), &Options::default())
        .unwrap();

    assert_field_order(&presenter, &["trace", "id", "name", "title", "badge"]).unwrap();
    assert_eq!(presenter["id"], Value::from("X2"));
    assert_eq!(presenter["name"], Value::from("ADA"));
    assert_eq!(presenter["title"], Value::from("none"));
    assert_eq!(presenter["badge"], Value::from("#42"));
}

#[test]
fn test_hydrations_run_ancestor_first_in_declaration_order() {
    let registry = layered_registry();
    let presenter = registry
        .present("Leaf", employee(1, "ada"), &Options::default())
        .unwrap();

    assert_eq!(
        presenter["trace"],
        Value::from(vec!["root 1", "root 2", "middle", "leaf"])
    );
}

#[test]
fn test_parent_presents_without_subclass_declarations() {
    let registry = layered_registry();
    let presenter = registry
        .present("Root", employee(1, "ada"), &Options::default())
        .unwrap();

    assert_field_order(&presenter, &["trace", "id", "name"]).unwrap();
    assert_eq!(presenter["trace"], Value::from(vec!["root 1", "root 2"]));
}

#[test]
fn test_hydration_runs_after_every_field_is_resolved() {
    let registry = Registry::builder()
        .register(
            ClassBuilder::new("Snapshot")
                .fields(["seen"], Resolver::new().manual())
                .unwrap()
                .fields(["id", "name"], Resolver::new())
                .unwrap()
                .hydrate(|p| {
                    let seen: Vec<Value> = p
                        .data()
                        .iter()
                        .filter(|(_, value)| !value.is_null())
                        .map(|(key, _)| Value::from(key.as_str()))
                        .collect();
                    p.set("seen", seen)
                }),
        )
        .unwrap()
        .build()
        .unwrap();

    let presenter = registry
        .present("Snapshot", employee(7, "grace"), &Options::default())
        .unwrap();

    assert_eq!(presenter["seen"], Value::from(vec!["id", "name"]));
}

#[test]
fn test_hydration_cannot_set_undeclared_fields() {
    let registry = Registry::builder()
        .register(ClassBuilder::new("Strict").hydrate(|p| p.set("salary", 100)))
        .unwrap()
        .build()
        .unwrap();

    let err = registry
        .present("Strict", employee(1, "x"), &Options::default())
        .expect_err("salary is not declared");

    assert!(matches!(err, Error::UnknownField(ref name) if name == "salary"));
}

#[test]
fn test_hydration_send_reads_and_writes_fields() {
    let registry = Registry::builder()
        .register(
            ClassBuilder::new("Messages")
                .fields(["name"], Resolver::new())
                .unwrap()
                .fields(["greeting"], Resolver::new().manual())
                .unwrap()
                .hydrate(|p| {
                    let name = p.send("name", None)?;
                    p.send("set_greeting", Some(Value::from(format!("hello {}", name))))?;
                    match p.send("set_salary", Some(Value::from(1))) {
                        Err(Error::UnknownField(_)) => Ok(()),
                        other => Err(anyhow::anyhow!("unexpected dispatch: {:?}", other).into()),
                    }
                }),
        )
        .unwrap()
        .build()
        .unwrap();

    let presenter = registry
        .present("Messages", employee(1, "ada"), &Options::default())
        .unwrap();

    assert_eq!(presenter["greeting"], Value::from("hello ada"));
}

#[test]
fn test_hydration_errors_propagate() {
    let registry = Registry::builder()
        .register(
            ClassBuilder::new("Failing")
                .hydrate(|_| Err(anyhow::anyhow!("payroll service unavailable").into())),
        )
        .unwrap()
        .build()
        .unwrap();

    let err = registry
        .present("Failing", employee(1, "x"), &Options::default())
        .expect_err("hydration fails");

    assert!(err.to_string().contains("payroll service unavailable"));
}

fn cyclic_registry() -> Arc<Registry> {
    Registry::builder()
        .register(
            ClassBuilder::new("AuthorPresenter")
                .fields(["name"], Resolver::new())
                .unwrap()
                .fields(["book"], Resolver::new().presented_as("BookPresenter"))
                .unwrap(),
        )
        .unwrap()
        .register(
            ClassBuilder::new("BookPresenter")
                .fields(["title"], Resolver::new())
                .unwrap()
                .fields(["author"], Resolver::new().presented_as("AuthorPresenter"))
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap()
}

/// Builds an author whose book points back at an author with the same book.
fn cyclic_author() -> Record {
    let inner_book = Record::new().with("title", "Dune");
    let inner_author = Record::new()
        .with("name", "Frank")
        .with("book", inner_book.clone().with("author", Record::new().with("name", "Frank")));
    let book = inner_book.with("author", inner_author);
    Record::new().with("name", "Frank").with("book", book)
}

#[test]
fn test_cyclic_graph_terminates_and_breaks_at_own_class() {
    let registry = cyclic_registry();
    let presenter = registry
        .present("AuthorPresenter", cyclic_author(), &Options::default())
        .unwrap();

    let book = nested(&presenter, "book").unwrap();
    assert_eq!(book.get("title"), Some(&Value::from("Dune")));
    assert_eq!(book.get("author"), Some(&Value::Null));
}

#[test]
fn test_cycle_guard_starts_from_nested_class() {
    let registry = cyclic_registry();
    let book = cyclic_author().get("book").cloned().unwrap_or_default();
    let presenter = registry
        .present("BookPresenter", book, &Options::default())
        .unwrap();

    let author = nested(&presenter, "author").unwrap();
    assert_eq!(author.get("name"), Some(&Value::from("Frank")));
    assert_eq!(author.get("book"), Some(&Value::Null));
}

#[test]
fn test_nested_visited_set_is_extended_copy() {
    let registry = cyclic_registry();
    let root = registry
        .present("AuthorPresenter", cyclic_author(), &Options::default())
        .unwrap();

    assert!(root.visited().is_empty());

    let child = Presenter::construct(
        &registry,
        "BookPresenter",
        Value::from(Record::new().with("title", "Dune")),
        Options::default(),
        root.visited().descend(root.class_name(), "BookPresenter"),
    )
    .unwrap();
    let expected: Vec<&str> = vec!["AuthorPresenter", "BookPresenter"];
    assert_eq!(child.visited().iter().collect::<Vec<_>>(), expected);
}
