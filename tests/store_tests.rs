mod support;

use snipsql::store::resolve::{dependencies_for, resolve_dependencies};
use snipsql::{SnippetError, SnippetStore};
use support::{chain_store, diamond_store, names};

#[test]
fn get_on_empty_store_is_not_found() {
    let store = SnippetStore::new();
    let err = store.get("anything").unwrap_err();
    assert!(matches!(err, SnippetError::NotFound));
    assert_eq!(err.to_string(), "No saved SQL");
}

#[test]
fn get_missing_key_suggests_close_match() {
    let mut store = SnippetStore::new();
    store.store("foobar", "SELECT 1", None).unwrap();

    let err = store.get("foo").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#""foo" is not a valid snippet identifier. Did you mean "foobar"?"#
    );
}

#[test]
fn get_missing_key_without_close_match_lists_valid_identifiers() {
    let mut store = SnippetStore::new();
    store.store("orders", "SELECT 1", None).unwrap();
    store.store("customers", "SELECT 2", None).unwrap();

    let err = store.get("zzz").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#""zzz" is not a valid snippet identifier. Valid identifiers are "orders", "customers"."#
    );
}

#[test]
fn hyphenated_names_are_rejected() {
    let mut store = SnippetStore::new();
    for name in ["my-query", "-", "a-b-c", "trailing-"] {
        let err = store.store(name, "SELECT 1", None).unwrap_err();
        assert!(
            matches!(err, SnippetError::InvalidIdentifier { .. }),
            "{name} should be rejected, got {err:?}"
        );
    }
    assert!(store.is_empty());
}

#[test]
fn hyphenated_dependency_is_rejected_with_correction() {
    let mut store = SnippetStore::new();
    let err = store
        .store("ok", "SELECT 1", Some(names(&["bad-dep"])))
        .unwrap_err();
    assert!(err.to_string().contains(r#"Please use "bad_dep" instead"#));
}

#[test]
fn self_dependency_is_rejected() {
    let mut store = SnippetStore::new();
    let err = store
        .store("x", "SELECT * FROM x", Some(names(&["x"])))
        .unwrap_err();
    assert!(matches!(err, SnippetError::SelfDependency { ref name } if name == "x"));
    assert!(store.is_empty());
}

#[test]
fn storing_again_overwrites_silently() {
    let mut store = chain_store();
    store.store("B", "b_b2", None).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.keys().collect::<Vec<_>>(), vec!["C", "B", "A"]);
    assert_eq!(dependencies_for(&store, "A").unwrap(), vec!["B"]);
}

#[test]
fn diamond_dependency_resolves_shared_node_once() {
    let store = diamond_store();
    let order = resolve_dependencies(&store, &names(&["A"])).unwrap();
    assert_eq!(order, vec!["D", "B", "C", "A"]);
}

#[test]
fn dependents_for_reports_transitive_users_in_store_order() {
    let store = diamond_store();
    assert_eq!(store.dependents_for("D").unwrap(), vec!["B", "C", "A"]);
    assert_eq!(store.dependents_for("B").unwrap(), vec!["A"]);
    assert!(store.dependents_for("A").unwrap().is_empty());
}

#[test]
fn cyclic_declarations_are_reported_not_overflowed() {
    let mut store = SnippetStore::new();
    store.store("a", "SELECT * FROM b", Some(names(&["b"]))).unwrap();
    store.store("b", "SELECT * FROM c", Some(names(&["c"]))).unwrap();
    store.store("c", "SELECT * FROM a", Some(names(&["a"]))).unwrap();

    let err = store
        .render("SELECT * FROM a", Some(names(&["a"])))
        .unwrap()
        .render(&store, &false)
        .unwrap_err();
    assert_eq!(err.to_string(), "Cyclic snippet dependency: a -> b -> c -> a");

    assert!(matches!(
        store.dependents_for("a"),
        Err(SnippetError::CyclicDependency { .. })
    ));
}

#[test]
fn infer_dependencies_matches_stored_names_only() {
    let store = support::writers_store();
    let inferred = store.infer_dependencies(
        "SELECT * FROM writers_fav_modern m JOIN writers_fav f ON f.id = m.id JOIN books b ON b.id = m.id",
        None,
    );
    assert_eq!(inferred, vec!["writers_fav", "writers_fav_modern"]);
}

#[test]
fn delete_then_get_suggests_remaining_names() {
    let mut store = support::writers_store();
    store.delete("writers_fav_modern").unwrap();

    let err = store.get("writers_fav_modern").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#""writers_fav_modern" is not a valid snippet identifier. Did you mean "writers_fav"?"#
    );
}
