//! Library Store Integration Tests
//!
//! Tests for dedup on save, category transitions, removal, and grouping.

use shelf::domain::{Category, SavedBook};
use shelf::library::{AddOutcome, CategoryGroups, LibraryStore, MemoryStorage, Mutation};

fn book(id: &str, title: &str) -> SavedBook {
    SavedBook::new(id, title, ["Someone"], "http://covers/placeholder")
}

fn ids<'a>(groups: &'a CategoryGroups<'_>, category: Category) -> Vec<&'a str> {
    groups[&category].iter().map(|b| b.id.as_str()).collect()
}

fn empty_store() -> LibraryStore<MemoryStorage> {
    LibraryStore::open(MemoryStorage::new()).unwrap()
}

#[test]
fn test_add_to_empty_library() {
    let mut store = empty_store();

    let dune = SavedBook::new("b1", "Dune", ["Frank Herbert"], "http://covers/dune.jpg");
    assert_eq!(store.add(dune).unwrap(), AddOutcome::Added);

    let books = store.list();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, "b1");
    assert_eq!(books[0].category, Category::ToRead);
    assert!(store.contains("b1"));
}

#[test]
fn test_add_twice_keeps_one_entry() {
    let mut store = empty_store();

    assert_eq!(store.add(book("b1", "Dune")).unwrap(), AddOutcome::Added);
    let len_after_first = store.list().len();

    assert_eq!(
        store.add(book("b1", "Dune")).unwrap(),
        AddOutcome::AlreadyExists
    );
    assert_eq!(store.list().len(), len_after_first);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_empty_id_is_a_valid_key() {
    let mut store = empty_store();

    assert_eq!(store.add(book("", "   ")).unwrap(), AddOutcome::Added);
    assert!(store.contains(""));
    assert_eq!(store.add(book("", "")).unwrap(), AddOutcome::AlreadyExists);
}

#[test]
fn test_set_category_moves_between_groups() {
    let mut store = empty_store();
    let _ = store.add(book("b1", "Dune")).unwrap();

    assert_eq!(
        store.set_category("b1", Category::Reading).unwrap(),
        Mutation::Applied
    );

    let groups = store.group_by_category();
    assert!(groups[&Category::Reading].iter().any(|b| b.id == "b1"));
    assert!(!groups[&Category::ToRead].iter().any(|b| b.id == "b1"));
    assert!(!groups[&Category::Completed].iter().any(|b| b.id == "b1"));
}

#[test]
fn test_set_category_leaves_other_fields() {
    let mut store = empty_store();
    let original = book("b1", "Dune").with_description("Spice.");
    let _ = store.add(original.clone()).unwrap();

    let _ = store.set_category("b1", Category::Completed).unwrap();

    let moved = store.get("b1").unwrap();
    assert_eq!(moved.category, Category::Completed);
    assert_eq!(
        SavedBook {
            category: original.category,
            ..moved.clone()
        },
        original
    );
}

#[test]
fn test_set_category_unknown_id() {
    let mut store = empty_store();
    let _ = store.add(book("b1", "Dune")).unwrap();

    let outcome = store.set_category("b2", Category::Reading).unwrap();
    assert_eq!(outcome, Mutation::NotFound);
    assert!(!outcome.is_applied());
    assert_eq!(store.get("b1").unwrap().category, Category::ToRead);
}

#[test]
fn test_remove_present_and_absent() {
    let mut store = empty_store();
    let _ = store.add(book("b1", "Dune")).unwrap();
    let _ = store.add(book("b2", "Emma")).unwrap();

    assert_eq!(store.remove("b1").unwrap(), Mutation::Applied);
    assert!(!store.contains("b1"));
    assert_eq!(store.len(), 1);

    assert_eq!(store.remove("b1").unwrap(), Mutation::NotFound);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_group_by_category_preserves_order() {
    let mut store = empty_store();
    for (id, title) in [("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")] {
        let _ = store.add(book(id, title)).unwrap();
    }
    let _ = store.set_category("b", Category::Reading).unwrap();
    let _ = store.set_category("d", Category::Reading).unwrap();

    let groups = store.group_by_category();

    assert_eq!(ids(&groups, Category::ToRead), vec!["a", "c"]);
    assert_eq!(ids(&groups, Category::Reading), vec!["b", "d"]);
    assert!(ids(&groups, Category::Completed).is_empty());
}

#[test]
fn test_mutations_survive_reopen() {
    let mut store = empty_store();
    let _ = store.add(book("b1", "Dune")).unwrap();
    let _ = store.add(book("b2", "Emma")).unwrap();
    let _ = store.set_category("b2", Category::Completed).unwrap();
    let _ = store.remove("b1").unwrap();

    let expected = store.list().to_vec();
    let reopened = LibraryStore::open(store.into_storage()).unwrap();

    assert_eq!(reopened.list(), expected.as_slice());
    assert_eq!(reopened.get("b2").unwrap().category, Category::Completed);
}
