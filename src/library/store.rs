//! The persisted collection of saved books.
//!
//! The whole collection lives in memory and is written back to its storage
//! slot as a single JSON array after every mutation. Loading is lenient:
//! documents written by older front ends are mapped onto the current shape,
//! and anything unreadable is treated as an empty library.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::storage::{Storage, StorageError};
use crate::domain::{BookDefaults, Category, SavedBook};

/// Storage key the library document lives under
pub const LIBRARY_STORAGE_KEY: &str = "myBookLibrary";

/// Errors that can occur while persisting the library
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of [`LibraryStore::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The book was appended and persisted
    Added,

    /// A book with the same id is already saved; nothing changed
    AlreadyExists,
}

/// Result of a mutation that targets an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Mutation {
    Applied,
    NotFound,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Books grouped by category, every category present
pub type CategoryGroups<'a> = BTreeMap<Category, Vec<&'a SavedBook>>;

/// Owner of the persisted library collection
#[derive(Debug)]
pub struct LibraryStore<S: Storage> {
    storage: S,
    key: String,
    books: Vec<SavedBook>,
}

impl<S: Storage> LibraryStore<S> {
    /// Open the library stored under [`LIBRARY_STORAGE_KEY`]
    pub fn open(storage: S) -> Result<Self, LibraryError> {
        Self::open_with_key(storage, LIBRARY_STORAGE_KEY)
    }

    /// Open the library stored under `key`
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Result<Self, LibraryError> {
        Self::open_with_defaults(storage, key, &BookDefaults::default())
    }

    /// Open the library, filling fields missing from older documents with `defaults`
    ///
    /// A missing slot or malformed document yields an empty library. Only a
    /// failure to read the storage medium itself is an error.
    pub fn open_with_defaults(
        storage: S,
        key: impl Into<String>,
        defaults: &BookDefaults,
    ) -> Result<Self, LibraryError> {
        let key = key.into();
        let books = match storage.read(&key)? {
            Some(document) => parse_document(&document, defaults),
            None => {
                debug!(key = %key, "no persisted library, starting empty");
                Vec::new()
            }
        };

        debug!(key = %key, count = books.len(), "library loaded");

        Ok(Self {
            storage,
            key,
            books,
        })
    }

    /// All saved books in insertion order
    pub fn list(&self) -> &[SavedBook] {
        &self.books
    }

    /// Whether a book with `id` is saved
    pub fn contains(&self, id: &str) -> bool {
        self.books.iter().any(|b| b.id == id)
    }

    /// Get a saved book by id
    pub fn get(&self, id: &str) -> Option<&SavedBook> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Save a book unless its id is already present
    pub fn add(&mut self, book: SavedBook) -> Result<AddOutcome, LibraryError> {
        if self.contains(&book.id) {
            debug!(id = %book.id, "book already in library");
            return Ok(AddOutcome::AlreadyExists);
        }

        info!(id = %book.id, title = %book.title, category = %book.category, "adding book");
        self.books.push(book);
        self.persist()?;

        Ok(AddOutcome::Added)
    }

    /// Remove the book with `id`
    ///
    /// The collection is rewritten even when nothing matched.
    pub fn remove(&mut self, id: &str) -> Result<Mutation, LibraryError> {
        let outcome = match self.books.iter().position(|b| b.id == id) {
            Some(pos) => {
                let removed = self.books.remove(pos);
                info!(id = %removed.id, title = %removed.title, "removed book");
                Mutation::Applied
            }
            None => {
                debug!(id = %id, "remove: book not found");
                Mutation::NotFound
            }
        };

        self.persist()?;
        Ok(outcome)
    }

    /// Move the book with `id` to `category`
    pub fn set_category(&mut self, id: &str, category: Category) -> Result<Mutation, LibraryError> {
        let Some(book) = self.books.iter_mut().find(|b| b.id == id) else {
            debug!(id = %id, "set_category: book not found");
            return Ok(Mutation::NotFound);
        };

        info!(id = %id, from = %book.category, to = %category, "moving book");
        book.category = category;
        self.persist()?;

        Ok(Mutation::Applied)
    }

    /// Group books by category, preserving insertion order within each group
    pub fn group_by_category(&self) -> CategoryGroups<'_> {
        let mut groups: CategoryGroups<'_> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

        for book in &self.books {
            groups.entry(book.category).or_default().push(book);
        }

        groups
    }

    /// Number of saved books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the library is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Storage key of this library
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning its storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Serialize the full collection and replace the stored document
    fn persist(&mut self) -> Result<(), LibraryError> {
        let document = serde_json::to_string_pretty(&self.books)?;
        self.storage.write(&self.key, &document)?;

        debug!(key = %self.key, count = self.books.len(), "library persisted");
        Ok(())
    }
}

/// A book as it may appear in a persisted document, old formats included
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBook {
    id: String,
    title: String,
    #[serde(default)]
    authors: Option<StoredAuthors>,
    #[serde(default)]
    cover_url: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    category: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredAuthors {
    List(Vec<String>),
    Joined(String),
}

impl StoredBook {
    fn into_saved(self, defaults: &BookDefaults) -> SavedBook {
        let authors: Vec<String> = match self.authors {
            Some(StoredAuthors::List(list)) => list
                .into_iter()
                .filter(|a| !a.trim().is_empty())
                .collect(),
            Some(StoredAuthors::Joined(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };
        let authors = if authors.is_empty() {
            vec![defaults.author.clone()]
        } else {
            authors
        };

        // Older documents used `thumbnail`; `coverUrl` wins when both are present
        let cover_url = self
            .cover_url
            .filter(|url| !url.is_empty())
            .or(self.thumbnail.filter(|url| !url.is_empty()))
            .unwrap_or_else(|| defaults.cover_url.clone());

        let category = match &self.category {
            Some(serde_json::Value::String(label)) => label.parse().unwrap_or_else(|_| {
                warn!(id = %self.id, category = %label, "unknown category, defaulting to To Read");
                Category::ToRead
            }),
            Some(other) => {
                warn!(id = %self.id, category = %other, "invalid category, defaulting to To Read");
                Category::ToRead
            }
            None => Category::ToRead,
        };

        SavedBook {
            id: self.id,
            title: self.title,
            authors,
            cover_url,
            category,
            description: self.description,
        }
    }
}

/// Parse a persisted library document, skipping anything unreadable
fn parse_document(document: &str, defaults: &BookDefaults) -> Vec<SavedBook> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(document) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(serde_json::Value::Null) => return Vec::new(),
        Ok(_) => {
            warn!("persisted library is not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "persisted library is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut books = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let stored: StoredBook = match serde_json::from_value(entry) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable library entry");
                continue;
            }
        };

        if !seen.insert(stored.id.clone()) {
            warn!(id = %stored.id, "skipping duplicate library entry");
            continue;
        }

        books.push(stored.into_saved(defaults));
    }

    books
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::storage::MemoryStorage;

    fn dune() -> SavedBook {
        SavedBook::new("b1", "Dune", ["Frank Herbert"], "http://covers/dune.jpg")
    }

    fn open(document: &str) -> LibraryStore<MemoryStorage> {
        let storage = MemoryStorage::new().with_slot(LIBRARY_STORAGE_KEY, document);
        LibraryStore::open(storage).unwrap()
    }

    #[test]
    fn test_add_persists_collection() {
        let mut store = LibraryStore::open(MemoryStorage::new()).unwrap();

        assert_eq!(store.add(dune()).unwrap(), AddOutcome::Added);

        let raw = store.storage().slot(LIBRARY_STORAGE_KEY).unwrap();
        assert!(raw.contains("\"coverUrl\""));
        assert!(raw.contains("\"toRead\""));
    }

    #[test]
    fn test_duplicate_add_does_not_write() {
        let mut store = open("[]");
        let _ = store.add(dune()).unwrap();

        let before = store.storage().slot(LIBRARY_STORAGE_KEY).unwrap().to_string();
        let renamed = SavedBook {
            title: "Dune (Deluxe)".to_string(),
            ..dune()
        };

        assert_eq!(store.add(renamed).unwrap(), AddOutcome::AlreadyExists);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b1").unwrap().title, "Dune");
        assert_eq!(store.storage().slot(LIBRARY_STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_remove_missing_still_persists() {
        let mut store = LibraryStore::open(MemoryStorage::new()).unwrap();

        assert_eq!(store.remove("nope").unwrap(), Mutation::NotFound);
        assert_eq!(store.storage().slot(LIBRARY_STORAGE_KEY), Some("[]"));
    }

    #[test]
    fn test_set_category_missing_is_not_found() {
        let mut store = LibraryStore::open(MemoryStorage::new()).unwrap();

        assert_eq!(
            store.set_category("nope", Category::Reading).unwrap(),
            Mutation::NotFound
        );
        assert!(store.storage().slot(LIBRARY_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_group_by_category_has_every_key() {
        let store = LibraryStore::open(MemoryStorage::new()).unwrap();
        let groups = store.group_by_category();

        assert_eq!(groups.len(), 3);
        assert!(groups.values().all(Vec::is_empty));
    }

    #[test]
    fn test_load_class_based_document() {
        // Authors were stored pre-joined and categories as camelCase keys
        let store = open(
            r#"[{"id":"vol1","title":"Dune","authors":"Frank Herbert, Brian Herbert",
                "coverUrl":"http://c/1","category":"completed"}]"#,
        );

        let book = store.get("vol1").unwrap();
        assert_eq!(book.authors, vec!["Frank Herbert", "Brian Herbert"]);
        assert_eq!(book.cover_url, "http://c/1");
        assert_eq!(book.category, Category::Completed);
        assert!(book.description.is_none());
    }

    #[test]
    fn test_load_script_based_document() {
        let store = open(
            r#"[{"id":"9780441013593","title":"Dune","authors":["Frank Herbert"],
                "thumbnail":"http://c/2","category":"Finished",
                "description":"No description available."},
               {"id":"Emma","title":"Emma","authors":["Jane Austen"],
                "thumbnail":"http://c/3","category":"To Read"}]"#,
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("9780441013593").unwrap().category, Category::Completed);
        assert_eq!(store.get("9780441013593").unwrap().cover_url, "http://c/2");
        assert_eq!(store.get("Emma").unwrap().category, Category::ToRead);
    }

    #[test]
    fn test_unknown_category_defaults_to_read() {
        let store = open(
            r#"[{"id":"a","title":"A","category":"abandoned"},
               {"id":"b","title":"B","category":7},
               {"id":"c","title":"C"}]"#,
        );

        assert!(store.list().iter().all(|b| b.category == Category::ToRead));
        assert_eq!(store.get("c").unwrap().authors, vec!["Unknown Author"]);
        assert_eq!(store.get("c").unwrap().cover_url, BookDefaults::default().cover_url);
    }

    #[test]
    fn test_empty_authors_list_gets_default_author() {
        let store = open(
            r#"[{"id":"a","title":"A","authors":[]},
               {"id":"b","title":"B","authors":["", "  "]},
               {"id":"c","title":"C","authors":""}]"#,
        );

        assert_eq!(store.len(), 3);
        assert!(store
            .list()
            .iter()
            .all(|b| b.authors == vec!["Unknown Author".to_string()]));
    }

    #[test]
    fn test_cover_url_and_thumbnail_both_present() {
        let store = open(
            r#"[{"id":"a","title":"A","coverUrl":"http://c/new","thumbnail":"http://c/old"},
               {"id":"b","title":"B","coverUrl":"","thumbnail":"http://c/old"}]"#,
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().cover_url, "http://c/new");
        assert_eq!(store.get("b").unwrap().cover_url, "http://c/old");
    }

    #[test]
    fn test_unreadable_entries_skipped() {
        let store = open(
            r#"[{"title":"No id"}, 42, {"id":"ok","title":"Fine"}, {"id":"ok","title":"Dup"}]"#,
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ok").unwrap().title, "Fine");
    }

    #[test]
    fn test_malformed_document_is_empty() {
        assert!(open("{not json").is_empty());
        assert!(open(r#"{"id":"b1"}"#).is_empty());
        assert!(open("null").is_empty());
        assert!(open("").is_empty());
    }

    #[test]
    fn test_malformed_document_left_until_mutation() {
        let store = open("{not json");
        assert_eq!(
            store.storage().slot(LIBRARY_STORAGE_KEY),
            Some("{not json")
        );
    }
}
