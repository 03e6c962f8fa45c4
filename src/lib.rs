//! shelf - Personal book library manager
//!
//! Searches the Google Books catalog and keeps a personal library of saved
//! books organized by reading status.
//!
//! # Architecture
//!
//! The library is a single JSON document in a key-value slot:
//! - The whole collection is loaded once when the store opens
//! - Every mutation rewrites the whole document
//! - Unreadable documents are treated as an empty library
//!
//! # Modules
//!
//! - `adapters`: Book catalog integrations (Google Books)
//! - `library`: Identity resolution, storage, and the library store
//! - `domain`: Data structures (CatalogItem, SavedBook, Category)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Search and save a result
//! shelf search "dune" --save 9780441013593
//!
//! # Show the library
//! shelf list
//!
//! # Start reading
//! shelf move 9780441013593 reading
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{CatalogSearch, GoogleBooksClient, SearchError, SearchQuery};
pub use domain::{BookDefaults, CatalogItem, Category, SavedBook};
pub use library::{
    resolve_id, AddOutcome, FileStorage, LibraryError, LibraryStore, MemoryStorage, Mutation,
    Storage,
};
