//! Domain types for the book library.
//!
//! - Catalog items: raw search results from the book catalog
//! - Saved books: entries persisted in the personal library

pub mod book;
pub mod catalog;

// Re-export commonly used types
pub use book::{BookDefaults, Category, SavedBook};
pub use catalog::{CatalogItem, IdentifierType, ImageLinks, IndustryIdentifier, VolumeInfo};
