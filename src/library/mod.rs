//! Personal library management for saved books.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.shelf/
//! ├── config.yaml               # Optional, found by searching up from the cwd
//! └── myBookLibrary.json        # The whole library as one JSON array
//! ```
//!
//! The library document is read once when a [`LibraryStore`] is opened and
//! rewritten in full after every mutation.

pub mod identity;
pub mod storage;
pub mod store;

pub use identity::resolve_id;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{
    AddOutcome, CategoryGroups, LibraryError, LibraryStore, Mutation, LIBRARY_STORAGE_KEY,
};
