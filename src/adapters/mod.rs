//! Adapter interfaces for external book catalogs.
//!
//! Adapters turn a [`SearchQuery`] into raw [`CatalogItem`]s. They own the
//! transport entirely; the library only consumes the item shape.

pub mod google_books;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::CatalogItem;

// Re-export the Google Books adapter
pub use google_books::GoogleBooksClient;

/// Errors from catalog searches
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Please enter a search term or select a genre.")]
    EmptyQuery,

    #[error("Please enter a valid search query.")]
    BlankQuery,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A validated catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: Option<String>,
    genre: Option<String>,
}

impl SearchQuery {
    /// Build a query from free text and/or a genre (subject)
    ///
    /// At least one must be given, and text that is only whitespace is
    /// rejected rather than silently dropped.
    pub fn new(text: Option<&str>, genre: Option<&str>) -> Result<Self, SearchError> {
        let genre = genre.map(str::trim).filter(|g| !g.is_empty());

        let text = match text {
            Some(t) if t.is_empty() => None,
            Some(t) if t.trim().is_empty() => return Err(SearchError::BlankQuery),
            Some(t) => Some(t.trim()),
            None => None,
        };

        if text.is_none() && genre.is_none() {
            return Err(SearchError::EmptyQuery);
        }

        Ok(Self {
            text: text.map(str::to_string),
            genre: genre.map(str::to_string),
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// The catalog's `q` parameter: text, then `subject:<genre>`
    pub fn to_q(&self) -> String {
        let subject = self.genre.as_ref().map(|g| format!("subject:{}", g));

        [self.text.clone(), subject]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Trait for book catalog backends
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Human-readable catalog name
    fn name(&self) -> &str;

    /// Run a search and return the raw result items
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, SearchError>;
}
