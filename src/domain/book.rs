//! Saved book records and reading-status categories.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogItem, ImageLinks};
use crate::library::identity::resolve_id;

/// Reading status of a saved book
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Saved but not started
    #[default]
    #[serde(alias = "To Read", alias = "to_read")]
    ToRead,

    /// Currently being read
    #[serde(alias = "Reading")]
    Reading,

    /// Finished reading
    #[serde(alias = "Completed", alias = "finished", alias = "Finished")]
    Completed,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [Category::ToRead, Category::Reading, Category::Completed];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::ToRead => "To Read",
            Category::Reading => "Reading",
            Category::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "toread" => Ok(Category::ToRead),
            "reading" => Ok(Category::Reading),
            "completed" | "finished" => Ok(Category::Completed),
            _ => anyhow::bail!("Unknown category: {}", s),
        }
    }
}

/// Placeholder values used when a catalog item lacks metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDefaults {
    pub author: String,
    pub cover_url: String,
    pub description: String,
}

impl Default for BookDefaults {
    fn default() -> Self {
        Self {
            author: "Unknown Author".to_string(),
            cover_url: "https://via.placeholder.com/128x192?text=No+Cover".to_string(),
            description: "No description available.".to_string(),
        }
    }
}

/// A book saved into the personal library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBook {
    /// Library-unique identifier (see [`resolve_id`])
    pub id: String,

    /// Book title
    pub title: String,

    /// Authors in catalog order
    pub authors: Vec<String>,

    /// Cover image URL
    #[serde(alias = "thumbnail")]
    pub cover_url: String,

    /// Reading status
    #[serde(default)]
    pub category: Category,

    /// Catalog description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SavedBook {
    /// Create a book in the To Read category
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        authors: impl IntoIterator<Item = impl Into<String>>,
        cover_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: authors.into_iter().map(Into::into).collect(),
            cover_url: cover_url.into(),
            category: Category::ToRead,
            description: None,
        }
    }

    /// Build a saved book from a catalog search result
    pub fn from_catalog_item(item: &CatalogItem, defaults: &BookDefaults) -> Self {
        let info = &item.volume_info;

        let authors = match &info.authors {
            Some(authors) if !authors.is_empty() => authors.clone(),
            _ => vec![defaults.author.clone()],
        };

        let cover_url = info
            .image_links
            .as_ref()
            .and_then(ImageLinks::cover)
            .map_or_else(|| defaults.cover_url.clone(), str::to_string);

        let description = info
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| defaults.description.clone());

        Self {
            id: resolve_id(item),
            title: info.title.clone(),
            authors,
            cover_url,
            category: Category::ToRead,
            description: Some(description),
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Authors joined for display
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}
