//! Catalog search result shapes.
//!
//! These mirror the Google Books `volumes` resource closely enough to be
//! deserialized straight from the API response. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A single search result from the book catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Native catalog identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Bibliographic metadata
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub small_thumbnail: Option<String>,
}

impl ImageLinks {
    /// Best available cover: `thumbnail`, else `smallThumbnail`
    pub fn cover(&self) -> Option<&str> {
        [&self.thumbnail, &self.small_thumbnail]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

/// A typed identifier pair such as an ISBN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: IdentifierType,
    pub identifier: String,
}

impl IndustryIdentifier {
    pub fn isbn_13(identifier: impl Into<String>) -> Self {
        Self {
            kind: IdentifierType::Isbn13,
            identifier: identifier.into(),
        }
    }

    pub fn isbn_10(identifier: impl Into<String>) -> Self {
        Self {
            kind: IdentifierType::Isbn10,
            identifier: identifier.into(),
        }
    }
}

/// Identifier scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierType {
    #[serde(rename = "ISBN_13")]
    Isbn13,

    #[serde(rename = "ISBN_10")]
    Isbn10,

    /// ISSN, OTHER, and anything the catalog adds later
    #[serde(other)]
    Other,
}
