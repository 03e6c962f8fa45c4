//! Stable identifiers for catalog items.
//!
//! The catalog's own volume id is preferred. Items without one fall back to
//! ISBN-13, then ISBN-10, then the title with all whitespace stripped.

use crate::domain::{CatalogItem, IdentifierType};

/// Derive the library id for a catalog item.
///
/// Empty native ids and empty identifier values count as absent. An empty
/// title yields an empty id, which is still a valid key for dedup.
pub fn resolve_id(item: &CatalogItem) -> String {
    if let Some(id) = item.id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let info = &item.volume_info;

    find_identifier(item, IdentifierType::Isbn13)
        .or_else(|| find_identifier(item, IdentifierType::Isbn10))
        .map(str::to_string)
        .unwrap_or_else(|| strip_whitespace(&info.title))
}

fn find_identifier(item: &CatalogItem, kind: IdentifierType) -> Option<&str> {
    item.volume_info
        .industry_identifiers
        .as_deref()?
        .iter()
        .find(|i| i.kind == kind && !i.identifier.is_empty())
        .map(|i| i.identifier.as_str())
}

fn strip_whitespace(title: &str) -> String {
    title.chars().filter(|c| !c.is_whitespace()).collect()
}
