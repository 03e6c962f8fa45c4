//! Google Books `volumes` search adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{CatalogSearch, SearchError, SearchQuery};
use crate::config::{CatalogSettings, DEFAULT_API_URL};
use crate::domain::CatalogItem;

/// Google Books API client
pub struct GoogleBooksClient {
    /// Volumes endpoint
    api_url: String,
    /// Optional `maxResults` parameter
    max_results: Option<u32>,
    /// HTTP client
    client: reqwest::Client,
}

/// Search response body
#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<CatalogItem>>,
}

/// Error response body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl Default for GoogleBooksClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(30))
    }
}

impl GoogleBooksClient {
    /// Create a client for `api_url` with a request timeout
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });

        Self {
            api_url: api_url.into(),
            max_results: None,
            client,
        }
    }

    /// Create from config
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let mut client = Self::new(settings.api_url.clone(), settings.timeout());
        client.max_results = settings.max_results;
        client
    }

    /// Build the request URL for a query
    fn search_url(&self, query: &SearchQuery) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.api_url).map_err(|e| SearchError::Api {
            status: 0,
            message: format!("invalid API URL {}: {}", self.api_url, e),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &query.to_q());
            if let Some(max) = self.max_results {
                pairs.append_pair("maxResults", &max.to_string());
            }
        }

        Ok(url)
    }
}

/// Decode a successful response body
fn parse_volumes(body: &str) -> Result<Vec<CatalogItem>, SearchError> {
    let response: VolumesResponse = serde_json::from_str(body)?;
    Ok(response.items.unwrap_or_default())
}

/// Extract the most useful message from an error response body
fn api_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl CatalogSearch for GoogleBooksClient {
    fn name(&self) -> &str {
        "google-books"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, SearchError> {
        let url = self.search_url(query)?;
        debug!(url = %url, "searching catalog");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("request failed");
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: api_error_message(&body, reason),
            });
        }

        let items = parse_volumes(&body)?;
        debug!(count = items.len(), "catalog search complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let client = GoogleBooksClient::default();
        let query = SearchQuery::new(Some("the hobbit"), Some("fantasy")).unwrap();

        let url = client.search_url(&query).unwrap();
        assert_eq!(url.host_str(), Some("www.googleapis.com"));
        assert_eq!(url.path(), "/books/v1/volumes");

        let q: Vec<_> = url.query_pairs().collect();
        assert_eq!(q.len(), 1);
        assert_eq!(q[0].0, "q");
        assert_eq!(q[0].1, "the hobbit subject:fantasy");
    }

    #[test]
    fn test_search_url_with_max_results() {
        let settings = CatalogSettings {
            api_url: "http://localhost:8080/volumes".to_string(),
            timeout_seconds: 1,
            max_results: Some(40),
        };
        let client = GoogleBooksClient::from_settings(&settings);
        let query = SearchQuery::new(Some("dune"), None).unwrap();

        let url = client.search_url(&query).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/volumes?q=dune&maxResults=40");
    }

    #[test]
    fn test_invalid_api_url() {
        let client = GoogleBooksClient::new("not a url", Duration::from_secs(1));
        let query = SearchQuery::new(Some("dune"), None).unwrap();

        assert!(matches!(
            client.search_url(&query),
            Err(SearchError::Api { status: 0, .. })
        ));
    }

    #[test]
    fn test_parse_volumes() {
        let body = r#"{
            "kind": "books#volumes",
            "totalItems": 1,
            "items": [{"id": "abc", "volumeInfo": {"title": "Dune"}}]
        }"#;

        let items = parse_volumes(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_volumes_without_items() {
        let items = parse_volumes(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_volumes_rejects_garbage() {
        assert!(matches!(parse_volumes("<html>"), Err(SearchError::Decode(_))));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "Missing query."}}"#;
        assert_eq!(api_error_message(body, "Bad Request"), "Missing query.");
        assert_eq!(api_error_message("oops", "Bad Request"), "Bad Request");
    }
}
