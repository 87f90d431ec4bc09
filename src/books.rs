//! Book search against the Google Books volumes API
//!
//! The whole passage is sent as the free-text query. Only the first few
//! volumes are kept; missing titles and authors get placeholder text.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::BooksConfig;
use crate::util::log_preview;

pub const NO_TITLE: &str = "No title found";
pub const NO_AUTHORS: &str = "No authors found";

/// A volume that may contain the passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMatch {
    pub title: String,
    pub authors: Vec<String>,
}

impl BookMatch {
    /// Authors joined for display
    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Result of a completed search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookSearch {
    /// HTTP 200, at most `max_results` matches (possibly none)
    Found { matches: Vec<BookMatch> },
    /// Any other HTTP status; shown inline, analysis continues
    Failed { status: u16 },
}

/// Errors that prevent a search from completing
#[derive(Debug)]
pub enum BookSearchError {
    /// Connection, timeout or body read failure
    Network(String),
    /// 200 response whose body is not the expected JSON
    Decode(String),
}

impl fmt::Display for BookSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Book search request failed: {}", msg),
            Self::Decode(msg) => write!(f, "Book search returned malformed JSON: {}", msg),
        }
    }
}

impl std::error::Error for BookSearchError {}

// Wire format (only the fields we read)

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize, Default)]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
}

impl From<Volume> for BookMatch {
    fn from(volume: Volume) -> Self {
        let VolumeInfo { title, authors } = volume.volume_info;
        Self {
            title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            authors: authors.unwrap_or_else(|| vec![NO_AUTHORS.to_string()]),
        }
    }
}

/// Client for the volumes endpoint
#[derive(Clone)]
pub struct BookSearchClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    max_results: usize,
}

impl fmt::Debug for BookSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookSearchClient")
            .field("api_url", &self.api_url)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl BookSearchClient {
    pub fn new(client: reqwest::Client, config: &BooksConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            max_results: config.max_results,
        }
    }

    /// Build the shared HTTP client with the configured timeout and pooling
    pub fn http_client(config: &BooksConfig) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
    }

    /// `GET {api_url}?q={passage}&key={api_key}`
    pub async fn search(&self, passage: &str) -> Result<BookSearch, BookSearchError> {
        tracing::debug!(query = %log_preview(passage, 60), "Searching books");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("q", passage), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| BookSearchError::Network(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!("Book search returned HTTP {}", status.as_u16());
            return Ok(BookSearch::Failed {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BookSearchError::Network(e.to_string()))?;
        let parsed: VolumesResponse =
            serde_json::from_str(&body).map_err(|e| BookSearchError::Decode(e.to_string()))?;

        let matches: Vec<BookMatch> = parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .take(self.max_results)
            .map(BookMatch::from)
            .collect();

        tracing::debug!("Book search found {} match(es)", matches.len());
        Ok(BookSearch::Found { matches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/volumes", addr)
    }

    fn client_for(api_url: String) -> BookSearchClient {
        let config = BooksConfig {
            api_url,
            ..BooksConfig::default()
        };
        BookSearchClient::new(reqwest::Client::new(), &config, "test-key")
    }

    #[tokio::test]
    async fn test_truncates_to_three_and_fills_defaults() {
        let body = json!({
            "totalItems": 5,
            "items": [
                { "volumeInfo": { "title": "Moby Dick", "authors": ["Herman Melville"] } },
                { "volumeInfo": { "authors": ["A", "B"] } },
                { "volumeInfo": { "title": "Untitled Authors" } },
                { "volumeInfo": { "title": "Fourth" } },
                { "volumeInfo": { "title": "Fifth" } }
            ]
        });
        let app = Router::new().route("/volumes", get(move || async move { Json(body) }));
        let url = serve(app).await;

        let result = client_for(url).search("Call me Ishmael.").await.unwrap();
        let matches = match result {
            BookSearch::Found { matches } => matches,
            other => panic!("expected matches, got {:?}", other),
        };

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].title, "Moby Dick");
        assert_eq!(matches[0].authors_line(), "Herman Melville");
        assert_eq!(matches[1].title, NO_TITLE);
        assert_eq!(matches[1].authors_line(), "A, B");
        assert_eq!(matches[2].authors, vec![NO_AUTHORS.to_string()]);
    }

    #[tokio::test]
    async fn test_sends_passage_and_key_as_query() {
        let echo = |Query(params): Query<HashMap<String, String>>| async move {
            Json(json!({
                "items": [{ "volumeInfo": {
                    "title": params.get("q").cloned().unwrap_or_default(),
                    "authors": [params.get("key").cloned().unwrap_or_default()]
                }}]
            }))
        };
        let url = serve(Router::new().route("/volumes", get(echo))).await;

        let result = client_for(url).search("a & b = c?").await.unwrap();
        assert_eq!(
            result,
            BookSearch::Found {
                matches: vec![BookMatch {
                    title: "a & b = c?".to_string(),
                    authors: vec!["test-key".to_string()],
                }]
            }
        );
    }

    #[tokio::test]
    async fn test_missing_items_is_empty_match_list() {
        let url = serve(Router::new().route(
            "/volumes",
            get(|| async { Json(json!({ "kind": "books#volumes", "totalItems": 0 })) }),
        ))
        .await;

        let result = client_for(url).search("zzzz").await.unwrap();
        assert_eq!(result, BookSearch::Found { matches: vec![] });
    }

    #[tokio::test]
    async fn test_non_200_status_is_reported_inline() {
        let url = serve(Router::new().route(
            "/volumes",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" }))) }),
        ))
        .await;

        let result = client_for(url).search("text").await.unwrap();
        assert_eq!(result, BookSearch::Failed { status: 403 });
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let url = serve(Router::new().route("/volumes", get(|| async { "not json" }))).await;

        let err = client_for(url).search("text").await.unwrap_err();
        assert!(matches!(err, BookSearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Grab a free port, then close it so the connection is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{}/volumes", addr))
            .search("text")
            .await
            .unwrap_err();
        assert!(matches!(err, BookSearchError::Network(_)));
    }

    #[test]
    fn test_serializes_with_outcome_tag() {
        let value: Value = serde_json::to_value(BookSearch::Failed { status: 500 }).unwrap();
        assert_eq!(value, json!({ "outcome": "failed", "status": 500 }));
    }
}
