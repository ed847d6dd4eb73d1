//! Host seams: the browser primitives the engine depends on.
//!
//! The runtime never talks to the network or to storage directly. HTTP
//! goes through [`Fetcher`] (production impl: [`http::HttpFetcher`] on
//! reqwest), and local/session storage through [`KeyValueStore`]
//! ([`MemoryStore`] ships in-crate; persistence is the host's business).

pub mod http;

use std::future::Future;

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use thiserror::Error;

// ============================================================================
// Fetcher
// ============================================================================

/// Errors from a [`Fetcher`].
///
/// The engine never surfaces these to a user: prefetch swallows them and
/// navigation degrades to a full page load.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid url: {0}")]
    Url(String),
}

/// A fetched document: final status, body, and response headers.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
    /// Response headers, lowercase names.
    pub headers: FxHashMap<String, String>,
}

impl FetchedPage {
    /// Build a successful page with no headers (test convenience).
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: FxHashMap::default(),
        }
    }

    /// Whether the response status is in the OK range.
    #[inline]
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a response header by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// The Fetch API seam. One plain GET per call; redirects and TLS are the
/// implementation's concern.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

// ============================================================================
// KeyValueStore
// ============================================================================

/// The local/session-storage seam: string keys to string values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store backing both the "local" and "session" roles.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.set("k", "v2");
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_fetched_page_ok_range() {
        assert!(FetchedPage::ok("body").is_ok());
        let not_found = FetchedPage {
            status: 404,
            body: String::new(),
            headers: FxHashMap::default(),
        };
        assert!(!not_found.is_ok());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut headers = FxHashMap::default();
        headers.insert("link".to_string(), "<x>; rel=\"last\"".to_string());
        let page = FetchedPage {
            status: 200,
            body: String::new(),
            headers,
        };
        assert_eq!(page.header("Link"), Some("<x>; rel=\"last\""));
    }
}
