//! HTTP fetcher on reqwest.

use rustc_hash::FxHashMap;

use super::{FetchError, FetchedPage, Fetcher};

/// Production [`Fetcher`]: a shared reqwest client.
///
/// Carries a stable User-Agent (the GitHub API rejects requests without
/// one). No timeout is configured, matching the browser behavior this
/// replaces: a hung request stalls only its own navigation attempt.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("marklets/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let mut headers = FxHashMap::default();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(FetchedPage {
            status,
            body,
            headers,
        })
    }
}
