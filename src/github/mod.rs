//! GitHub REST integration for repository stats.
//!
//! Plain GETs against the public API: the repository object for stars
//! and forks, `per_page=1` issue queries whose `Link` header carries the
//! real count, and the latest commit for the footer links. Every failure
//! collapses to the configured fallback numbers - the stats strip never
//! shows an error state.

use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::debug;
use crate::host::{FetchError, Fetcher};
use crate::utils::date::DateTimeUtc;

/// Shown when the latest commit cannot be determined.
pub const COMMIT_UNAVAILABLE: &str = "Unable to load";

/// `page=N>; rel="last"` inside a Link header.
static LAST_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"page=(\d+)>; rel="last""#).expect("last-page pattern"));

// ============================================================================
// API response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RepoObject {
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CommitObject {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: Option<String>,
}

// ============================================================================
// Results
// ============================================================================

/// The latest commit, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    /// Short-form date, e.g. "Jun 15, 2024".
    pub date_display: String,
    /// Web URL of the commit.
    pub url: String,
}

/// Aggregated repository stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    /// Total views. The traffic API needs authentication, so this is
    /// the configured constant on success and zero on failure.
    pub views: u64,
    pub open_issues: u64,
    pub closed_issues: u64,
    pub last_commit: Option<CommitInfo>,
}

impl RepoStats {
    /// The values shown when the API is unreachable.
    pub fn fallback(config: &GithubConfig) -> Self {
        Self {
            stars: config.fallback_stars,
            forks: config.fallback_forks,
            views: 0,
            open_issues: 0,
            closed_issues: 0,
            last_commit: None,
        }
    }

    /// Text for the last-commit stat line.
    pub fn commit_display(&self) -> &str {
        self.last_commit
            .as_ref()
            .map(|c| c.date_display.as_str())
            .unwrap_or(COMMIT_UNAVAILABLE)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load repository stats, degrading to the configured fallbacks on any
/// failure.
pub async fn load<F: Fetcher>(fetcher: &F, config: &GithubConfig) -> RepoStats {
    match try_load(fetcher, config).await {
        Ok(stats) => stats,
        Err(err) => {
            debug!("github"; "stats unavailable: {err}");
            RepoStats::fallback(config)
        }
    }
}

async fn try_load<F: Fetcher>(
    fetcher: &F,
    config: &GithubConfig,
) -> Result<RepoStats, FetchError> {
    let page = fetcher.fetch(&config.repo_api_url()).await?;
    if !page.is_ok() {
        return Err(FetchError::Request(format!(
            "repository query returned status {}",
            page.status
        )));
    }
    let repo: RepoObject = serde_json::from_str(&page.body)
        .map_err(|e| FetchError::Request(format!("repository parse failed: {e}")))?;

    let open_issues = issue_count(fetcher, config, "open").await.unwrap_or(0);
    let closed_issues = issue_count(fetcher, config, "closed").await.unwrap_or(0);
    let last_commit = latest_commit(fetcher, config).await;

    Ok(RepoStats {
        stars: repo.stargazers_count.unwrap_or(config.fallback_stars),
        forks: repo.forks_count.unwrap_or(config.fallback_forks),
        views: config.traffic_views,
        open_issues,
        closed_issues,
        last_commit,
    })
}

/// Count issues in a state via a `per_page=1` query: the Link header's
/// last-page number is the count; without one, the body length is.
async fn issue_count<F: Fetcher>(fetcher: &F, config: &GithubConfig, state: &str) -> Option<u64> {
    let url = format!("{}/issues?state={state}&per_page=1", config.repo_api_url());
    let page = fetcher.fetch(&url).await.ok()?;
    if !page.is_ok() {
        return None;
    }

    let body: serde_json::Value = serde_json::from_str(&page.body).ok()?;
    let body_len = body.as_array().map(|a| a.len() as u64)?;

    let count = page
        .header("link")
        .and_then(|link| LAST_PAGE.captures(link))
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or(body_len);
    Some(count)
}

/// Fetch the most recent commit.
pub async fn latest_commit<F: Fetcher>(
    fetcher: &F,
    config: &GithubConfig,
) -> Option<CommitInfo> {
    let url = format!("{}/commits?per_page=1", config.repo_api_url());
    let page = fetcher.fetch(&url).await.ok()?;
    if !page.is_ok() {
        return None;
    }

    let commits: Vec<CommitObject> = serde_json::from_str(&page.body).ok()?;
    let commit = commits.into_iter().next()?;
    if commit.sha.is_empty() {
        return None;
    }

    let date = commit.commit.author.and_then(|a| a.date)?;
    let date = DateTimeUtc::parse(&date)?;

    Some(CommitInfo {
        url: config.commit_url(&commit.sha),
        sha: commit.sha,
        date_display: date.format_short(),
    })
}

// ============================================================================
// Commit links
// ============================================================================

/// The latest-commit URL and its application to link slots.
///
/// An owned field where the site once hung the URL off `window`; hosts
/// register the hrefs they render and re-apply after every page swap.
#[derive(Debug, Default)]
pub struct CommitLinks {
    url: Mutex<Option<String>>,
}

impl CommitLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the commit URL once it is known.
    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.lock() = Some(url.into());
    }

    /// The current commit URL, if known.
    pub fn url(&self) -> Option<String> {
        self.url.lock().clone()
    }

    /// Point every registered slot at the commit URL. Returns the
    /// number of slots updated; zero when the URL is not known yet.
    pub fn apply_to(&self, slots: &mut [String]) -> usize {
        let Some(url) = self.url() else {
            return 0;
        };
        for slot in slots.iter_mut() {
            *slot = url.clone();
        }
        slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FetchedPage;
    use dashmap::DashMap;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct FakeApi {
        responses: DashMap<String, FetchedPage>,
    }

    impl FakeApi {
        fn with(self, url: &str, page: FetchedPage) -> Self {
            self.responses.insert(url.to_string(), page);
            self
        }
    }

    impl Fetcher for FakeApi {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.responses
                .get(url)
                .map(|p| p.clone())
                .ok_or_else(|| FetchError::Request(format!("no response for {url}")))
        }
    }

    fn with_link(body: &str, link: &str) -> FetchedPage {
        let mut headers = FxHashMap::default();
        headers.insert("link".to_string(), link.to_string());
        FetchedPage {
            status: 200,
            body: body.to_string(),
            headers,
        }
    }

    fn api() -> FakeApi {
        let base = "https://api.github.com/repos/DevBubba/Bookmarklets";
        FakeApi::default()
            .with(
                base,
                FetchedPage::ok(r#"{"stargazers_count": 120, "forks_count": 30}"#),
            )
            .with(
                &format!("{base}/issues?state=open&per_page=1"),
                with_link(
                    r#"[{"number": 1}]"#,
                    r#"<https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=9>; rel="last""#,
                ),
            )
            .with(
                &format!("{base}/issues?state=closed&per_page=1"),
                FetchedPage::ok(r#"[{"number": 2}]"#),
            )
            .with(
                &format!("{base}/commits?per_page=1"),
                FetchedPage::ok(
                    r#"[{"sha": "abc123", "commit": {"author": {"date": "2024-06-15T10:00:00Z"}}}]"#,
                ),
            )
    }

    #[tokio::test]
    async fn test_load_full_stats() {
        let stats = load(&api(), &GithubConfig::default()).await;
        assert_eq!(stats.stars, 120);
        assert_eq!(stats.forks, 30);
        assert_eq!(stats.views, 2195);
        // Link header count wins over body length
        assert_eq!(stats.open_issues, 9);
        // No Link header: body length
        assert_eq!(stats.closed_issues, 1);

        let commit = stats.last_commit.as_ref().unwrap();
        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.date_display, "Jun 15, 2024");
        assert_eq!(
            commit.url,
            "https://github.com/DevBubba/Bookmarklets/commit/abc123"
        );
        assert_eq!(stats.commit_display(), "Jun 15, 2024");
    }

    #[tokio::test]
    async fn test_load_unreachable_uses_fallbacks() {
        let config = GithubConfig::default();
        let stats = load(&FakeApi::default(), &config).await;
        assert_eq!(stats.stars, 77);
        assert_eq!(stats.forks, 18);
        assert_eq!(stats.views, 0);
        assert_eq!(stats.open_issues, 0);
        assert!(stats.last_commit.is_none());
        assert_eq!(stats.commit_display(), COMMIT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_issue_failures_degrade_to_zero() {
        let base = "https://api.github.com/repos/DevBubba/Bookmarklets";
        let api = FakeApi::default().with(
            base,
            FetchedPage::ok(r#"{"stargazers_count": 5, "forks_count": 1}"#),
        );
        let stats = load(&api, &GithubConfig::default()).await;
        assert_eq!(stats.stars, 5);
        assert_eq!(stats.open_issues, 0);
        assert_eq!(stats.closed_issues, 0);
    }

    #[tokio::test]
    async fn test_missing_counts_use_config_fallbacks() {
        let base = "https://api.github.com/repos/DevBubba/Bookmarklets";
        let api = FakeApi::default().with(base, FetchedPage::ok("{}"));
        let stats = load(&api, &GithubConfig::default()).await;
        assert_eq!(stats.stars, 77);
        assert_eq!(stats.forks, 18);
    }

    #[test]
    fn test_commit_links_apply() {
        let links = CommitLinks::new();
        let mut slots = vec!["#".to_string(), "#".to_string()];
        assert_eq!(links.apply_to(&mut slots), 0);

        links.set_url("https://github.com/DevBubba/Bookmarklets/commit/abc");
        assert_eq!(links.apply_to(&mut slots), 2);
        assert!(slots.iter().all(|s| s.ends_with("/commit/abc")));
    }
}
