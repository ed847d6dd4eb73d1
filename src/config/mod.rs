//! Runtime configuration for `marklets.toml`.
//!
//! # Sections
//!
//! | Section           | Purpose                                        |
//! |-------------------|------------------------------------------------|
//! | `[site]`          | Origin, page list, DOM selectors, link aliases |
//! | `[site.nav]`      | SPA navigation settings                        |
//! | `[site.nav.preload]` | Hover prefetch settings                     |
//! | `[github]`        | Repository coordinates and stat fallbacks      |
//! | `[changelog]`     | Changelog source URL and fallback link         |

mod error;
mod nav;

pub use error::ConfigError;
pub use nav::{NavConfig, PreloadConfig, TransitionConfig, TransitionStyle};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::log;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing marklets.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub github: GithubConfig,
    pub changelog: ChangelogConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            log!("config"; "unknown fields in {display_path}, ignoring:");
            for field in &ignored {
                log!("config"; "- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// The site origin as a parsed URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site.origin)
            .map_err(|e| ConfigError::Validation(format!("site.origin is not a valid URL: {e}")))
    }
}

// ============================================================================
// [site]
// ============================================================================

/// `[site]` section: origin, page list, selectors, aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Site origin, scheme + host (+ port).
    pub origin: String,

    /// Page names under `/pages/` that get shorthand-alias entries.
    pub pages: Vec<String>,

    /// DOM selectors the router extracts against.
    pub selectors: SelectorConfig,

    /// Extra literal alias entries (href spelling -> canonical path).
    /// These take priority over the generated page aliases.
    pub aliases: Vec<AliasEntry>,

    /// SPA navigation settings.
    pub nav: NavConfig,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            origin: "https://devbubba.github.io".to_string(),
            pages: [
                "about",
                "browse",
                "help",
                "request",
                "reportIssue",
                "changelog",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            selectors: SelectorConfig::default(),
            aliases: Vec::new(),
            nav: NavConfig::default(),
        }
    }
}

impl SiteSection {
    /// Build the full alias list: explicit entries first (they win on
    /// collision), then the generated shorthand spellings for every page.
    pub fn alias_entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .aliases
            .iter()
            .map(|e| (e.href.clone(), e.path.clone()))
            .collect();

        for page in &self.pages {
            let canonical = format!("/pages/{page}.html");
            for spelling in [
                format!("./pages/{page}.html"),
                format!("../pages/{page}.html"),
                format!("pages/{page}.html"),
                format!("./{page}.html"),
                format!("../{page}.html"),
            ] {
                entries.push((spelling, canonical.clone()));
            }
        }

        for spelling in ["./index.html", "../index.html", "index.html", "./"] {
            entries.push((spelling.to_string(), "/".to_string()));
        }

        entries
    }
}

/// One explicit alias entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    /// The href spelling as written in markup.
    pub href: String,
    /// Canonical absolute path it maps to.
    pub path: String,
}

/// DOM selectors for fragment extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Main content region (required in every fetched document).
    pub content: String,
    /// Site header (optional in fetched documents).
    pub header: String,
    /// Navigation links inside the header.
    pub nav_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            content: "#mainContent".to_string(),
            header: "#siteHeader".to_string(),
            nav_link: ".navLink".to_string(),
        }
    }
}

// ============================================================================
// [github]
// ============================================================================

/// `[github]` section: repository coordinates and stat fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,

    /// Fallback star count when the API is unreachable.
    pub fallback_stars: u64,
    /// Fallback fork count when the API is unreachable.
    pub fallback_forks: u64,

    /// Total repository views. The traffic API requires authentication, so
    /// this is maintained by hand from GitHub Insights.
    pub traffic_views: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: "DevBubba".to_string(),
            repo: "Bookmarklets".to_string(),
            fallback_stars: 77,
            fallback_forks: 18,
            traffic_views: 2195,
        }
    }
}

impl GithubConfig {
    /// API URL for the repository object.
    pub fn repo_api_url(&self) -> String {
        format!("https://api.github.com/repos/{}/{}", self.owner, self.repo)
    }

    /// Web URL for a commit.
    pub fn commit_url(&self, sha: &str) -> String {
        format!("https://github.com/{}/{}/commit/{sha}", self.owner, self.repo)
    }
}

// ============================================================================
// [changelog]
// ============================================================================

/// `[changelog]` section: where the changelog markdown lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Raw markdown source URL.
    pub url: String,
    /// Human-readable fallback link shown when the fetch fails.
    pub fallback_url: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            url: "https://raw.githubusercontent.com/DevBubba/Bookmarklets/refs/heads/main/docs/CHANGELOG.md"
                .to_string(),
            fallback_url: "https://github.com/DevBubba/Bookmarklets/blob/main/docs/CHANGELOG.md"
                .to_string(),
        }
    }
}
