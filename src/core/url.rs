//! Site path type for canonical path handling.
//!
//! - Internal representation: always decoded (human-readable)
//! - No trailing slash, except for the root path
//!
//! `SitePath::normalize` is the single normalization pass every path goes
//! through before comparison, history bookkeeping, or active-link
//! highlighting. It is idempotent.

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Decoded, normalized site path.
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with `/`
/// - Never ends with `/`, except the root path itself
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SitePath(Arc<str>);

impl SitePath {
    /// Normalize an arbitrary path string.
    ///
    /// - decodes percent-encoding
    /// - strips query string and fragment
    /// - collapses repeated slashes
    /// - removes `.` segments
    /// - removes immediately-adjacent duplicate segments
    /// - collapses a repeating 2-segment pattern (accidental path doubling,
    ///   `/pages/about/pages/about` -> `/pages/about`)
    /// - strips the trailing slash (except for the root path)
    pub fn normalize(path: &str) -> Self {
        use percent_encoding::percent_decode_str;

        let trimmed = path.trim();
        let bare = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
        let decoded = percent_decode_str(bare)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| bare.to_string());

        // Splitting on '/' and dropping empty segments collapses repeated
        // slashes and the trailing slash in one go.
        let mut segments: Vec<&str> = decoded
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        // Immediately-adjacent duplicate segments.
        segments.dedup();

        collapse_doubled_pairs(&mut segments);

        if segments.is_empty() {
            return Self(Arc::from("/"));
        }
        Self(Arc::from(format!("/{}", segments.join("/"))))
    }

    /// Get the normalized path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the root path.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Comparison key for "same page" checks and active-link highlighting:
    /// a trailing `index.html` segment is equivalent to its directory.
    ///
    /// `/pages/index.html` -> `/pages`, `/index.html` -> `/`
    pub fn comparable(&self) -> &str {
        match self.0.strip_suffix("/index.html") {
            Some("") => "/",
            Some(parent) => parent,
            None => &self.0,
        }
    }

    /// Check whether two paths identify the same page.
    #[inline]
    pub fn same_page_as(&self, other: &SitePath) -> bool {
        self.comparable() == other.comparable()
    }

    /// The final `n` segments of the path, joined with `/`.
    ///
    /// Returns `None` when the path has fewer than `n` segments.
    pub fn last_segments(&self, n: usize) -> Option<String> {
        let segs: Vec<&str> = self.0.split('/').filter(|s| !s.is_empty()).collect();
        if segs.len() < n {
            return None;
        }
        Some(segs[segs.len() - n..].join("/"))
    }
}

/// Collapse a repeating 2-segment pattern in place.
///
/// A path like `a/b/a/b` is the signature of a known duplication bug class
/// (relative hrefs resolved against an already-duplicated base); the second
/// occurrence of the pair is dropped, repeatedly, until none remain.
fn collapse_doubled_pairs(segments: &mut Vec<&str>) {
    let mut i = 0;
    while i + 4 <= segments.len() {
        if segments[i] == segments[i + 2] && segments[i + 1] == segments[i + 3] {
            segments.drain(i + 2..i + 4);
        } else {
            i += 1;
        }
    }
}

impl std::fmt::Display for SitePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for SitePath {
    fn default() -> Self {
        Self::normalize("/")
    }
}

impl AsRef<str> for SitePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SitePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SitePath {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for SitePath {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}

impl PartialEq<str> for SitePath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for SitePath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for SitePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SitePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::normalize(&s))
    }
}
