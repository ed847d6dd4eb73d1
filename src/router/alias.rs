//! Path alias table.
//!
//! A static mapping from recognized relative/shorthand href spellings to
//! canonical absolute site paths. Built once from configuration, never
//! mutated at runtime.
//!
//! Matching runs three strategies in a fixed priority order, first hit
//! wins: exact literal, stripped of leading `./`/`../` segments, and
//! last-two-segments. The order is load-bearing: an href that matches
//! under more than one strategy takes the earliest one even when a later
//! strategy would map it elsewhere.

use rustc_hash::FxHashMap;

/// Read-only alias table with per-strategy indexes.
#[derive(Debug, Default)]
pub struct AliasTable {
    exact: FxHashMap<String, String>,
    stripped: FxHashMap<String, String>,
    last_two: FxHashMap<String, String>,
}

impl AliasTable {
    /// Build the table. For spellings that collide within one strategy's
    /// index, the first entry wins, so callers put higher-priority
    /// entries first.
    pub fn build(entries: &[(String, String)]) -> Self {
        let mut table = Self::default();
        for (href, canonical) in entries {
            table
                .exact
                .entry(href.clone())
                .or_insert_with(|| canonical.clone());
            table
                .stripped
                .entry(strip_leading_dots(href).to_string())
                .or_insert_with(|| canonical.clone());
            if let Some(key) = last_two_segments(href) {
                table
                    .last_two
                    .entry(key)
                    .or_insert_with(|| canonical.clone());
            }
        }
        table
    }

    /// Resolve an href spelling (path part only, no query/hash) to its
    /// canonical path, if any strategy matches.
    pub fn resolve(&self, href: &str) -> Option<&str> {
        if let Some(canonical) = self.exact.get(href) {
            return Some(canonical);
        }
        if let Some(canonical) = self.stripped.get(strip_leading_dots(href)) {
            return Some(canonical);
        }
        if let Some(key) = last_two_segments(href)
            && let Some(canonical) = self.last_two.get(&key)
        {
            return Some(canonical);
        }
        None
    }

    /// Number of distinct exact spellings.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

/// Strip leading `./` and `../` segments.
fn strip_leading_dots(href: &str) -> &str {
    let mut rest = href;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// The last two path segments joined with `/`, when there are at least
/// two.
fn last_two_segments(href: &str) -> Option<String> {
    let segments: Vec<&str> = href
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    if segments.len() < 2 {
        return None;
    }
    Some(segments[segments.len() - 2..].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable::build(&[
            ("./about.html".to_string(), "/pages/about.html".to_string()),
            (
                "./pages/about.html".to_string(),
                "/pages/about.html".to_string(),
            ),
            (
                "../pages/browse.html".to_string(),
                "/pages/browse.html".to_string(),
            ),
            ("./index.html".to_string(), "/".to_string()),
        ])
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(table().resolve("./about.html"), Some("/pages/about.html"));
        assert_eq!(table().resolve("./index.html"), Some("/"));
    }

    #[test]
    fn test_stripped_match() {
        // "../about.html" is not a literal key, but stripping leading
        // dot segments reduces it to "about.html", which "./about.html"
        // also strips to.
        assert_eq!(table().resolve("../about.html"), Some("/pages/about.html"));
    }

    #[test]
    fn test_last_two_segments_match() {
        // Deep relative spellings still find the canonical page.
        assert_eq!(
            table().resolve("../../pages/browse.html"),
            Some("/pages/browse.html")
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(table().resolve("./missing.html"), None);
        assert_eq!(table().resolve("styles/site.css"), None);
    }

    #[test]
    fn test_strategy_priority_is_fixed() {
        // One spelling that exact-matches to A while its stripped form
        // points at B: the exact strategy must win.
        let table = AliasTable::build(&[
            ("./special.html".to_string(), "/a.html".to_string()),
            ("special.html".to_string(), "/b.html".to_string()),
        ]);
        assert_eq!(table.resolve("./special.html"), Some("/a.html"));
        // The plain spelling exact-matches its own entry.
        assert_eq!(table.resolve("special.html"), Some("/b.html"));
    }

    #[test]
    fn test_first_entry_wins_within_strategy() {
        let table = AliasTable::build(&[
            ("./x.html".to_string(), "/first.html".to_string()),
            ("./x.html".to_string(), "/second.html".to_string()),
        ]);
        assert_eq!(table.resolve("./x.html"), Some("/first.html"));
    }
}
