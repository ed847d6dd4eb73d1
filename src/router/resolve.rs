//! URL resolution: href strings to absolute same-origin URLs.
//!
//! Resolution never fails visibly. Internal errors fall back first to
//! resolving against the site root, then to the origin concatenated
//! with a normalized form of the raw input.

use url::Url;

use crate::core::SitePath;

use super::alias::AliasTable;

/// The result of resolving an href.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Absolute URL.
    pub url: Url,
    /// Normalized path, the comparison key.
    pub path: SitePath,
    /// Path + query + hash, the history-entry location.
    pub location: String,
}

/// Href resolver: origin + alias table.
#[derive(Debug)]
pub struct Resolver {
    origin: Url,
    aliases: AliasTable,
}

impl Resolver {
    pub fn new(origin: Url, aliases: AliasTable) -> Self {
        Self { origin, aliases }
    }

    /// The site origin.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve an href against the current document path.
    ///
    /// Accepts arbitrary strings and always produces a usable URL.
    pub fn resolve(&self, href: &str, current: &SitePath) -> Resolution {
        self.try_resolve(href, current)
            .or_else(|_| self.resolve_against_root(href))
            .unwrap_or_else(|_| self.last_resort(href))
    }

    fn try_resolve(&self, href: &str, current: &SitePath) -> Result<Resolution, url::ParseError> {
        // Absolute URLs keep their origin.
        if href.starts_with("http://") || href.starts_with("https://") {
            let parsed = Url::parse(href)?;
            return Ok(self.finish(parsed));
        }

        let (bare, suffix) = split_suffix(href);

        // Absolute paths resolve on the current origin.
        if bare.starts_with('/') {
            let path = SitePath::normalize(bare);
            let joined = self.origin.join(&format!("{}{}", path, suffix))?;
            return Ok(self.finish(joined));
        }

        // Recognized shorthand spellings take their aliased canonical path.
        if let Some(canonical) = self.aliases.resolve(bare) {
            let joined = self.origin.join(&format!("{}{}", canonical, suffix))?;
            return Ok(self.finish(joined));
        }

        // Everything else resolves relative to the normalized current
        // document path (not the raw, possibly-duplicated browser path).
        let base = self.origin.join(current.as_str())?;
        let joined = base.join(href)?;
        Ok(self.finish(joined))
    }

    /// First fallback: resolve the href against the site root.
    fn resolve_against_root(&self, href: &str) -> Result<Resolution, url::ParseError> {
        let joined = self.origin.join(href.trim_start_matches(['.', '/']))?;
        Ok(self.finish(joined))
    }

    /// Last resort: origin + normalized raw input. Cannot fail.
    fn last_resort(&self, href: &str) -> Resolution {
        let path = SitePath::normalize(href);
        let mut url = self.origin.clone();
        url.set_path(path.as_str());
        let location = path.as_str().to_string();
        Resolution {
            url,
            path,
            location,
        }
    }

    /// Normalize the path of a resolved URL and assemble the result.
    fn finish(&self, mut url: Url) -> Resolution {
        let path = SitePath::normalize(url.path());
        url.set_path(path.as_str());

        let mut location = path.as_str().to_string();
        if let Some(query) = url.query() {
            location.push('?');
            location.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            location.push('#');
            location.push_str(fragment);
        }

        Resolution {
            url,
            path,
            location,
        }
    }
}

/// Split an href into its path part and the query/hash suffix.
fn split_suffix(href: &str) -> (&str, &str) {
    match href.find(['?', '#']) {
        Some(idx) => href.split_at(idx),
        None => (href, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        let origin = Url::parse("https://devbubba.github.io").unwrap();
        let aliases = AliasTable::build(&[
            ("./about.html".to_string(), "/pages/about.html".to_string()),
            (
                "../pages/about.html".to_string(),
                "/pages/about.html".to_string(),
            ),
            ("./index.html".to_string(), "/".to_string()),
        ]);
        Resolver::new(origin, aliases)
    }

    fn root() -> SitePath {
        SitePath::normalize("/")
    }

    #[test]
    fn test_absolute_path() {
        let r = resolver().resolve("/pages/help.html", &root());
        assert_eq!(r.url.as_str(), "https://devbubba.github.io/pages/help.html");
        assert_eq!(r.path, "/pages/help.html");
    }

    #[test]
    fn test_absolute_url_keeps_origin() {
        let r = resolver().resolve("https://example.com/x", &root());
        assert_eq!(r.url.as_str(), "https://example.com/x");
    }

    #[test]
    fn test_alias_literal_keys() {
        // Every literal key resolves to origin + its canonical path.
        let resolver = resolver();
        let r = resolver.resolve("./about.html", &root());
        assert_eq!(r.url.as_str(), "https://devbubba.github.io/pages/about.html");
        let r = resolver.resolve("../pages/about.html", &root());
        assert_eq!(r.url.as_str(), "https://devbubba.github.io/pages/about.html");
        let r = resolver.resolve("./index.html", &root());
        assert_eq!(r.url.as_str(), "https://devbubba.github.io/");
    }

    #[test]
    fn test_every_configured_alias_key_resolves() {
        let config = crate::config::SiteConfig::default();
        let entries = config.site.alias_entries();
        let origin = Url::parse(&config.site.origin).unwrap();
        let resolver = Resolver::new(origin.clone(), AliasTable::build(&entries));

        for (href, canonical) in &entries {
            let resolved = resolver.resolve(href, &root());
            let expected = origin.join(canonical).unwrap();
            assert_eq!(resolved.url.as_str(), expected.as_str(), "alias {href}");
        }
    }

    #[test]
    fn test_relative_resolves_against_current() {
        let current = SitePath::normalize("/pages/browse.html");
        let r = resolver().resolve("request.html", &current);
        assert_eq!(r.path, "/pages/request.html");
    }

    #[test]
    fn test_query_and_hash_survive() {
        let r = resolver().resolve("/pages/browse.html?search=zap#results", &root());
        assert_eq!(r.path, "/pages/browse.html");
        assert_eq!(r.location, "/pages/browse.html?search=zap#results");
        assert_eq!(
            r.url.as_str(),
            "https://devbubba.github.io/pages/browse.html?search=zap#results"
        );
    }

    #[test]
    fn test_alias_with_query() {
        let r = resolver().resolve("./about.html?ref=footer", &root());
        assert_eq!(r.path, "/pages/about.html");
        assert_eq!(r.location, "/pages/about.html?ref=footer");
    }

    #[test]
    fn test_doubled_path_normalizes() {
        let r = resolver().resolve("/pages/about/pages/about", &root());
        assert_eq!(r.path, "/pages/about");
    }

    #[test]
    fn test_arbitrary_garbage_still_resolves() {
        let r = resolver().resolve("%%%not a real href%%%", &root());
        assert_eq!(r.url.origin(), resolver().origin().origin());
        assert!(r.path.as_str().starts_with('/'));
    }

    #[test]
    fn test_empty_href_resolves_to_current() {
        let current = SitePath::normalize("/pages/help.html");
        let r = resolver().resolve("", &current);
        assert_eq!(r.path, "/pages/help.html");
    }
}
