//! Link classification utilities.

/// Syntactic classification of href strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, tel:, etc.)
    External(&'a str),
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Site-root-relative path (/about, /pages/help.html).
    SiteRoot(&'a str),
    /// Document-relative path (./about.html, ../pages/about.html).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse an href string into its syntactic kind.
    #[inline]
    pub fn parse(href: &'a str) -> Self {
        if is_external_link(href) {
            Self::External(href)
        } else if let Some(anchor) = href.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if let Some(anchor) = href.strip_prefix("./#") {
            // ./#fragment is semantically equivalent to #fragment
            Self::Fragment(anchor)
        } else if href.starts_with('/') {
            Self::SiteRoot(href)
        } else {
            Self::Relative(href)
        }
    }

    /// Check if href is HTTP/HTTPS.
    #[inline]
    pub fn is_http(href: &str) -> bool {
        href.starts_with("http://") || href.starts_with("https://")
    }
}

/// Check if an href has a URL scheme (http:, mailto:, etc.)
///
/// A valid scheme must have at least 1 character before the colon and only
/// contain ASCII alphanumerics or `+`, `-`, `.`.
#[inline]
pub fn is_external_link(href: &str) -> bool {
    href.find(':').is_some_and(|pos| {
        pos > 0
            && href[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_external() {
        assert!(matches!(
            LinkKind::parse("https://example.com"),
            LinkKind::External("https://example.com")
        ));
        assert!(matches!(
            LinkKind::parse("mailto:user@example.com"),
            LinkKind::External("mailto:user@example.com")
        ));
    }

    #[test]
    fn test_parse_fragment() {
        assert!(matches!(LinkKind::parse("#stats"), LinkKind::Fragment("stats")));
        assert!(matches!(LinkKind::parse("#"), LinkKind::Fragment("")));
        assert!(matches!(LinkKind::parse("./#stats"), LinkKind::Fragment("stats")));
    }

    #[test]
    fn test_parse_site_root() {
        assert!(matches!(
            LinkKind::parse("/pages/about.html"),
            LinkKind::SiteRoot("/pages/about.html")
        ));
    }

    #[test]
    fn test_parse_relative() {
        assert!(matches!(
            LinkKind::parse("./about.html"),
            LinkKind::Relative("./about.html")
        ));
        assert!(matches!(
            LinkKind::parse("../pages/about.html"),
            LinkKind::Relative("../pages/about.html")
        ));
        assert!(matches!(
            LinkKind::parse("about.html"),
            LinkKind::Relative("about.html")
        ));
    }

    #[test]
    fn test_is_http() {
        assert!(LinkKind::is_http("http://example.com"));
        assert!(LinkKind::is_http("https://example.com"));
        assert!(!LinkKind::is_http("mailto:user@example.com"));
        assert!(!LinkKind::is_http("/pages/about.html"));
    }
}
