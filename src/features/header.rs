//! Header behavior: scroll state and active-link highlighting.

use crate::core::{LinkKind, SitePath};
use crate::dom::PageView;

/// Scroll offset past which the header switches to its scrolled style.
const SCROLL_THRESHOLD: f64 = 50.0;

/// The site header's scroll-dependent state.
#[derive(Debug, Default)]
pub struct HeaderState {
    scrolled: bool,
}

impl HeaderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a scroll offset reported by the host. Returns true when the
    /// scrolled flag changed (the host toggles the `scrolled` class).
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        let scrolled = offset > SCROLL_THRESHOLD;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    /// Whether the header currently shows its scrolled style.
    #[inline]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}

/// Authoritative active-link pass: compare every nav link's own resolved
/// path against the current path and set its active state accordingly.
///
/// Hash links and external links keep whatever state they have - section
/// highlighting owns those.
pub fn set_active_nav_links(
    view: &mut PageView,
    current: &SitePath,
    resolve: impl Fn(&str) -> SitePath,
) {
    for link in &mut view.nav_links {
        let href = link.href.as_str();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        if LinkKind::is_http(href) {
            continue;
        }
        link.active = resolve(href).same_page_as(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;

    #[test]
    fn test_scroll_threshold() {
        let mut header = HeaderState::new();
        assert!(!header.is_scrolled());

        assert!(!header.on_scroll(10.0));
        assert!(!header.is_scrolled());

        assert!(header.on_scroll(51.0));
        assert!(header.is_scrolled());

        // No change while still past the threshold
        assert!(!header.on_scroll(500.0));

        assert!(header.on_scroll(0.0));
        assert!(!header.is_scrolled());
    }

    #[test]
    fn test_active_links_follow_current_path() {
        let html = concat!(
            r#"<html><body><header id="siteHeader">"#,
            r#"<a class="navLink active" href="/">Home</a>"#,
            r#"<a class="navLink" href="/pages/help.html">Help</a>"#,
            r##"<a class="navLink" href="#stats">Stats</a>"##,
            r#"</header><main id="mainContent"></main></body></html>"#,
        );
        let mut view = PageView::from_document(html, &SelectorConfig::default());

        let current = SitePath::normalize("/pages/help.html");
        set_active_nav_links(&mut view, &current, |href| SitePath::normalize(href));

        assert!(!view.nav_links[0].active);
        assert!(view.nav_links[1].active);
        // Hash link untouched
        assert!(!view.nav_links[2].active);
    }
}
