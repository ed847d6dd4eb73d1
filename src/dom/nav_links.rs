//! Navigation-link parsing and active-state handling.

use super::has_class;

/// One navigation link in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// The href exactly as written in markup.
    pub href: String,
    /// Whether the link currently carries the `active` class.
    pub active: bool,
}

/// Parse navigation links out of header markup, in document order.
///
/// `selector` is the nav-link selector (`.navLink`). Links without an
/// `href` attribute are skipped. Parse failures yield an empty list -
/// a header without readable links is handled the same as no header.
pub fn parse_nav_links(header_html: &str, selector: &str) -> Vec<NavLink> {
    let Ok(dom) = tl::parse(header_html, tl::ParserOptions::default()) else {
        return Vec::new();
    };
    let parser = dom.parser();

    let Some(matches) = dom.query_selector(selector) else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for handle in matches {
        let Some(tag) = handle.get(parser).and_then(|n| n.as_tag()) else {
            continue;
        };
        let Some(href) = super::attr(tag, "href") else {
            continue;
        };
        links.push(NavLink {
            href,
            active: has_class(tag, "active"),
        });
    }
    links
}

/// Merge active state from a fetched header's links onto the live links
/// by index position: the nth fetched link's state lands on the nth live
/// link. A best-effort pre-pass to avoid a flash of stale state before
/// the authoritative recomputation runs; extra links on either side are
/// left alone.
pub fn merge_active_by_index(live: &mut [NavLink], fetched: &[NavLink]) {
    for (current, incoming) in live.iter_mut().zip(fetched) {
        current.active = incoming.active;
    }
}
