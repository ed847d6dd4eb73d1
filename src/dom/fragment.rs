//! Fragment extraction from fetched documents.

use crate::config::SelectorConfig;

/// The pieces of a fetched document the router keeps: the main-content
/// markup, the header markup, and the page title. Values are immutable
/// snapshots once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFragment {
    /// innerHTML of the main-content region.
    pub content_html: String,
    /// innerHTML of the site header, when the document has one.
    pub header_html: Option<String>,
    /// `<title>` text, when present.
    pub title: Option<String>,
}

impl PageFragment {
    /// Extract the fragment from a document.
    ///
    /// Returns `None` when the markup does not parse or the main-content
    /// element is missing - the caller treats both as "this document is
    /// not swappable" and falls back to a full navigation.
    pub fn extract(html: &str, selectors: &SelectorConfig) -> Option<Self> {
        let dom = tl::parse(html, tl::ParserOptions::default()).ok()?;
        let parser = dom.parser();

        let content_html = select_inner_html(&dom, parser, &selectors.content)?;
        let header_html = select_inner_html(&dom, parser, &selectors.header);
        let title = find_title(&dom, parser);

        Some(Self {
            content_html,
            header_html,
            title,
        })
    }
}

/// innerHTML of the first element matching a selector.
fn select_inner_html(dom: &tl::VDom, parser: &tl::Parser, selector: &str) -> Option<String> {
    let handle = dom.query_selector(selector)?.next()?;
    let node = handle.get(parser)?;
    Some(node.inner_html(parser).to_string())
}

/// Text of the document's `<title>` element.
fn find_title(dom: &tl::VDom, parser: &tl::Parser) -> Option<String> {
    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else {
            continue;
        };
        if tag.name().as_utf8_str().eq_ignore_ascii_case("title") {
            let text = node.inner_text(parser).trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> String {
        format!(
            r#"<html><head><title>DevBubba's Bookmarklets</title></head>
            <body><header id="siteHeader"><nav><a class="navLink" href="/">Home</a></nav></header>
            <main id="mainContent">{content}</main></body></html>"#
        )
    }

    #[test]
    fn test_extracts_all_parts() {
        let fragment = PageFragment::extract(&page("<p>hello</p>"), &SelectorConfig::default()).unwrap();
        assert_eq!(fragment.content_html, "<p>hello</p>");
        assert!(fragment.header_html.as_deref().unwrap().contains("navLink"));
        assert_eq!(fragment.title.as_deref(), Some("DevBubba's Bookmarklets"));
    }

    #[test]
    fn test_missing_content_is_none() {
        let html = "<html><body><div>no main region here</div></body></html>";
        assert!(PageFragment::extract(html, &SelectorConfig::default()).is_none());
    }

    #[test]
    fn test_missing_header_and_title_are_optional() {
        let html = r#"<html><body><main id="mainContent"><p>x</p></main></body></html>"#;
        let fragment = PageFragment::extract(html, &SelectorConfig::default()).unwrap();
        assert_eq!(fragment.content_html, "<p>x</p>");
        assert!(fragment.header_html.is_none());
        assert!(fragment.title.is_none());
    }
}
