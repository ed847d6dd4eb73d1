//! The owned model of the visible document.

use crate::config::SelectorConfig;

use super::{NavLink, PageFragment, parse_nav_links};

/// How the last scroll movement was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Jump with no animation.
    Instant,
    /// Animated smooth scroll.
    Smooth,
}

/// The engine's model of the visible document: content markup, header
/// markup, title, navigation links, and scroll position.
///
/// Exactly one owner (the router) mutates this; feature modules read it
/// after the page-changed notification.
#[derive(Debug)]
pub struct PageView {
    pub content_html: String,
    pub header_html: Option<String>,
    pub title: String,
    pub nav_links: Vec<NavLink>,
    scroll_y: f64,
    last_scroll: Option<ScrollMode>,
}

impl PageView {
    /// Build the view from a full document, as on initial load.
    ///
    /// A document without the main-content element yields an empty
    /// content region rather than an error; the engine never blocks the
    /// page over its own model.
    pub fn from_document(html: &str, selectors: &SelectorConfig) -> Self {
        match PageFragment::extract(html, selectors) {
            Some(fragment) => Self::from_fragment(fragment, selectors),
            None => Self {
                content_html: String::new(),
                header_html: None,
                title: String::new(),
                nav_links: Vec::new(),
                scroll_y: 0.0,
                last_scroll: None,
            },
        }
    }

    fn from_fragment(fragment: PageFragment, selectors: &SelectorConfig) -> Self {
        let nav_links = fragment
            .header_html
            .as_deref()
            .map(|header| parse_nav_links(header, &selectors.nav_link))
            .unwrap_or_default();

        Self {
            content_html: fragment.content_html,
            header_html: fragment.header_html,
            title: fragment.title.unwrap_or_default(),
            nav_links,
            scroll_y: 0.0,
            last_scroll: None,
        }
    }

    /// Current vertical scroll offset.
    #[inline]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Record a scroll position reported by the host.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    /// Scroll to the top of the document.
    pub fn scroll_to_top(&mut self, mode: ScrollMode) {
        self.scroll_y = 0.0;
        self.last_scroll = Some(mode);
    }

    /// How the last engine-initiated scroll was performed.
    #[inline]
    pub fn last_scroll(&self) -> Option<ScrollMode> {
        self.last_scroll
    }
}

/// New content markup, fully materialized before it becomes visible.
///
/// Staging parses the markup up front so the expensive work happens
/// off-screen; [`StagedContent::apply`] is then a single assignment,
/// mirroring the hidden-container render the browser implementation
/// used.
#[derive(Debug)]
pub struct StagedContent {
    html: String,
    /// Number of parsed nodes, recorded at staging time.
    nodes: usize,
}

impl StagedContent {
    /// Parse and materialize new content markup.
    pub fn stage(html: &str) -> Self {
        let nodes = tl::parse(html, tl::ParserOptions::default())
            .map(|dom| dom.nodes().len())
            .unwrap_or(0);
        Self {
            html: html.to_string(),
            nodes,
        }
    }

    /// Number of nodes materialized during staging.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Replace the visible content region in one assignment.
    pub fn apply(self, view: &mut PageView) {
        view.content_html = self.html;
    }
}
