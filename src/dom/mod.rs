//! Document parsing and the owned page-view model.
//!
//! Fetched documents are parsed with `tl`; the engine extracts the main
//! content region, the site header, the page title, and the navigation
//! links. The visible document is modeled by [`PageView`].

mod fragment;
mod nav_links;
mod view;

pub use fragment::PageFragment;
pub use nav_links::{NavLink, merge_active_by_index, parse_nav_links};
pub use view::{PageView, ScrollMode, StagedContent};

/// Get an attribute value from a tag.
pub(crate) fn attr(tag: &tl::HTMLTag, name: &str) -> Option<String> {
    for (key, value) in tag.attributes().iter() {
        if key.as_ref().eq_ignore_ascii_case(name) {
            return Some(value.map(|v| v.to_string()).unwrap_or_default());
        }
    }
    None
}

/// Check whether a tag's class list contains a class name.
pub(crate) fn has_class(tag: &tl::HTMLTag, class: &str) -> bool {
    attr(tag, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}
