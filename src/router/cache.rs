//! Path cache: fetched fragments keyed by the literal href.
//!
//! Keys are href spellings exactly as written in markup, not canonical
//! paths - two spellings of the same target occupy two entries. Entries
//! are immutable snapshots, never invalidated for the page-session
//! lifetime, and concurrent prefetch/navigate writes for one key simply
//! overwrite.

use std::sync::Arc;

use dashmap::DashMap;

use crate::dom::PageFragment;

/// Append-only fragment cache.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: DashMap<String, Arc<PageFragment>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the fragment cached for a literal href.
    pub fn get(&self, href: &str) -> Option<Arc<PageFragment>> {
        self.entries.get(href).map(|e| Arc::clone(&e))
    }

    /// Store a fragment under a literal href.
    pub fn insert(&self, href: impl Into<String>, fragment: PageFragment) -> Arc<PageFragment> {
        let fragment = Arc::new(fragment);
        self.entries.insert(href.into(), Arc::clone(&fragment));
        fragment
    }

    /// Number of cached hrefs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
