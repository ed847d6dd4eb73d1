//! Visit and visitor counters backed by the local storage seam.
//!
//! Mirrors the storage layout the site has always used: a generated
//! visitor id, a per-day view marker, a local view counter, and a JSON
//! array of known visitor ids. Every read degrades to the stored (or
//! zero) value.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::host::KeyValueStore;
use crate::utils::date::DateTimeUtc;

const KEY_VISITOR_ID: &str = "bookmarkletVisitorId";
const KEY_LAST_VIEW_DATE: &str = "bookmarkletLastViewDate";
const KEY_LOCAL_VIEWS: &str = "bookmarkletLocalViews";
const KEY_USERS: &str = "websiteUsers";
const KEY_DOWNLOADS: &str = "bookmarkletTotalDownloads";
const KEY_SAVED: &str = "bookmarkletTotalSaved";

/// Visit tracking over a local store.
pub struct VisitStats {
    store: Arc<dyn KeyValueStore>,
}

impl VisitStats {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Get the stored visitor id, generating and persisting one on
    /// first call.
    pub fn visitor_id(&self) -> String {
        if let Some(id) = self.store.get(KEY_VISITOR_ID) {
            return id;
        }
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let mut rng = SmallRng::from_entropy();
        let id = format!("visitor_{millis}_{}", visitor_suffix(&mut rng));
        self.store.set(KEY_VISITOR_ID, &id);
        id
    }

    /// Whether this visitor was already counted today.
    pub fn has_viewed_today(&self, today: &DateTimeUtc) -> bool {
        self.store.get(KEY_LAST_VIEW_DATE).as_deref() == Some(today.to_iso_date().as_str())
    }

    /// Count a website view, at most once per visitor-day. Returns the
    /// current total either way.
    pub fn track_view(&self, today: DateTimeUtc) -> u64 {
        if !self.has_viewed_today(&today) {
            self.store.set(KEY_LAST_VIEW_DATE, &today.to_iso_date());
            let views = self.views() + 1;
            self.store.set(KEY_LOCAL_VIEWS, &views.to_string());
        }
        self.views()
    }

    /// Current stored view total.
    pub fn views(&self) -> u64 {
        self.read_count(KEY_LOCAL_VIEWS)
    }

    /// Add this visitor to the unique-user list if absent. Returns the
    /// total number of unique users.
    pub fn track_unique_user(&self) -> usize {
        let id = self.visitor_id();
        let mut users: Vec<String> = self
            .store
            .get(KEY_USERS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        if !users.contains(&id) {
            users.push(id);
            let serialized =
                serde_json::to_string(&users).unwrap_or_else(|_| "[]".to_string());
            self.store.set(KEY_USERS, &serialized);
        }
        users.len()
    }

    /// Stored total-downloads counter.
    pub fn downloads(&self) -> u64 {
        self.read_count(KEY_DOWNLOADS)
    }

    /// Stored total-saved counter.
    pub fn saved(&self) -> u64 {
        self.read_count(KEY_SAVED)
    }

    fn read_count(&self, key: &str) -> u64 {
        self.store
            .get(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Nine base-36 characters, the tail of a visitor id.
fn visitor_suffix(rng: &mut impl Rng) -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..9)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
