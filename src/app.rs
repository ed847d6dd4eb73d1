//! App assembly: one owner for the router, the feature modules, and the
//! storage seams.
//!
//! Everything the browser build hung off `window` or module-level
//! globals (the particle system, the latest-commit URL, the path cache)
//! is an owned field here, constructed once at startup and passed by
//! reference to whatever needs it.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::config::{ConfigError, SiteConfig};
use crate::core::PageChanged;
use crate::debug;
use crate::features::changelog;
use crate::features::header::HeaderState;
use crate::features::particles::ParticleField;
use crate::features::stats::VisitStats;
use crate::features::typewriter::{Tick, Typewriter};
use crate::github::{self, CommitLinks, RepoStats};
use crate::host::{Fetcher, KeyValueStore};
use crate::router::{Anchor, NavOutcome, Router};
use crate::utils::date::DateTimeUtc;

/// Counter values for the stats strip, captured at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCounters {
    pub views: u64,
    pub users: usize,
    pub downloads: u64,
    pub saved: u64,
}

impl SessionCounters {
    /// Thousands-formatted view count for display.
    pub fn views_display(&self) -> String {
        crate::utils::number::format_thousands(self.views)
    }
}

/// The assembled client runtime.
pub struct App<F: Fetcher + Clone> {
    config: SiteConfig,
    fetcher: F,
    router: Router<F>,
    header: Mutex<HeaderState>,
    stats: VisitStats,
    particles: Arc<Mutex<ParticleField>>,
    typewriter: Mutex<Typewriter>,
    commit_links: CommitLinks,
    session: Arc<dyn KeyValueStore>,
}

impl<F: Fetcher + Clone> App<F> {
    /// Assemble the runtime for the document the session started on.
    ///
    /// `local` and `session` are the two storage roles; `viewport` is
    /// the canvas size for the particle background.
    pub fn new(
        config: SiteConfig,
        fetcher: F,
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        initial_html: &str,
        initial_location: &str,
        viewport: (f64, f64),
    ) -> Result<Self, ConfigError> {
        let router = Router::new(&config, fetcher.clone(), initial_html, initial_location)?;

        let particles = Arc::new(Mutex::new(ParticleField::new(
            viewport.0,
            viewport.1,
            session.as_ref(),
        )));

        // The particle field saves itself before any full-reload
        // fallback, so the next page session restores it seamlessly.
        {
            let particles = Arc::clone(&particles);
            let session = Arc::clone(&session);
            router.on_full_reload(move || {
                particles.lock().save_state(session.as_ref());
            });
        }

        Ok(Self {
            fetcher,
            router,
            header: Mutex::new(HeaderState::new()),
            stats: VisitStats::new(local),
            particles,
            typewriter: Mutex::new(Typewriter::new(Vec::new())),
            commit_links: CommitLinks::new(),
            session,
            config,
        })
    }

    /// The navigation router.
    pub fn router(&self) -> &Router<F> {
        &self.router
    }

    /// The latest-commit link registry.
    pub fn commit_links(&self) -> &CommitLinks {
        &self.commit_links
    }

    /// The particle field, shared with the host's draw loop.
    pub fn particles(&self) -> Arc<Mutex<ParticleField>> {
        Arc::clone(&self.particles)
    }

    /// Count this visit and collect the stats-strip counters.
    pub fn start_session(&self) -> SessionCounters {
        let views = self.stats.track_view(DateTimeUtc::now());
        let users = self.stats.track_unique_user();
        SessionCounters {
            views,
            users,
            downloads: self.stats.downloads(),
            saved: self.stats.saved(),
        }
    }

    /// Fetch repository stats and remember the latest-commit URL for
    /// the registered link slots.
    pub async fn load_github_stats(&self) -> RepoStats {
        let stats = github::load(&self.fetcher, &self.config.github).await;
        if let Some(commit) = &stats.last_commit {
            self.commit_links.set_url(commit.url.clone());
        }
        stats
    }

    /// Fetch and render the changelog panel markup.
    pub async fn load_changelog(&self) -> String {
        changelog::load(&self.fetcher, &self.config.changelog).await
    }

    /// Subscribe to page-changed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<PageChanged> {
        self.router.events().subscribe()
    }

    /// Reinitialize features against the newly injected DOM.
    pub fn handle_page_changed(&self, event: &PageChanged) {
        // The swap reset scroll to the document top.
        self.header.lock().on_scroll(0.0);
        debug!("app"; "reinitialized features after {}", event.href);
    }

    /// Scroll offset reported by the host: drives the header style and
    /// the view model.
    ///
    /// Returns true when the header's scrolled flag flipped.
    pub fn on_scroll(&self, offset: f64) -> bool {
        self.router.view().set_scroll_y(offset);
        self.header.lock().on_scroll(offset)
    }

    /// Whether the header currently shows its scrolled style.
    pub fn header_scrolled(&self) -> bool {
        self.header.lock().is_scrolled()
    }

    /// Advance the hero typewriter one step.
    pub fn typewriter_tick(&self) -> Tick {
        self.typewriter.lock().tick()
    }

    /// Persist the particle field to session storage (the host calls
    /// this periodically; the router's reload hook calls it too).
    pub fn save_particles(&self) {
        self.particles.lock().save_state(self.session.as_ref());
    }

    // Router pass-throughs for the host's event handlers.

    pub async fn click(&self, anchor: &Anchor) -> NavOutcome {
        self.router.click(anchor).await
    }

    pub async fn hover(&self, anchor: &Anchor) {
        self.router.hover(anchor).await;
    }

    pub async fn back(&self) -> NavOutcome {
        self.router.back().await
    }

    pub async fn forward(&self) -> NavOutcome {
        self.router.forward().await
    }
}
