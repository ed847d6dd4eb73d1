//! Client navigation router.
//!
//! Intercepts in-app link activity, resolves hrefs to canonical site
//! paths, fetches target documents, extracts content/header fragments,
//! swaps them into the page-view model, and maintains session history.
//! Degrades to a full browser navigation on any failure - the escape
//! hatch wraps the whole procedure.

mod alias;
mod cache;
mod history;
mod resolve;

pub use alias::AliasTable;
pub use cache::PathCache;
pub use history::History;
pub use resolve::{Resolution, Resolver};

use parking_lot::{Mutex, MutexGuard};
use url::Url;

use crate::config::{ConfigError, NavConfig, SelectorConfig, SiteConfig};
use crate::core::{EventBus, LinkKind, SitePath};
use crate::debug;
use crate::dom::{PageFragment, PageView, ScrollMode, StagedContent, merge_active_by_index, parse_nav_links};
use crate::features::header::set_active_nav_links;
use crate::host::Fetcher;

/// A link as the click/hover handlers see it.
#[derive(Debug, Clone, Default)]
pub struct Anchor {
    /// The href attribute, exactly as written.
    pub href: String,
    /// `target="_blank"`.
    pub target_blank: bool,
    /// An inline `onclick` handler is present.
    pub has_onclick: bool,
    /// A `download` attribute is present.
    pub has_download: bool,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn target_blank(mut self) -> Self {
        self.target_blank = true;
        self
    }

    pub fn with_onclick(mut self) -> Self {
        self.has_onclick = true;
        self
    }

    pub fn with_download(mut self) -> Self {
        self.has_download = true;
        self
    }
}

/// What a navigation attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Not handled; the browser's default behavior proceeds.
    Ignored,
    /// Same page: navigation suppressed, smooth-scrolled to top.
    SamePage,
    /// Content swapped in place.
    Swapped,
    /// SPA navigation abandoned; the host must perform a full load of
    /// the carried URL.
    FullReload(String),
}

type ReloadHook = Box<dyn Fn() + Send + Sync>;

/// The client navigation router. One instance per page session, owning
/// the path cache, the history model, and the page view.
pub struct Router<F: Fetcher> {
    fetcher: F,
    resolver: Resolver,
    cache: PathCache,
    history: Mutex<History>,
    view: Mutex<PageView>,
    events: EventBus,
    selectors: SelectorConfig,
    nav: NavConfig,
    reload_hooks: Mutex<Vec<ReloadHook>>,
}

impl<F: Fetcher> Router<F> {
    /// Build a router for the document the session started on.
    pub fn new(
        config: &SiteConfig,
        fetcher: F,
        initial_html: &str,
        initial_location: &str,
    ) -> Result<Self, ConfigError> {
        let origin = config.origin_url()?;
        let aliases = AliasTable::build(&config.site.alias_entries());
        let view = PageView::from_document(initial_html, &config.site.selectors);

        Ok(Self {
            fetcher,
            resolver: Resolver::new(origin, aliases),
            cache: PathCache::new(),
            history: Mutex::new(History::new(initial_location)),
            view: Mutex::new(view),
            events: EventBus::new(),
            selectors: config.site.selectors.clone(),
            nav: config.site.nav.clone(),
            reload_hooks: Mutex::new(Vec::new()),
        })
    }

    /// The page-view model. Hold the guard briefly.
    pub fn view(&self) -> MutexGuard<'_, PageView> {
        self.view.lock()
    }

    /// The page-changed notification bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The fragment cache.
    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// The href resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Current history-entry location (path + query + hash).
    pub fn current_location(&self) -> String {
        self.history.lock().current().to_string()
    }

    /// Number of history entries in this session.
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Register a hook to run before any full-reload fallback (the
    /// particle background saves its state here).
    pub fn on_full_reload(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.reload_hooks.lock().push(Box::new(hook));
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve an href to an absolute URL on the current origin.
    ///
    /// Never fails. May repair (replace, not push) the current history
    /// entry when the session's own path needed normalization.
    pub fn resolve_url(&self, href: &str) -> Resolution {
        let current = self.current_path();
        self.resolver.resolve(href, &current)
    }

    /// The normalized current path, repairing the history entry in
    /// place when normalization changed it.
    fn current_path(&self) -> SitePath {
        let mut history = self.history.lock();
        let location = history.current();
        let (bare, suffix) = match location.find(['?', '#']) {
            Some(idx) => location.split_at(idx),
            None => (location, ""),
        };
        let normalized = SitePath::normalize(bare);
        if normalized != bare {
            let repaired = format!("{normalized}{suffix}");
            history.replace(repaired);
        }
        normalized
    }

    // ------------------------------------------------------------------
    // Eligibility
    // ------------------------------------------------------------------

    /// Same-origin, non-hash href that the router can take over.
    fn is_in_app(&self, href: &str) -> bool {
        if href.is_empty() {
            return false;
        }
        match LinkKind::parse(href) {
            LinkKind::Fragment(_) => false,
            LinkKind::External(href) if LinkKind::is_http(href) => Url::parse(href)
                .map(|u| u.origin() == self.resolver.origin().origin())
                .unwrap_or(false),
            LinkKind::External(_) => false,
            LinkKind::SiteRoot(_) | LinkKind::Relative(_) => true,
        }
    }

    // ------------------------------------------------------------------
    // Prefetch
    // ------------------------------------------------------------------

    /// Pointer-enter handler: speculatively fetch and cache the target.
    ///
    /// Pure optimization - every failure is swallowed.
    pub async fn hover(&self, anchor: &Anchor) {
        if !self.nav.preload.enable || anchor.target_blank || !self.is_in_app(&anchor.href) {
            return;
        }
        if self.cache.get(&anchor.href).is_some() {
            return;
        }

        if self.nav.preload.delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(u64::from(
                self.nav.preload.delay,
            )))
            .await;
        }

        let resolution = self.resolve_url(&anchor.href);
        let Ok(page) = self.fetcher.fetch(resolution.url.as_str()).await else {
            return;
        };
        if !page.is_ok() {
            return;
        }
        let Some(fragment) = PageFragment::extract(&page.body, &self.selectors) else {
            return;
        };

        self.cache.insert(anchor.href.clone(), fragment);
        debug!("prefetch"; "cached {}", anchor.href);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Click handler entry point.
    pub async fn click(&self, anchor: &Anchor) -> NavOutcome {
        if !self.nav.spa
            || anchor.target_blank
            || anchor.has_onclick
            || anchor.has_download
            || !self.is_in_app(&anchor.href)
        {
            return NavOutcome::Ignored;
        }
        self.navigate(&anchor.href, true).await
    }

    /// History back: move the cursor and re-render without pushing.
    pub async fn back(&self) -> NavOutcome {
        let location = { self.history.lock().back().map(str::to_string) };
        match location {
            Some(location) => self.navigate(&location, false).await,
            None => NavOutcome::Ignored,
        }
    }

    /// History forward: move the cursor and re-render without pushing.
    pub async fn forward(&self) -> NavOutcome {
        let location = { self.history.lock().forward().map(str::to_string) };
        match location {
            Some(location) => self.navigate(&location, false).await,
            None => NavOutcome::Ignored,
        }
    }

    /// The navigate procedure. `push` pushes a new history entry;
    /// back/forward re-render the existing entry instead.
    ///
    /// The universal escape hatch lives here: any error not already
    /// recovered turns into a full load of the original href.
    pub async fn navigate(&self, href: &str, push: bool) -> NavOutcome {
        match self.try_navigate(href, push).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("router"; "navigation failed for {href}: {err}");
                self.full_reload(href.to_string())
            }
        }
    }

    async fn try_navigate(&self, href: &str, push: bool) -> anyhow::Result<NavOutcome> {
        let current = self.current_path();
        let resolution = self.resolver.resolve(href, &current);

        // Same page: suppress and smooth-scroll to top. Only meaningful
        // for clicks - after a history move the current entry already is
        // the target.
        if push && resolution.path.same_page_as(&current) {
            self.view.lock().scroll_to_top(ScrollMode::Smooth);
            return Ok(NavOutcome::SamePage);
        }

        // Cache hit on the literal href, else fetch now.
        let fragment = match self.cache.get(href) {
            Some(fragment) => fragment,
            None => {
                let page = match self.fetcher.fetch(resolution.url.as_str()).await {
                    Ok(page) => page,
                    Err(err) => {
                        debug!("router"; "fetch failed for {href}: {err}");
                        return Ok(self.full_reload(resolution.url.to_string()));
                    }
                };
                if !page.is_ok() {
                    return Ok(self.full_reload(resolution.url.to_string()));
                }
                match PageFragment::extract(&page.body, &self.selectors) {
                    Some(fragment) => self.cache.insert(href, fragment),
                    None => return Ok(self.full_reload(resolution.url.to_string())),
                }
            }
        };

        // Title, then the transient index-position active-state pre-pass.
        {
            let mut view = self.view.lock();
            if let Some(title) = &fragment.title {
                view.title = title.clone();
            }
            if let Some(header) = &fragment.header_html {
                let fetched = parse_nav_links(header, &self.selectors.nav_link);
                merge_active_by_index(&mut view.nav_links, &fetched);
            }
        }

        if push {
            self.history.lock().push(resolution.location.clone());
        }

        // Stage off-screen first, swap in one assignment, then the
        // authoritative active-link pass against the new current path.
        let staged = StagedContent::stage(&fragment.content_html);
        {
            let mut view = self.view.lock();
            staged.apply(&mut view);
            view.scroll_to_top(ScrollMode::Instant);
            set_active_nav_links(&mut view, &resolution.path, |link_href| {
                self.resolver.resolve(link_href, &resolution.path).path
            });
        }

        self.events.emit(href);
        debug!("router"; "swapped content for {href}");
        Ok(NavOutcome::Swapped)
    }

    /// Abandon SPA navigation: run the registered hooks and hand the
    /// URL back to the host for a plain `location.href` load.
    fn full_reload(&self, url: String) -> NavOutcome {
        for hook in self.reload_hooks.lock().iter() {
            hook();
        }
        debug!("router"; "full navigation to {url}");
        NavOutcome::FullReload(url)
    }
}
