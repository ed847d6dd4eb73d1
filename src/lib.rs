//! Marklets - client runtime engine for a static bookmarklet-collection site.
//!
//! Gives same-origin navigation an app-like feel without full page reloads,
//! and hosts the site's feature modules (header state, changelog renderer,
//! GitHub stats, visit counters, particle background, typewriter).
//!
//! The engine is headless: browser primitives are seams. HTTP goes through
//! the [`host::Fetcher`] trait, local/session storage through
//! [`host::KeyValueStore`], and the visible document is the owned
//! [`dom::PageView`] model. Everything degrades to a plain full navigation
//! on failure - the worst case is the browser behaving as if this crate
//! were absent.

pub mod app;
pub mod config;
pub mod core;
pub mod dom;
pub mod features;
pub mod github;
pub mod host;
pub mod logger;
pub mod router;
pub mod utils;

pub use app::App;
pub use config::SiteConfig;
pub use router::{NavOutcome, Router};
