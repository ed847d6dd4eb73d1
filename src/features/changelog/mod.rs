//! Changelog feature: fetch the remote CHANGELOG.md, parse its version
//! blocks, and render the table of contents plus one panel per version.
//!
//! Every failure path renders something usable: an empty document gets
//! the "no entries" placeholder, a failed fetch gets a fallback block
//! linking to the changelog on GitHub. Errors never escape.

mod parse;
mod render;

pub use parse::{ChangelogVersion, VersionBlock, parse_changelog};
pub use render::{render_changelog, render_fallback, render_loading};

use crate::config::ChangelogConfig;
use crate::debug;
use crate::host::Fetcher;

/// Fetch and render the changelog. Always returns displayable markup.
pub async fn load<F: Fetcher>(fetcher: &F, config: &ChangelogConfig) -> String {
    match try_load(fetcher, config).await {
        Ok(html) => html,
        Err(err) => {
            debug!("changelog"; "failed to load: {err}");
            render_fallback(&config.fallback_url)
        }
    }
}

async fn try_load<F: Fetcher>(fetcher: &F, config: &ChangelogConfig) -> anyhow::Result<String> {
    let page = fetcher
        .fetch(&config.url)
        .await
        .map_err(|e| anyhow::anyhow!("fetch failed: {e}"))?;
    if !page.is_ok() {
        anyhow::bail!("changelog fetch returned status {}", page.status);
    }

    let markdown = page.body.trim().replace("\r\n", "\n").replace('\r', "\n");
    let versions = parse_changelog(&markdown);
    Ok(render_changelog(&versions))
}
