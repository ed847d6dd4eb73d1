//! Changelog HTML rendering.
//!
//! Inline markdown (links, bold, code) is rendered through a
//! pulldown-cmark event walk; all text and URLs are escaped, and links
//! open in a new tab. Structure mirrors the site's other content pages:
//! a TOC section with `tocLink` anchors, then one panel per version.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::utils::html::{escape, escape_attr};

use super::{ChangelogVersion, VersionBlock};

/// Icon shown next to a known section name.
fn section_icon(name: &str) -> &'static str {
    match name {
        "Added" => "\u{2728}",
        "Fixed" => "\u{1f528}",
        "Changed" => "\u{1f6e0}\u{fe0f}",
        "Removed" => "\u{1f5d1}\u{fe0f}",
        "To Do" => "\u{270d}\u{fe0f}",
        "Not Working" => "\u{1f6ab}",
        "Notes" => "\u{1f4dd}",
        _ => "\u{2022}",
    }
}

/// Render the full changelog: table of contents, then version panels.
/// An empty version list renders the "no entries" placeholder.
pub fn render_changelog(versions: &[ChangelogVersion]) -> String {
    if versions.is_empty() {
        return r#"<p class="changelogEmpty">No changelog entries found.</p>"#.to_string();
    }

    let mut html = render_toc(versions);
    for version in versions {
        render_version(&mut html, version);
    }
    html
}

/// The placeholder shown while the fetch is in flight.
pub fn render_loading() -> String {
    r#"<p class="changelogLoading">Loading changelog...</p>"#.to_string()
}

/// The block shown when the changelog cannot be loaded.
pub fn render_fallback(fallback_url: &str) -> String {
    format!(
        concat!(
            r#"<div class="changelogError">"#,
            r#"<p>Unable to load changelog automatically.</p>"#,
            r#"<p><a href="{url}" target="_blank" rel="noopener noreferrer">"#,
            r#"View changelog on GitHub</a></p>"#,
            r#"</div>"#,
        ),
        url = escape_attr(fallback_url),
    )
}

/// Table of contents linking every version anchor, with short dates.
fn render_toc(versions: &[ChangelogVersion]) -> String {
    let mut html = String::from(
        concat!(
            r#"<section class="aboutTOC section">"#,
            r#"<div class="sectionContainerSubtle"><div class="aboutContent">"#,
            r#"<h2 class="aboutSectionTitle">Table of Contents</h2>"#,
            r#"<nav class="tocNav">"#,
        ),
    );
    for version in versions {
        html.push_str(&format!(
            r##"<a href="#version-{id}" class="tocLink">{title} ({date})</a>"##,
            id = escape_attr(&version.id),
            title = escape(&version.title),
            date = version.date.format_short(),
        ));
    }
    html.push_str("</nav></div></div></section>");
    html
}

/// One version panel: anchored container, title, long date, blocks.
fn render_version(html: &mut String, version: &ChangelogVersion) {
    html.push_str(&format!(
        concat!(
            r#"<div id="version-{id}" class="changelogVersion">"#,
            r#"<h3 class="changelogVersionTitle">{title}</h3>"#,
            r#"<p class="changelogVersionDate">{date}</p>"#,
        ),
        id = escape_attr(&version.id),
        title = render_inline(&version.title),
        date = version.date.format_long(),
    ));

    for block in &version.blocks {
        match block {
            VersionBlock::Section { name, items } => render_section(html, name, items),
            VersionBlock::Description(text) => {
                html.push_str(&format!(
                    r#"<p class="changelogDescription">{}</p>"#,
                    render_inline(text)
                ));
            }
        }
    }

    html.push_str("</div>");
}

/// One categorized list inside a version panel.
fn render_section(html: &mut String, name: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    html.push_str(&format!(
        concat!(
            r#"<div class="changelogSection">"#,
            r#"<h4 class="changelogSectionTitle">{icon} {name}</h4>"#,
            "<ul>",
        ),
        icon = section_icon(name),
        name = escape(name),
    ));
    for item in items {
        html.push_str(&format!("<li>{}</li>", render_inline(item)));
    }
    html.push_str("</ul></div>");
}

/// Render one line of inline markdown to HTML.
///
/// Walks the pulldown-cmark event stream for the line, emitting text
/// (escaped), strong/emphasis, inline code, and links. Links get
/// `target="_blank"` and `rel="noopener noreferrer"`. Block-level
/// events (the wrapping paragraph) are dropped.
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for event in Parser::new(text) {
        match event {
            Event::Text(t) => out.push_str(&escape(&t)),
            // Raw HTML in the source is data, not markup.
            Event::Html(h) | Event::InlineHtml(h) => out.push_str(&escape(&h)),
            Event::Code(code) => {
                out.push_str("<code>");
                out.push_str(&escape(&code));
                out.push_str("</code>");
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                out.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    escape_attr(&dest_url)
                ));
            }
            Event::End(TagEnd::Link) => out.push_str("</a>"),
            Event::Start(Tag::Strong) => out.push_str("<strong>"),
            Event::End(TagEnd::Strong) => out.push_str("</strong>"),
            Event::Start(Tag::Emphasis) => out.push_str("<em>"),
            Event::End(TagEnd::Emphasis) => out.push_str("</em>"),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;

    fn version() -> ChangelogVersion {
        ChangelogVersion {
            id: "v120".to_string(),
            title: "v1.2.0".to_string(),
            date: DateTimeUtc::from_ymd(2024, 6, 15),
            blocks: vec![
                VersionBlock::Section {
                    name: "Added".to_string(),
                    items: vec!["New **[Rocket](https://example.com/r)** tool".to_string()],
                },
                VersionBlock::Description("Focus on polish.".to_string()),
            ],
        }
    }

    #[test]
    fn test_render_inline_link() {
        let html = render_inline("See [the docs](https://example.com/docs) now");
        assert_eq!(
            html,
            concat!(
                r#"See <a href="https://example.com/docs" target="_blank" "#,
                r#"rel="noopener noreferrer">the docs</a> now"#,
            )
        );
    }

    #[test]
    fn test_render_inline_bold_link() {
        let html = render_inline("**[Rocket](https://example.com/r)**");
        assert!(html.starts_with("<strong><a href=\"https://example.com/r\""));
        assert!(html.ends_with("</a></strong>"));
    }

    #[test]
    fn test_render_inline_escapes_text() {
        let html = render_inline("a <b> & c");
        assert_eq!(html, "a &lt;b&gt; &amp; c");
    }

    #[test]
    fn test_render_changelog_structure() {
        let html = render_changelog(&[version()]);
        assert!(
            html.contains(r##"<a href="#version-v120" class="tocLink">v1.2.0 (Jun 15, 2024)</a>"##)
        );
        assert!(html.contains(r#"<div id="version-v120" class="changelogVersion">"#));
        assert!(html.contains("June 15, 2024"));
        assert!(html.contains("\u{2728} Added"));
        assert!(html.contains(r#"<p class="changelogDescription">Focus on polish.</p>"#));
    }

    #[test]
    fn test_render_changelog_empty() {
        assert!(render_changelog(&[]).contains("No changelog entries found"));
    }

    #[test]
    fn test_render_fallback_escapes_url() {
        let html = render_fallback("https://example.com/log?a=1&b=2");
        assert!(html.contains("a=1&amp;b=2"));
    }
}
