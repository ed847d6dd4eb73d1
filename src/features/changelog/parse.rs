//! Changelog markdown parsing.
//!
//! The source document is the repository's CHANGELOG.md: version blocks
//! under `##` headings carrying an anchor id, a linked title, and an ISO
//! date; `###` section headings with a leading category emoji; `- ` list
//! items; and free-form `###` description lines. Everything else in the
//! document (its own description header, table of contents, and nav-link
//! lists) is skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::date::DateTimeUtc;

/// `## <a id="..."></a> ... [title](link) - YYYY-MM-DD`
static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"##\s*<a\s+id="([^"]+)"[^>]*></a>\s*[^\[]+\[([^\]]+)\]\([^)]+\)\s*-\s*(\d{4}-\d{2}-\d{2})"#,
    )
    .expect("version heading pattern")
});

/// `### <category emoji> Name`. The leading character must be one of
/// the category emojis; a heading without one is a description line.
static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"###\s*([\u{2795}\u{1f528}\u{1f6e0}\u{1f5d1}\u{270d}\u{1f6ab}\u{1f4dd}]",
        r"[\u{2795}\u{1f528}\u{1f6e0}\u{fe0f}\u{1f5d1}\u{270d}\u{1f6ab}\u{1f4dd}\s]*)(.+)",
    ))
    .expect("section heading pattern")
});

/// One version block of the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogVersion {
    /// Anchor id from the heading.
    pub id: String,
    /// Title text (the `[title]` part, may carry inline markdown).
    pub title: String,
    /// Release date.
    pub date: DateTimeUtc,
    /// Sections and descriptions, in document order.
    pub blocks: Vec<VersionBlock>,
}

/// One block inside a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionBlock {
    /// A categorized list (`### ➕ Added` and its items).
    Section { name: String, items: Vec<String> },
    /// A free-form description line.
    Description(String),
}

/// Parse the changelog into version blocks. Input must already be
/// LF-normalized.
pub fn parse_changelog(markdown: &str) -> Vec<ChangelogVersion> {
    let mut versions: Vec<ChangelogVersion> = Vec::new();
    let mut current: Option<ChangelogVersion> = None;
    let mut section: Option<String> = None;
    let mut items: Vec<String> = Vec::new();

    for raw_line in markdown.lines() {
        let line = raw_line.trim();
        if line.is_empty() || is_skipped(line) {
            continue;
        }

        if let Some(captures) = VERSION_HEADING.captures(line) {
            let Some(date) = DateTimeUtc::parse(&captures[3]) else {
                continue;
            };
            flush_section(&mut current, &mut section, &mut items);
            if let Some(finished) = current.take() {
                versions.push(finished);
            }
            current = Some(ChangelogVersion {
                id: captures[1].to_string(),
                title: captures[2].to_string(),
                date,
                blocks: Vec::new(),
            });
            continue;
        }

        let Some(version) = current.as_mut() else {
            continue;
        };

        if let Some(captures) = SECTION_HEADING.captures(line) {
            let name = captures[2].trim().to_string();
            flush_into(version, &mut section, &mut items);
            section = Some(name);
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            let item = item.trim();
            if item != "N/A" {
                items.push(item.to_string());
            }
            continue;
        }

        if let Some(description) = line.strip_prefix("### ") {
            let description = description.trim();
            if !description.is_empty() {
                flush_into(version, &mut section, &mut items);
                section = None;
                version
                    .blocks
                    .push(VersionBlock::Description(description.to_string()));
            }
        }
    }

    flush_section(&mut current, &mut section, &mut items);
    if let Some(finished) = current.take() {
        versions.push(finished);
    }
    versions
}

/// Lines of the changelog's own front matter and navigation that never
/// render.
fn is_skipped(line: &str) -> bool {
    (line.contains("\u{1f4da} \u{3022}") && line.contains("id=\"description\""))
        || line.contains("All notable changes and updates")
        || line.contains("\u{1f310} \u{3022} Table Of Contents")
        || (line.contains("id=\"content\"") && line.contains("Table Of Contents"))
        || line.starts_with("- **[\u{1f517}")
        || line.starts_with("- **[\u{1f4d6}")
        || line.starts_with("- **[\u{1f4e5}")
        || line.starts_with("- **\u{1f4da}")
}

/// Flush the pending section of the in-progress version, if any.
fn flush_section(
    current: &mut Option<ChangelogVersion>,
    section: &mut Option<String>,
    items: &mut Vec<String>,
) {
    if let Some(version) = current.as_mut() {
        flush_into(version, section, items);
    } else {
        section.take();
        items.clear();
    }
}

fn flush_into(version: &mut ChangelogVersion, section: &mut Option<String>, items: &mut Vec<String>) {
    if let Some(name) = section.take()
        && !items.is_empty()
    {
        version.blocks.push(VersionBlock::Section {
            name,
            items: std::mem::take(items),
        });
    }
    items.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "# \u{1f4da} \u{3022} Changelog <a id=\"description\"></a>\n",
        "All notable changes and updates to the project.\n",
        "## \u{1f310} \u{3022} Table Of Contents <a id=\"content\"></a>\n",
        "- **[\u{1f517} Website](https://example.com)**\n",
        "\n",
        "## <a id=\"v120\"></a> \u{1f3f7}\u{fe0f} [v1.2.0](https://example.com/v120) - 2024-06-15\n",
        "### \u{2795} Added\n",
        "- First feature\n",
        "- Second feature\n",
        "### \u{1f528} Fixed\n",
        "- N/A\n",
        "### This release focuses on polish.\n",
        "\n",
        "## <a id=\"v110\"></a> \u{1f3f7}\u{fe0f} [v1.1.0](https://example.com/v110) - 2024-05-01\n",
        "### \u{1f5d1}\u{fe0f} Removed\n",
        "- Legacy widget\n",
    );

    #[test]
    fn test_parses_versions() {
        let versions = parse_changelog(SAMPLE);
        assert_eq!(versions.len(), 2);

        let first = &versions[0];
        assert_eq!(first.id, "v120");
        assert_eq!(first.title, "v1.2.0");
        assert_eq!(first.date, DateTimeUtc::from_ymd(2024, 6, 15));

        let second = &versions[1];
        assert_eq!(second.id, "v110");
        assert_eq!(second.date, DateTimeUtc::from_ymd(2024, 5, 1));
    }

    #[test]
    fn test_sections_and_items() {
        let versions = parse_changelog(SAMPLE);
        let blocks = &versions[0].blocks;

        // The "Fixed" section held only N/A, so it never renders.
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            VersionBlock::Section { name, items } => {
                assert_eq!(name, "Added");
                assert_eq!(items, &["First feature", "Second feature"]);
            }
            other => panic!("expected section, got {other:?}"),
        }
        match &blocks[1] {
            VersionBlock::Description(text) => {
                assert_eq!(text, "This release focuses on polish.");
            }
            other => panic!("expected description, got {other:?}"),
        }
    }

    #[test]
    fn test_front_matter_is_skipped() {
        let versions = parse_changelog(SAMPLE);
        for version in &versions {
            for block in &version.blocks {
                if let VersionBlock::Description(text) = block {
                    assert!(!text.contains("Table Of Contents"));
                }
            }
        }
    }

    #[test]
    fn test_list_items_outside_versions_are_ignored() {
        let versions = parse_changelog("- stray item\n### stray heading\n");
        assert!(versions.is_empty());
    }

    #[test]
    fn test_invalid_date_skips_heading() {
        let versions = parse_changelog(
            "## <a id=\"x\"></a> \u{1f3f7}\u{fe0f} [vX](https://e.com) - 2024-13-40\n- item\n",
        );
        assert!(versions.is_empty());
    }
}
