//! Loading story documents into a [`PassageStore`].
//!
//! Three formats are understood, chosen by file extension:
//! - `.html` / `.htm`: a compiled Twine 2 story (`<tw-storydata>` holding
//!   `<tw-passagedata>` elements)
//! - `.json` / `.toml`: a serialized [`StoryDef`]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use tangle_data::{PassageDef, StoryDef};

use crate::store::PassageStore;

/// Load and validate the story at `path`.
///
/// # Errors
/// Errors bubble up from file IO, parsing, or story validation.
pub fn load_story(path: &Path) -> Result<PassageStore> {
    let def = load_story_def(path)?;
    info!(
        "loaded story \"{}\" ({} passages) from {}",
        def.title,
        def.passages.len(),
        path.display()
    );
    PassageStore::from_def(def).with_context(|| format!("while building passage store from {}", path.display()))
}

/// Parse the story document at `path` without validating it.
///
/// # Errors
/// Fails on IO errors, unknown extensions, or malformed documents.
pub fn load_story_def(path: &Path) -> Result<StoryDef> {
    let source = fs::read_to_string(path).with_context(|| format!("reading story file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "html" | "htm" => parse_twine_html(&source).with_context(|| format!("parsing Twine HTML {}", path.display())),
        "json" => serde_json::from_str(&source).with_context(|| format!("parsing story JSON {}", path.display())),
        "toml" => toml::from_str(&source).with_context(|| format!("parsing story TOML {}", path.display())),
        other => bail!("unsupported story format '.{other}' for {}", path.display()),
    }
}

/// Extract passages from compiled Twine 2 HTML.
///
/// The `startnode` pid of `<tw-storydata>` becomes the designated start passage
/// when a passage has that pid.
///
/// # Errors
/// Fails when there is no `<tw-storydata>` element, a tag is unterminated, or
/// no passages are present.
pub fn parse_twine_html(html: &str) -> Result<StoryDef> {
    let Some(sd_start) = html.find("<tw-storydata") else {
        bail!("no <tw-storydata> element found");
    };
    let sd_tag_end = html[sd_start..]
        .find('>')
        .context("unterminated <tw-storydata> tag")?;
    let sd_tag = &html[sd_start..sd_start + sd_tag_end];
    let title = extract_attr(sd_tag, "name").unwrap_or_default();
    let start_pid = extract_attr(sd_tag, "startnode").and_then(|pid| pid.parse::<u32>().ok());

    let mut passages = Vec::new();
    let mut search_from = sd_start;
    while let Some(found) = html[search_from..].find("<tw-passagedata") {
        let tag_start = search_from + found;
        let tag_end = html[tag_start..]
            .find('>')
            .map(|i| tag_start + i)
            .context("unterminated <tw-passagedata> tag")?;
        let tag = &html[tag_start..tag_end];

        let content_start = tag_end + 1;
        let content_end = html[content_start..]
            .find("</tw-passagedata>")
            .map_or(html.len(), |i| content_start + i);

        let id = extract_attr(tag, "pid")
            .and_then(|pid| pid.parse().ok())
            .unwrap_or_default();
        let tags = extract_attr(tag, "tags")
            .map(|tags| tags.split_whitespace().map(String::from).collect())
            .unwrap_or_default();
        passages.push(PassageDef {
            id,
            name: extract_attr(tag, "name").unwrap_or_default(),
            text: html_escape::decode_html_entities(&html[content_start..content_end]).into_owned(),
            tags,
        });
        search_from = (content_end + "</tw-passagedata>".len()).min(html.len());
    }

    if passages.is_empty() {
        bail!("no <tw-passagedata> elements found");
    }

    let start = start_pid.and_then(|pid| {
        let name = passages.iter().find(|p| p.id == pid).map(|p| p.name.clone());
        if name.is_none() {
            warn!("startnode {pid} matches no passage; starting at the first passage");
        }
        name
    });

    Ok(StoryDef { title, start, passages })
}

/// Value of `attr_name` in an HTML start tag, single or double quoted.
fn extract_attr(tag: &str, attr_name: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!(" {attr_name}={quote}");
        if let Some(start) = tag.find(&pattern) {
            let value_start = start + pattern.len();
            if let Some(end) = tag[value_start..].find(quote) {
                return Some(html_escape::decode_html_entities(&tag[value_start..value_start + end]).into_owned());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = r#"<html><body>
<tw-storydata name="Night &amp; Day" startnode="2" format="Harlowe">
<tw-passagedata pid="1" name="Title" tags="" position="0,0">Title screen [[Begin|start]]</tw-passagedata>
<tw-passagedata pid="2" name="start" tags="intro dark">You wake &quot;early&quot;. [[Out|outside]]</tw-passagedata>
<tw-passagedata pid="3" name='outside'>It is &lt;quiet&gt;.</tw-passagedata>
</tw-storydata></body></html>"#;

    #[test]
    fn twine_passages_are_extracted_in_order() {
        let story = parse_twine_html(STORY).unwrap();
        assert_eq!(story.title, "Night & Day");
        let names: Vec<_> = story.passages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Title", "start", "outside"]);
        assert_eq!(story.passages[1].tags, ["intro", "dark"]);
        assert_eq!(story.passages[2].id, 3);
    }

    #[test]
    fn twine_bodies_are_entity_decoded() {
        let story = parse_twine_html(STORY).unwrap();
        assert!(story.passages[1].text.contains("You wake \"early\"."));
        assert_eq!(story.passages[2].text, "It is <quiet>.");
    }

    #[test]
    fn startnode_selects_designated_start() {
        let story = parse_twine_html(STORY).unwrap();
        assert_eq!(story.start.as_deref(), Some("start"));

        let story = parse_twine_html(&STORY.replace("startnode=\"2\"", "startnode=\"9\"")).unwrap();
        assert_eq!(story.start, None);
        assert_eq!(story.start_name(), Some("Title"));
    }

    #[test]
    fn html_without_story_data_fails() {
        assert!(parse_twine_html("<html></html>").is_err());
        assert!(parse_twine_html("<tw-storydata name=\"x\"></tw-storydata>").is_err());
    }
}
