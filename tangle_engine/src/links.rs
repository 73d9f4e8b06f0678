//! Choice links found in rendered passage text.
//!
//! Links are always derived from *rendered* text: a link inside a hidden
//! branch is never offered, and one revealed by a macro is.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::StoryError;

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]*)\]\]").expect("link pattern is valid"));

/// One outgoing choice: what the player sees and where it leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub destination: String,
}

impl Link {
    pub fn new(label: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Every `[[label|destination]]` in `rendered`, first to last.
///
/// The position in the returned list is the player's choice number minus one.
///
/// # Errors
/// Returns [`StoryError::MalformedLink`] for the first link without exactly one `|`;
/// no links are returned in that case.
pub fn extract_links(rendered: &str) -> Result<Vec<Link>, StoryError> {
    LINK.captures_iter(rendered)
        .map(|caps| {
            let inner = &caps[1];
            let mut parts = inner.split('|');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(label), Some(destination), None) => Ok(Link::new(label, destination)),
                _ => Err(StoryError::MalformedLink {
                    inner: inner.to_string(),
                }),
            }
        })
        .collect()
}

/// `rendered` with all link markup removed and trailing whitespace trimmed.
pub fn strip_links(rendered: &str) -> String {
    LINK.replace_all(rendered, "").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_returned_in_text_order() {
        let links = extract_links("Pick: [[A|p1]] or maybe [[B|p2]].").unwrap();
        assert_eq!(links, vec![Link::new("A", "p1"), Link::new("B", "p2")]);
        assert_eq!(links[0].to_string(), "A");
    }

    #[test]
    fn label_may_contain_spaces_and_punctuation() {
        let links = extract_links("[[Go outside, now!|outside]]").unwrap();
        assert_eq!(links[0].label, "Go outside, now!");
        assert_eq!(links[0].destination, "outside");
    }

    #[test]
    fn missing_or_extra_separator_is_malformed() {
        assert_eq!(
            extract_links("[[nowhere]]").unwrap_err(),
            StoryError::MalformedLink { inner: "nowhere".into() }
        );
        assert!(matches!(
            extract_links("[[ok|fine]] [[a|b|c]]"),
            Err(StoryError::MalformedLink { inner }) if inner == "a|b|c"
        ));
    }

    #[test]
    fn short_or_empty_link_is_malformed() {
        assert_eq!(
            extract_links("Go [[a]] now").unwrap_err(),
            StoryError::MalformedLink { inner: "a".into() }
        );
        assert!(matches!(
            extract_links("[[]]"),
            Err(StoryError::MalformedLink { inner }) if inner.is_empty()
        ));
        assert_eq!(strip_links("Go [[a]] now"), "Go  now");
    }

    #[test]
    fn text_without_links_has_none() {
        assert!(extract_links("The end. [not a link]").unwrap().is_empty());
    }

    #[test]
    fn stripping_removes_markup_and_trailing_space() {
        assert_eq!(strip_links("You wake up. [[Go outside|outside]]"), "You wake up.");
        assert_eq!(strip_links("[[A|a]] middle [[B|b]]\n\n"), " middle");
    }
}
