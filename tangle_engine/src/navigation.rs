//! Navigation through the passage graph.
//!
//! A [`Navigator`] is one play-through: the current passage, its variables and
//! the rendered text of the current passage.

use std::sync::Arc;

use log::info;

use crate::error::StoryError;
use crate::links::{Link, extract_links, strip_links};
use crate::markup::interpret;
use crate::store::PassageStore;
use crate::vars::Variables;

#[derive(Debug, Clone)]
pub struct Navigator {
    store: Arc<PassageStore>,
    current: String,
    vars: Variables,
    rendered: String,
}

impl Navigator {
    /// Begin a play-through at `start`, or at the store's start passage.
    ///
    /// # Errors
    /// - [`StoryError::UnknownPassage`] if `start` is not in the store
    /// - [`StoryError::MalformedMacro`] if the start passage cannot be rendered
    pub fn new(store: Arc<PassageStore>, start: Option<&str>) -> Result<Self, StoryError> {
        let current = start.unwrap_or(store.start_name()).to_string();
        let mut vars = Variables::new();
        let rendered = render(&store, &current, &mut vars)?;
        info!("play-through started at passage '{current}'");
        Ok(Self {
            store,
            current,
            vars,
            rendered,
        })
    }

    /// Text the player reads: rendered text without link markup.
    pub fn current_text(&self) -> String {
        strip_links(&self.rendered)
    }

    /// Outgoing links of the current passage, in display order.
    ///
    /// # Errors
    /// Returns [`StoryError::MalformedLink`] if the rendered text holds a malformed link.
    pub fn current_links(&self) -> Result<Vec<Link>, StoryError> {
        extract_links(&self.rendered)
    }

    /// A passage is terminal when it offers no links.
    ///
    /// # Errors
    /// Returns [`StoryError::MalformedLink`] if the rendered text holds a malformed link.
    pub fn is_terminal(&self) -> Result<bool, StoryError> {
        Ok(self.current_links()?.is_empty())
    }

    /// Move to `link.destination` and render it with the same variables.
    ///
    /// On error the navigator is left exactly as it was, variables included.
    ///
    /// # Errors
    /// - [`StoryError::UnknownPassage`] if the destination is not in the store
    /// - [`StoryError::MalformedMacro`] if the destination cannot be rendered
    pub fn follow(&mut self, link: &Link) -> Result<(), StoryError> {
        let mut vars = self.vars.clone();
        let rendered = render(&self.store, &link.destination, &mut vars)?;
        info!("'{}' -> '{}' via \"{}\"", self.current, link.destination, link.label);
        self.current.clone_from(&link.destination);
        self.vars = vars;
        self.rendered = rendered;
        Ok(())
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }
}

/// Interpret the named passage and drop `//` emphasis markers.
fn render(store: &PassageStore, name: &str, vars: &mut Variables) -> Result<String, StoryError> {
    let passage = store
        .get(name)
        .ok_or_else(|| StoryError::UnknownPassage(name.to_string()))?;
    let text = interpret(&passage.raw_text, vars)?;
    Ok(text.replace("//", ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator(pairs: &[(&str, &str)]) -> Navigator {
        let store = PassageStore::from_texts(pairs.iter().copied()).unwrap();
        Navigator::new(Arc::new(store), None).unwrap()
    }

    #[test]
    fn starts_at_first_passage() {
        let nav = navigator(&[("start", "Hello. [[On|next]]"), ("next", "Bye.")]);
        assert_eq!(nav.current_name(), "start");
        assert_eq!(nav.current_text(), "Hello.");
        assert_eq!(nav.current_links().unwrap(), vec![Link::new("On", "next")]);
        assert!(!nav.is_terminal().unwrap());
    }

    #[test]
    fn variables_persist_across_moves() {
        let mut nav = navigator(&[
            ("start", "(set: $lamp = lit)Dark hall. [[Enter|room]]"),
            ("room", "(if: $lamp is LIT)[You see a door.](else:)[Pitch black.]"),
        ]);
        nav.follow(&Link::new("Enter", "room")).unwrap();
        assert_eq!(nav.current_name(), "room");
        assert_eq!(nav.current_text(), "You see a door.");
        assert_eq!(nav.variables().get("lamp"), "lit");
        assert!(nav.is_terminal().unwrap());
    }

    #[test]
    fn unknown_destination_leaves_state_unchanged() {
        let mut nav = navigator(&[("start", "Here. [[Away|nowhere]]")]);
        let before = nav.current_text();
        let err = nav.follow(&Link::new("Away", "nowhere")).unwrap_err();
        assert_eq!(err, StoryError::UnknownPassage("nowhere".into()));
        assert_eq!(nav.current_name(), "start");
        assert_eq!(nav.current_text(), before);
    }

    #[test]
    fn unrenderable_destination_keeps_old_variables() {
        let mut nav = navigator(&[("start", "[[Go|bad]]"), ("bad", "(set: $x = 1)(if: broken)[?]")]);
        assert!(matches!(
            nav.follow(&Link::new("Go", "bad")),
            Err(StoryError::MalformedMacro { kind: "if", .. })
        ));
        assert_eq!(nav.current_name(), "start");
        assert!(nav.variables().is_empty());
    }

    #[test]
    fn emphasis_markers_are_dropped() {
        let nav = navigator(&[("start", "It was //very// late.")]);
        assert_eq!(nav.current_text(), "It was very late.");
    }

    #[test]
    fn explicit_start_must_exist() {
        let store = Arc::new(PassageStore::from_texts([("a", "x")]).unwrap());
        assert_eq!(
            Navigator::new(store, Some("zzz")).unwrap_err(),
            StoryError::UnknownPassage("zzz".into())
        );
    }
}
