//! Turn-by-turn driving of a play-through.
//!
//! The driver, human or otherwise, asks for a turn with an optional 1-based
//! choice and gets back one formatted block of text with numbered choices.

use std::fmt;

use log::info;
use variantly::Variantly;

use crate::error::StoryError;
use crate::links::Link;
use crate::navigation::Navigator;

/// Result of one turn. `Ended` is the normal end of the story, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum TurnOutcome {
    Ongoing(String),
    Ended(String),
}

impl TurnOutcome {
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Ongoing(text) | TurnOutcome::Ended(text) => text,
        }
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone)]
pub struct TurnController {
    nav: Navigator,
    turn: usize,
}

impl TurnController {
    pub fn new(nav: Navigator) -> Self {
        Self { nav, turn: 0 }
    }

    /// Play one turn.
    ///
    /// With `Some(n)` on a passage that has links, link `n` is followed first.
    /// A choice on a terminal passage is ignored.
    ///
    /// # Errors
    /// - [`StoryError::InvalidChoice`] if `n` is outside `1..=links`
    /// - any error from [`Navigator::follow`] or from link extraction
    ///
    /// Navigation state is unchanged on error.
    pub fn advance(&mut self, choice: Option<usize>) -> Result<TurnOutcome, StoryError> {
        if let Some(choice) = choice {
            let links = self.nav.current_links()?;
            if !links.is_empty() {
                let link = pick(&links, choice)?;
                self.nav.follow(link)?;
            }
        }
        self.turn += 1;
        info!("turn {} at passage '{}'", self.turn, self.nav.current_name());

        let links = self.nav.current_links()?;
        let block = format_block(&self.nav.current_text(), &links);
        if links.is_empty() {
            info!("story ended at passage '{}'", self.nav.current_name());
            Ok(TurnOutcome::Ended(block))
        } else {
            Ok(TurnOutcome::Ongoing(block))
        }
    }

    /// Number of turns played so far.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }
}

fn pick(links: &[Link], choice: usize) -> Result<&Link, StoryError> {
    choice
        .checked_sub(1)
        .and_then(|idx| links.get(idx))
        .ok_or_else(|| StoryError::InvalidChoice {
            input: choice.to_string(),
            available: links.len(),
        })
}

/// Parse driver input such as `"2"` into a choice number.
///
/// # Errors
/// Returns [`StoryError::InvalidChoice`] for non-numeric input or a number outside `1..=available`.
pub fn parse_choice(input: &str, available: usize) -> Result<usize, StoryError> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=available).contains(&n) => Ok(n),
        _ => Err(StoryError::InvalidChoice {
            input: trimmed.to_string(),
            available,
        }),
    }
}

/// Passage text followed by one `[i. label]` line per link.
pub fn format_block(text: &str, links: &[Link]) -> String {
    let mut lines = vec![text.to_string()];
    lines.extend(choice_lines(links));
    lines.join("\n")
}

/// One `[i. label]` line per link, numbered from 1.
pub fn choice_lines(links: &[Link]) -> Vec<String> {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| format!("[{}. {link}]", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::PassageStore;

    fn controller(pairs: &[(&str, &str)]) -> TurnController {
        let store = PassageStore::from_texts(pairs.iter().copied()).unwrap();
        TurnController::new(Navigator::new(Arc::new(store), None).unwrap())
    }

    #[test]
    fn choices_are_numbered_from_one() {
        let mut turns = controller(&[("a", "Fork. [[Left|l]] [[Right|r]]"), ("l", "L."), ("r", "R.")]);
        let outcome = turns.advance(None).unwrap();
        assert_eq!(outcome, TurnOutcome::Ongoing("Fork.\n[1. Left]\n[2. Right]".into()));
        let outcome = turns.advance(Some(2)).unwrap();
        assert!(outcome.is_ended());
        assert_eq!(outcome.text(), "R.");
        assert_eq!(turns.navigator().current_name(), "r");
        assert_eq!(turns.turn(), 2);
    }

    #[test]
    fn out_of_range_choice_is_rejected_without_moving() {
        let mut turns = controller(&[("a", "Fork. [[Left|l]]"), ("l", "L.")]);
        for bad in [0, 2] {
            assert_eq!(
                turns.advance(Some(bad)).unwrap_err(),
                StoryError::InvalidChoice {
                    input: bad.to_string(),
                    available: 1
                }
            );
        }
        assert_eq!(turns.navigator().current_name(), "a");
    }

    #[test]
    fn choice_on_terminal_passage_is_ignored() {
        let mut turns = controller(&[("only", "Nothing more.")]);
        assert!(turns.advance(None).unwrap().is_ended());
        assert_eq!(turns.advance(Some(3)).unwrap(), TurnOutcome::Ended("Nothing more.".into()));
    }

    #[test]
    fn choice_lines_do_not_depend_on_passage_layout() {
        let links = [Link::new("Up\nstairs", "attic"), Link::new("Down", "cellar")];
        assert_eq!(choice_lines(&links), ["[1. Up\nstairs]", "[2. Down]"]);
        assert_eq!(
            format_block("Hall.\n\nDark.", &links),
            "Hall.\n\nDark.\n[1. Up\nstairs]\n[2. Down]"
        );
        assert!(choice_lines(&[]).is_empty());
    }

    #[test]
    fn parse_choice_accepts_only_numbers_in_range() {
        assert_eq!(parse_choice(" 2 ", 3).unwrap(), 2);
        assert!(matches!(parse_choice("two", 3), Err(StoryError::InvalidChoice { .. })));
        assert!(matches!(parse_choice("4", 3), Err(StoryError::InvalidChoice { available: 3, .. })));
        assert!(parse_choice("-1", 3).is_err());
    }
}
