use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Structural problems found in a `StoryDef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyStory,
    EmptyName { id: u32 },
    DuplicateName { name: String },
    MissingStart { name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyStory => write!(f, "story contains no passages"),
            ValidationError::EmptyName { id } => write!(f, "passage {id} has an empty name"),
            ValidationError::DuplicateName { name } => write!(f, "duplicate passage name '{name}'"),
            ValidationError::MissingStart { name } => {
                write!(f, "start passage '{name}' does not exist")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate passage names and the designated start of a `StoryDef`.
///
/// Link destinations are not checked here: a dangling link is an authoring
/// error that only shows up when a player follows it.
///
/// ```
/// use tangle_data::{PassageDef, StoryDef, ValidationError, validate_story};
///
/// let story = StoryDef {
///     title: "Demo".into(),
///     start: None,
///     passages: vec![PassageDef {
///         id: 1,
///         name: "start".into(),
///         text: "Hello. [[Onward|next]]".into(),
///         tags: Vec::new(),
///     }],
/// };
/// assert!(validate_story(&story).is_empty());
/// assert_eq!(validate_story(&StoryDef::default()), vec![ValidationError::EmptyStory]);
/// ```
pub fn validate_story(story: &StoryDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if story.passages.is_empty() {
        errors.push(ValidationError::EmptyStory);
    }

    let mut names = HashSet::new();
    for passage in &story.passages {
        if passage.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { id: passage.id });
            continue;
        }
        if !names.insert(passage.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                name: passage.name.clone(),
            });
        }
    }

    if let Some(start) = &story.start
        && !names.contains(start.as_str())
    {
        errors.push(ValidationError::MissingStart { name: start.clone() });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(names: &[&str]) -> StoryDef {
        StoryDef {
            title: "test".into(),
            start: None,
            passages: names
                .iter()
                .zip(1..)
                .map(|(name, id)| PassageDef {
                    id,
                    name: (*name).to_string(),
                    text: String::new(),
                    tags: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn duplicate_names_are_reported_once_per_repeat() {
        let errors = validate_story(&story(&["a", "b", "a"]));
        assert_eq!(errors, vec![ValidationError::DuplicateName { name: "a".into() }]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let errors = validate_story(&story(&["a", "  "]));
        assert_eq!(errors, vec![ValidationError::EmptyName { id: 2 }]);
    }

    #[test]
    fn designated_start_must_exist() {
        let mut def = story(&["a"]);
        def.start = Some("nowhere".into());
        let errors = validate_story(&def);
        assert_eq!(errors, vec![ValidationError::MissingStart { name: "nowhere".into() }]);
        assert_eq!(errors[0].to_string(), "start passage 'nowhere' does not exist");
    }
}
