//! Immutable passage store built once from a story document.

use std::collections::HashMap;

use anyhow::{Result, bail};
use log::info;
use tangle_data::{PassageDef, StoryDef, validate_story};

/// One named node of the story graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub id: u32,
    pub name: String,
    pub raw_text: String,
}

/// Passages keyed by name, plus the name play starts at.
///
/// The store is never mutated after construction, so a single store can back
/// any number of independent play-throughs.
#[derive(Debug, Clone)]
pub struct PassageStore {
    title: String,
    passages: HashMap<String, Passage>,
    start: String,
}

impl PassageStore {
    /// Build a store from a validated story document.
    ///
    /// # Errors
    /// Returns every validation problem of `def` as a single aggregated error.
    pub fn from_def(def: StoryDef) -> Result<Self> {
        let errors = validate_story(&def);
        if !errors.is_empty() {
            let details = errors
                .into_iter()
                .map(|err| format!("- {err}"))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("story validation failed:\n{details}");
        }

        let start = def.start_name().unwrap_or_default().to_string();
        let passages = def
            .passages
            .into_iter()
            .map(|PassageDef { id, name, text, .. }| {
                (
                    name.clone(),
                    Passage {
                        id,
                        name,
                        raw_text: text,
                    },
                )
            })
            .collect::<HashMap<_, _>>();
        info!("passage store built: {} passages, start at '{start}'", passages.len());

        Ok(Self {
            title: def.title,
            passages,
            start,
        })
    }

    /// Build a store from `(name, raw_text)` pairs; ids are assigned from 1 in order
    /// and the first pair is the start passage.
    ///
    /// # Errors
    /// Fails if `pairs` is empty or repeats a name.
    pub fn from_texts<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let passages = pairs
            .into_iter()
            .zip(1..)
            .map(|((name, text), id)| PassageDef {
                id,
                name: name.to_string(),
                text: text.to_string(),
                tags: Vec::new(),
            })
            .collect();
        Self::from_def(StoryDef {
            title: String::new(),
            start: None,
            passages,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Passage> {
        self.passages.get(name)
    }

    /// The designated start passage, or the first passage of the document.
    pub fn start_name(&self) -> &str {
        &self.start
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}
