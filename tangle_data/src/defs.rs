//! Serializable definitions of a story document.
//!
//! A story is an ordered list of passages. Order matters: when no start
//! passage is designated, the first passage is where play begins.

use serde::{Deserialize, Serialize};

/// A complete story document as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDef {
    #[serde(default)]
    pub title: String,
    /// Name of the designated start passage, if the document names one.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub passages: Vec<PassageDef>,
}

impl StoryDef {
    /// Name of the passage play should begin at: the designated start or the first passage.
    pub fn start_name(&self) -> Option<&str> {
        self.start
            .as_deref()
            .or_else(|| self.passages.first().map(|p| p.name.as_str()))
    }
}

/// One passage record: identifier, unique name and raw markup body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageDef {
    pub id: u32,
    pub name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
