//! Error kinds surfaced by the interpreter, link extractor and navigation engine.
//!
//! Each kind aborts the operation that raised it and leaves navigation state
//! untouched. Unset variables are never an error; they read as empty strings.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    /// An `if` or `set` macro whose arguments do not have the required shape.
    #[error("malformed ({kind}:) macro: {token}")]
    MalformedMacro { kind: &'static str, token: String },
    /// A `[[...]]` link without exactly one `|` separator.
    #[error("malformed link [[{inner}]]: expected exactly one '|' between label and destination")]
    MalformedLink { inner: String },
    #[error("no passage named '{0}' in this story")]
    UnknownPassage(String),
    #[error("invalid choice '{input}': pick a number from 1 to {available}")]
    InvalidChoice { input: String, available: usize },
}
