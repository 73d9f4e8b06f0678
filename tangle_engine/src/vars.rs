//! Variable environment for one play-through.

use std::collections::BTreeMap;

use log::debug;

/// Story variables, keyed by name without the leading `$`.
///
/// Lookups of unset names yield an empty string. Values persist for the
/// whole play-through and are only written by `(set:)` macros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, or `""` when it has never been set.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        debug!("set ${name} = {value}");
        self.values.insert(name, value);
    }

    /// Case-insensitive comparison of the current value of `name` against `expected`.
    pub fn matches(&self, name: &str, expected: &str) -> bool {
        self.get(name).to_lowercase() == expected.to_lowercase()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
