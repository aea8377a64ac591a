//! Allow-list of tools that run without the virtual environment.
//!
//! Matching is a plain "starts with" test against the whole joined command
//! line, so an entry also matches any longer tool name it is a prefix of
//! (`node` matches `nodemon`). Callers rely on that behaviour; keep it.

use crate::tools;

/// Ordered set of tool names exempt from environment activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(tools::defaults().iter().copied())
    }
}

impl AllowList {
    /// Builds an allow-list, dropping repeated entries after their first occurrence.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self {
            entries: Vec::new(),
        };
        list.extend(entries);
        list
    }

    /// Appends entries not already present, preserving order.
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            let entry = entry.into();
            if !self.entries.contains(&entry) {
                self.entries.push(entry);
            }
        }
    }

    /// Returns the first entry the command line starts with.
    #[must_use]
    pub fn matches(&self, command: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| command.starts_with(entry.as_str()))
            .map(String::as_str)
    }

    /// Returns true if the command line starts with any entry.
    #[must_use]
    pub fn contains_match(&self, command: &str) -> bool {
        self.matches(command).is_some()
    }

    /// Entries in match order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
