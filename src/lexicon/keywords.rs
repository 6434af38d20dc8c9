use std::collections::hash_set;
use std::collections::HashSet;

use crate::error::{GuardError, Result};

/// A deduplicated set of non-empty keywords.
///
/// Keywords are stored verbatim: no case folding or Unicode normalization is
/// applied, so matching is exact on the stored form. The empty string is
/// rejected on insertion, which keeps every terminal trie node tied to a
/// real keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: HashSet<String>,
}

impl KeywordSet {
    /// Create an empty keyword set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a keyword set, failing on the first empty keyword.
    pub fn try_from_iter<I, S>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for word in iter {
            set.insert(word)?;
        }
        Ok(set)
    }

    /// Insert a keyword. Returns `Ok(false)` if it was already present.
    pub fn insert(&mut self, word: impl Into<String>) -> Result<bool> {
        let word = word.into();
        if word.is_empty() {
            return Err(GuardError::EmptyKeyword);
        }
        Ok(self.words.insert(word))
    }

    /// Insert a keyword already known to be non-empty (loader lines are filtered first).
    pub(crate) fn insert_nonempty(&mut self, word: String) -> bool {
        debug_assert!(!word.is_empty());
        self.words.insert(word)
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: KeywordSet) {
        self.words.extend(other.words);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.words.iter()
    }

    /// Total number of scalar values across all keywords (upper bound on trie size)
    pub fn total_chars(&self) -> usize {
        self.words.iter().map(|w| w.chars().count()).sum()
    }
}

impl IntoIterator for KeywordSet {
    type Item = String;
    type IntoIter = hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
