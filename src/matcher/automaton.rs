//! Compiled keyword automaton and the single-pass scan.
//!
//! The scan moves a cursor over the input one scalar value at a time. At each
//! position it walks the trie as far as the text allows and remembers the
//! deepest terminal node it passed; if there was one, that keyword is the
//! leftmost (and, at that start, longest) match. Otherwise the cursor moves on
//! by exactly one scalar value. Offsets reported to callers are counted in
//! scalar values, not bytes.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::boundary::BoundaryPolicy;
use super::trie::{KeywordId, Trie};
use crate::lexicon::KeywordSet;

/// A keyword occurrence. `start`/`end` are scalar-value offsets, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Match {
    /// Length of the match in scalar values
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Raw scan hit carrying both byte and scalar offsets
#[derive(Debug, Clone, Copy)]
struct Hit {
    byte_start: usize,
    byte_end: usize,
    start: usize,
    end: usize,
    keyword: KeywordId,
}

/// Immutable matching structure compiled from a keyword set.
///
/// Scans take `&self` and touch no shared mutable state, so any number of
/// threads may scan the same automaton at once.
#[derive(Debug, Clone)]
pub struct Automaton {
    trie: Trie,
    boundary: BoundaryPolicy,
    generation: u64,
}

/// Compile a keyword set with the default (substring) boundary policy.
pub fn compile(keywords: &KeywordSet) -> Automaton {
    compile_with(keywords, BoundaryPolicy::default())
}

/// Compile a keyword set with an explicit boundary policy.
///
/// Never fails: `KeywordSet` holds no empty keywords, and an empty set yields
/// a root-only automaton that matches nothing.
pub fn compile_with(keywords: &KeywordSet, boundary: BoundaryPolicy) -> Automaton {
    let mut trie = Trie::with_capacity(keywords.total_chars() + 1);
    for word in keywords {
        trie.insert(word);
    }

    info!(
        keywords = trie.keyword_count(),
        nodes = trie.node_count(),
        boundary = %boundary,
        "compiled keyword automaton"
    );

    Automaton {
        trie,
        boundary,
        generation: 0,
    }
}

impl Automaton {
    /// True if any keyword occurs in `text`.
    pub fn contains_match(&self, text: &str) -> bool {
        self.next_hit(text, 0, 0).is_some()
    }

    /// Leftmost match, taking the longest keyword at that start.
    pub fn first_match(&self, text: &str) -> Option<Match> {
        self.next_hit(text, 0, 0).map(|hit| self.to_match(text, hit))
    }

    /// All non-overlapping matches from left to right.
    ///
    /// After a match the scan resumes at the match end.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> Matches<'a> {
        Matches {
            automaton: self,
            text,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    /// Distinct keywords occurring in `text`, in order of first occurrence.
    pub fn matched_keywords(&self, text: &str) -> Vec<&str> {
        let mut seen: Vec<KeywordId> = Vec::new();
        let mut byte_pos = 0;
        let mut char_pos = 0;
        while let Some(hit) = self.next_hit(text, byte_pos, char_pos) {
            if !seen.contains(&hit.keyword) {
                seen.push(hit.keyword);
            }
            byte_pos = hit.byte_end;
            char_pos = hit.end;
        }
        seen.into_iter().map(|id| self.trie.keyword(id)).collect()
    }

    /// Number of distinct keywords compiled in
    pub fn keyword_count(&self) -> usize {
        self.trie.keyword_count()
    }

    /// Number of trie nodes including the root
    pub fn node_count(&self) -> usize {
        self.trie.node_count()
    }

    /// Compiled keywords in no particular order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.trie.keywords()
    }

    /// Exact keyword membership (not a substring scan)
    pub fn has_keyword(&self, word: &str) -> bool {
        self.trie.contains(word)
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Reload generation this automaton was published under (0 if never published)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Scan forward from `byte_from` (which sits at scalar offset `char_from`).
    fn next_hit(&self, text: &str, byte_from: usize, char_from: usize) -> Option<Hit> {
        if self.trie.is_empty() {
            return None;
        }

        let mut prev = text[..byte_from].chars().next_back();
        let mut char_pos = char_from;

        for (offset, ch) in text[byte_from..].char_indices() {
            let byte_pos = byte_from + offset;
            if let Some(hit) = self.longest_at(text, byte_pos, char_pos, prev) {
                return Some(hit);
            }
            prev = Some(ch);
            char_pos += 1;
        }

        None
    }

    /// Walk the trie from the root along `text[byte_start..]`, keeping the
    /// deepest terminal node the boundary policy accepts.
    #[inline]
    fn longest_at(
        &self,
        text: &str,
        byte_start: usize,
        char_start: usize,
        prev: Option<char>,
    ) -> Option<Hit> {
        if !self.boundary.accepts_start(prev) {
            return None;
        }

        let rest = &text[byte_start..];
        let mut node = Trie::ROOT;
        let mut depth = 0;
        let mut best = None;

        for (offset, ch) in rest.char_indices() {
            node = match self.trie.child(node, ch) {
                Some(next) => next,
                None => break,
            };
            depth += 1;

            if let Some(keyword) = self.trie.keyword_at(node) {
                let byte_end = offset + ch.len_utf8();
                if self.boundary.accepts_end(rest[byte_end..].chars().next()) {
                    best = Some(Hit {
                        byte_start,
                        byte_end: byte_start + byte_end,
                        start: char_start,
                        end: char_start + depth,
                        keyword,
                    });
                }
            }
        }

        best
    }

    fn to_match(&self, text: &str, hit: Hit) -> Match {
        Match {
            start: hit.start,
            end: hit.end,
            text: text[hit.byte_start..hit.byte_end].to_string(),
        }
    }
}

/// Iterator over non-overlapping matches, see [`Automaton::find_iter`].
pub struct Matches<'a> {
    automaton: &'a Automaton,
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let hit = self
            .automaton
            .next_hit(self.text, self.byte_pos, self.char_pos)?;
        self.byte_pos = hit.byte_end;
        self.char_pos = hit.end;
        Some(self.automaton.to_match(self.text, hit))
    }
}
