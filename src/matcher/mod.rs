//! Keyword matching engine.
//!
//! [`compile`] turns a [`KeywordSet`](crate::lexicon::KeywordSet) into an
//! immutable [`Automaton`]; the automaton answers "does this text contain a
//! keyword" in a single left-to-right pass.
//!
//! ## Example
//!
//! ```
//! use lexicon_guard::lexicon::KeywordSet;
//! use lexicon_guard::matcher::compile;
//!
//! let keywords = KeywordSet::try_from_iter(["坏话"]).unwrap();
//! let automaton = compile(&keywords);
//!
//! assert!(automaton.contains_match("这是一句坏话"));
//! let m = automaton.first_match("这是一句坏话").unwrap();
//! assert_eq!((m.start, m.end), (4, 6));
//! assert!(!automaton.contains_match("这是一句好话"));
//! ```

mod automaton;
mod boundary;
pub mod trie;

pub use automaton::{compile, compile_with, Automaton, Match, Matches};
pub use boundary::BoundaryPolicy;
pub use trie::{Trie, TrieNode};

