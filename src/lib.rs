//! Lexicon Guard - single-pass banned-phrase detection for content moderation
//!
//! This library provides:
//! - Lexicon loading from word-list files, directories, streams, remote lists
//!   and in-memory rows, one keyword per line
//! - A character trie compiled into an immutable automaton
//! - Containment checks in one left-to-right pass, indexed by Unicode scalar
//!   value so CJK text without word boundaries is handled natively
//! - Lazy, compile-once snapshots that can be swapped atomically on reload
//!
//! # Example
//!
//! ```rust
//! use lexicon_guard::{Guard, GuardOptions, LexiconLoader, MemorySource};
//!
//! let loader = LexiconLoader::new()
//!     .with_source(MemorySource::new("violence", ["去你妈的"]))
//!     .with_source(MemorySource::new("ads", ["加微信"]));
//!
//! // Nothing is compiled until the first check
//! let guard = Guard::new(loader, GuardOptions::new());
//!
//! assert!(guard.contains_match("去你妈的！").unwrap());
//! assert!(!guard.contains_match("写得真好").unwrap());
//!
//! let m = guard.first_match("你去你妈的吗").unwrap().unwrap();
//! assert_eq!((m.start, m.end), (1, 5));
//! ```
//!
//! # Lexicon Format
//!
//! UTF-8 text, one keyword per line. Trailing whitespace is trimmed and blank
//! lines are ignored; everything else is kept verbatim and matched exactly
//! (case-sensitive). In a lexicon directory every `*.txt` file is one
//! category, named after the file stem:
//!
//! ```text
//! lexicon/vocabulary/
//!     ads.txt
//!     politics.txt
//!     violence.txt
//! ```
//!
//! # Matching Rules
//!
//! | Rule | Behavior |
//! |------|----------|
//! | Leftmost | the match with the smallest start offset wins |
//! | Longest at start | among keywords starting there, the deepest terminal wins |
//! | Offsets | scalar values, `end` exclusive |
//! | Boundaries | substring by default; [`BoundaryPolicy::Word`] optional |

pub mod config;
pub mod error;
pub mod global;
pub mod guard;
pub mod lexicon;
pub mod matcher;

// Re-export commonly used items
pub use config::GuardConfig;
pub use error::{GuardError, LexiconLoadError, LoadErrorKind, Result};
pub use guard::{Guard, GuardOptions, MAX_CACHED_TEXT_LEN};
pub use lexicon::{
    dir_sources, load_lexicon, FileSource, KeywordSet, Lexicon, LexiconLoader, LexiconSource,
    MemorySource, ReaderSource, UrlSource,
};
pub use matcher::{compile, compile_with, Automaton, BoundaryPolicy, Match};

#[cfg(feature = "async")]
pub use lexicon::{load_lexicon_async, AsyncLexiconSource};
