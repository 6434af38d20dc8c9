//! Lexicon loading.
//!
//! Turns word-list sources (files, directories, streams, remote lists,
//! in-memory rows) into a single deduplicated [`KeywordSet`].

pub mod keywords;
pub mod loader;
pub mod source;

pub use keywords::KeywordSet;
pub use loader::{load_lexicon, parse_lines, Lexicon, LexiconLoader};
pub use source::{
    dir_sources, FileSource, LexiconSource, MemorySource, ReaderSource, UrlSource,
    WORD_LIST_EXTENSION,
};

#[cfg(feature = "async")]
pub use loader::load_lexicon_async;
#[cfg(feature = "async")]
pub use source::AsyncLexiconSource;
