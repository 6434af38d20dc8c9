use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::LexiconLoadError;

use super::keywords::KeywordSet;
use super::source::{dir_sources, FileSource, LexiconSource, UrlSource};

#[cfg(feature = "async")]
use super::source::AsyncLexiconSource;

type LoadResult<T> = std::result::Result<T, LexiconLoadError>;

/// Split word-list text into candidate keywords.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. A leading byte-order mark is
/// dropped, trailing whitespace is trimmed from every line, and lines left
/// empty are skipped. Leading whitespace, case and punctuation are kept verbatim.
pub fn parse_lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.split(['\n', '\r'])
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
}

/// Keywords grouped by category, plus the flattened keyword set.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    categories: BTreeMap<String, Vec<String>>,
    keywords: KeywordSet,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the lines of `text` to `category`. Returns the number of lines kept.
    pub fn add_text(&mut self, category: &str, text: &str) -> usize {
        let words = self.categories.entry(category.to_string()).or_default();
        let mut kept = 0;
        for line in parse_lines(text) {
            words.push(line.to_string());
            self.keywords.insert_nonempty(line.to_string());
            kept += 1;
        }
        kept
    }

    /// Category names in sorted order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Words of a single category, in source order
    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Number of distinct keywords across all categories
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn into_keywords(self) -> KeywordSet {
        self.keywords
    }
}

/// Load every source into one deduplicated keyword set.
///
/// Fails on the first unreadable source; nothing is returned for a partial load.
pub fn load_lexicon(sources: &[Box<dyn LexiconSource>]) -> LoadResult<KeywordSet> {
    let mut lexicon = Lexicon::new();
    for source in sources {
        load_source(&mut lexicon, source.as_ref())?;
    }
    Ok(lexicon.into_keywords())
}

/// Async variant of [`load_lexicon`] keeping categories.
#[cfg(feature = "async")]
pub async fn load_lexicon_async(sources: &[Box<dyn AsyncLexiconSource>]) -> LoadResult<Lexicon> {
    let mut lexicon = Lexicon::new();
    for source in sources {
        let text = source.fetch_text().await?;
        let kept = lexicon.add_text(source.category(), &text);
        debug!(source = source.name(), kept, "loaded word list");
    }
    warn_if_empty(&lexicon);
    Ok(lexicon)
}

fn load_source(lexicon: &mut Lexicon, source: &dyn LexiconSource) -> LoadResult<()> {
    let text = source.read_text()?;
    let kept = lexicon.add_text(source.category(), &text);
    debug!(
        source = source.name(),
        category = source.category(),
        kept,
        "loaded word list"
    );
    Ok(())
}

fn warn_if_empty(lexicon: &Lexicon) {
    if lexicon.keyword_count() == 0 {
        warn!("lexicon loaded with zero keywords, nothing will be matched");
    }
}

/// Collects lexicon sources and loads them on demand.
///
/// Directories are expanded at load time, so a reload picks up word lists
/// added since the loader was built.
#[derive(Default)]
pub struct LexiconLoader {
    dirs: Vec<PathBuf>,
    sources: Vec<Box<dyn LexiconSource>>,
}

impl LexiconLoader {
    /// Create a new loader with no sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every `*.txt` word list in a directory (one category per file)
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Add a single word-list file
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_source(FileSource::new(path))
    }

    /// Add a remote word list
    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.with_source(UrlSource::new(url))
    }

    /// Add any source
    pub fn with_source(mut self, source: impl LexiconSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// True if no directory or source has been configured
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.sources.is_empty()
    }

    /// Read all sources into a categorized lexicon.
    pub fn load(&self) -> LoadResult<Lexicon> {
        let mut lexicon = Lexicon::new();

        for dir in &self.dirs {
            for source in dir_sources(dir)? {
                load_source(&mut lexicon, &source)?;
            }
        }
        for source in &self.sources {
            load_source(&mut lexicon, source.as_ref())?;
        }

        debug!(
            categories = lexicon.categories.len(),
            keywords = lexicon.keyword_count(),
            "lexicon loaded"
        );
        warn_if_empty(&lexicon);
        Ok(lexicon)
    }
}
