use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{LexiconLoadError, LoadErrorKind};

#[cfg(feature = "async")]
use async_trait::async_trait;

/// File extension of word list files inside a lexicon directory
pub const WORD_LIST_EXTENSION: &str = "txt";

type SourceResult<T> = std::result::Result<T, LexiconLoadError>;

/// A named provider of word-list text, one candidate keyword per line.
///
/// The matcher never touches the file system itself; anything that can
/// produce text (files, database rows, remote config) plugs in here.
pub trait LexiconSource: Send + Sync {
    /// Name used in logs and error reports
    fn name(&self) -> &str;

    /// Category the words of this source belong to
    fn category(&self) -> &str {
        self.name()
    }

    /// Read the full text of the source
    fn read_text(&self) -> SourceResult<String>;
}

/// Word-list provider that can be read without blocking the runtime.
#[cfg(feature = "async")]
#[async_trait]
pub trait AsyncLexiconSource: LexiconSource {
    /// Read the full text of the source asynchronously
    async fn fetch_text(&self) -> SourceResult<String>;
}

/// Word list stored in a UTF-8 file. The category is the file stem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
    category: String,
}

impl FileSource {
    /// Create a new file source
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        let category = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        Self {
            path,
            name,
            category,
        }
    }

    /// Override the category derived from the file name
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LexiconSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn read_text(&self) -> SourceResult<String> {
        fs::read_to_string(&self.path).map_err(|e| LexiconLoadError::from_io(&self.name, e))
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncLexiconSource for FileSource {
    async fn fetch_text(&self) -> SourceResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LexiconLoadError::from_io(&self.name, e))
    }
}

/// Collect a file source for every `*.txt` word list in `dir`, sorted by file name.
///
/// A missing or unreadable directory is an error, never an empty source list.
pub fn dir_sources(dir: impl AsRef<Path>) -> SourceResult<Vec<FileSource>> {
    let dir = dir.as_ref();
    let name = dir.display().to_string();

    let entries = fs::read_dir(dir).map_err(|e| LexiconLoadError::from_io(&name, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LexiconLoadError::from_io(&name, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| LexiconLoadError::from_io(path.display().to_string(), e))?;

        if !file_type.is_file() {
            continue;
        }
        let is_word_list = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(WORD_LIST_EXTENSION));
        if !is_word_list {
            debug!(path = %path.display(), "skipping non word-list file");
            continue;
        }
        paths.push(path);
    }

    paths.sort();
    Ok(paths.into_iter().map(FileSource::new).collect())
}

/// In-memory word list (tests, rows already fetched from a database)
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    words: Vec<String>,
}

impl MemorySource {
    pub fn new<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl LexiconSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> SourceResult<String> {
        Ok(self.words.join("\n"))
    }
}

/// Word list read from an arbitrary stream.
///
/// The stream is drained on the first successful read and its text kept, so
/// a loader that fails on another source can be retried with the same words.
pub struct ReaderSource {
    name: String,
    reader: Mutex<Option<Box<dyn Read + Send>>>,
    text: OnceCell<String>,
}

impl ReaderSource {
    pub fn new(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Mutex::new(Some(Box::new(reader))),
            text: OnceCell::new(),
        }
    }
}

impl LexiconSource for ReaderSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> SourceResult<String> {
        let text = self.text.get_or_try_init(|| {
            let mut reader = self.reader.lock().take().ok_or_else(|| {
                LexiconLoadError::new(
                    &self.name,
                    LoadErrorKind::Io,
                    "stream failed on an earlier read",
                )
            })?;

            let mut text = String::new();
            reader
                .read_to_string(&mut text)
                .map_err(|e| LexiconLoadError::from_io(&self.name, e))?;
            Ok::<_, LexiconLoadError>(text)
        })?;
        Ok(text.clone())
    }
}

/// Word list fetched over HTTP(S).
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
    category: String,
}

impl UrlSource {
    /// Create a new URL source. The category defaults to the stem of the last path segment.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let category = url_category(&url);
        Self { url, category }
    }

    /// Override the category derived from the URL
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

impl LexiconSource for UrlSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn read_text(&self) -> SourceResult<String> {
        debug!(url = %self.url, "fetching remote word list");

        let response = ureq::get(self.url.as_str()).call().map_err(|e| {
            LexiconLoadError::new(
                &self.url,
                LoadErrorKind::DownloadFailed,
                format!("Download failed: {}", e),
            )
        })?;

        let (_, body) = response.into_parts();
        let mut reader = body.into_reader();
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| LexiconLoadError::from_io(&self.url, e))?;
        Ok(text)
    }
}

/// "https://host/lists/ads.txt?v=2" -> "ads"
fn url_category(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    let stem = segment
        .rsplit_once('.')
        .map_or(segment, |(stem, _)| stem);
    if stem.is_empty() {
        url.to_string()
    } else {
        stem.to_string()
    }
}
