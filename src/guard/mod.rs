//! Guard module.
//!
//! Holds the current keyword automaton as an atomically swapped snapshot,
//! compiles it lazily on first use and replaces it on reload.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use lru::LruCache;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{GuardError, Result};
use crate::lexicon::{KeywordSet, LexiconLoader};
use crate::matcher::{compile_with, Automaton, BoundaryPolicy, Match};

/// Texts longer than this (in bytes) are never cached
pub const MAX_CACHED_TEXT_LEN: usize = 1024;

/// Cache value type: automaton generation and verdict
type CacheValue = (u64, bool);

/// Guard options.
#[derive(Debug, Clone, Default)]
pub struct GuardOptions {
    /// LRU cache size for `contains_match` verdicts (0 disables the cache)
    pub cache_size: usize,
    /// Boundary policy compiled into every automaton
    pub boundary: BoundaryPolicy,
}

impl GuardOptions {
    /// Create new guard options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set boundary policy.
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Screens text against the current lexicon.
///
/// Every scan works on the snapshot it loaded when it started; a concurrent
/// reload publishes a new automaton without disturbing scans already running
/// against the old one, which stays alive until its last reader drops it.
pub struct Guard {
    loader: Option<LexiconLoader>,
    options: GuardOptions,
    current: OnceCell<ArcSwap<Automaton>>,
    generation: AtomicU64,
    reload_lock: Mutex<()>,
    cache: Option<Mutex<LruCache<String, CacheValue>>>,
}

impl Guard {
    /// Create a guard that loads and compiles its lexicon on first use.
    pub fn new(loader: LexiconLoader, options: GuardOptions) -> Self {
        Self::with_parts(Some(loader), options)
    }

    /// Create a guard, loading and compiling the lexicon right away.
    pub fn load(loader: LexiconLoader, options: GuardOptions) -> Result<Self> {
        let guard = Self::new(loader, options);
        guard.snapshot()?;
        Ok(guard)
    }

    /// Create a ready guard from an in-memory keyword set.
    ///
    /// Such a guard has no sources, so [`Guard::refresh`] fails; use [`Guard::reload`].
    pub fn from_keywords(keywords: &KeywordSet, options: GuardOptions) -> Self {
        let guard = Self::with_parts(None, options);
        guard.reload(keywords);
        guard
    }

    fn with_parts(loader: Option<LexiconLoader>, options: GuardOptions) -> Self {
        let cache = NonZeroUsize::new(options.cache_size)
            .map(|size| Mutex::new(LruCache::new(size)));
        Self {
            loader,
            options,
            current: OnceCell::new(),
            generation: AtomicU64::new(0),
            reload_lock: Mutex::new(()),
            cache,
        }
    }

    /// Current automaton, compiling it first if this is the first use.
    ///
    /// Concurrent first callers block until the single compilation finishes.
    /// If loading fails the error is returned and the next call tries again.
    pub fn snapshot(&self) -> Result<Arc<Automaton>> {
        let current = self.current.get_or_try_init(|| {
            let keywords = self.load_keywords()?;
            Ok::<_, GuardError>(ArcSwap::new(self.build(&keywords)))
        })?;
        Ok(current.load_full())
    }

    /// True once an automaton has been compiled
    pub fn is_ready(&self) -> bool {
        self.current.get().is_some()
    }

    /// Generation of the current automaton (0 before the first compile)
    pub fn generation(&self) -> u64 {
        self.current
            .get()
            .map_or(0, |current| current.load().generation())
    }

    /// True if `text` contains a banned phrase.
    pub fn contains_match(&self, text: &str) -> Result<bool> {
        let automaton = self.snapshot()?;

        let cache = match &self.cache {
            Some(cache) if text.len() <= MAX_CACHED_TEXT_LEN => cache,
            _ => return Ok(automaton.contains_match(text)),
        };

        let generation = automaton.generation();
        if let Some(&(cached_generation, verdict)) = cache.lock().get(text) {
            if cached_generation == generation {
                return Ok(verdict);
            }
        }

        // Scan outside the lock; a racing reload only makes this entry stale.
        let verdict = automaton.contains_match(text);
        cache.lock().put(text.to_string(), (generation, verdict));
        Ok(verdict)
    }

    /// Leftmost banned phrase in `text`.
    pub fn first_match(&self, text: &str) -> Result<Option<Match>> {
        Ok(self.snapshot()?.first_match(text))
    }

    /// All non-overlapping banned phrases in `text`.
    pub fn find_all(&self, text: &str) -> Result<Vec<Match>> {
        let automaton = self.snapshot()?;
        let matches = automaton.find_iter(text).collect();
        Ok(matches)
    }

    /// Compile `keywords` and make it the automaton future calls observe.
    ///
    /// Returns the new generation once the swap is visible. A reload racing
    /// the lazy first compile waits for it, so generations only grow.
    pub fn reload(&self, keywords: &KeywordSet) -> u64 {
        let _lock = self.reload_lock.lock();

        let mut first = None;
        let current = self.current.get_or_init(|| {
            let automaton = self.build(keywords);
            first = Some(automaton.generation());
            ArcSwap::new(automaton)
        });
        if let Some(generation) = first {
            info!(new_keywords = keywords.len(), generation, "lexicon installed");
            return generation;
        }

        let automaton = self.build(keywords);
        let generation = automaton.generation();
        let old = current.swap(automaton);

        info!(
            old_keywords = old.keyword_count(),
            new_keywords = keywords.len(),
            generation,
            "lexicon reloaded"
        );
        generation
    }

    /// Re-read the configured sources and reload.
    ///
    /// On a load error the current automaton stays in place.
    pub fn refresh(&self) -> Result<u64> {
        let keywords = self.load_keywords()?;
        Ok(self.reload(&keywords))
    }

    /// [`Guard::refresh`] on the blocking thread pool.
    #[cfg(feature = "async")]
    pub async fn refresh_async(self: Arc<Self>) -> Result<u64> {
        tokio::task::spawn_blocking(move || self.refresh())
            .await
            .map_err(|e| GuardError::TaskFailed(e.to_string()))?
    }

    /// Drop all cached verdicts
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    fn load_keywords(&self) -> Result<KeywordSet> {
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| GuardError::ConfigError("No lexicon sources configured".to_string()))?;
        let lexicon = loader.load()?;
        debug!(keywords = lexicon.keyword_count(), "lexicon sources read");
        Ok(lexicon.into_keywords())
    }

    fn build(&self, keywords: &KeywordSet) -> Arc<Automaton> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Arc::new(compile_with(keywords, self.options.boundary).with_generation(generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::MemorySource;

    fn keywords(words: &[&str]) -> KeywordSet {
        KeywordSet::try_from_iter(words.iter().copied()).unwrap()
    }

    #[test]
    fn test_lazy_compile_on_first_use() {
        let loader = LexiconLoader::new().with_source(MemorySource::new("mem", ["坏话"]));
        let guard = Guard::new(loader, GuardOptions::new());
        assert!(!guard.is_ready());
        assert_eq!(guard.generation(), 0);

        assert!(guard.contains_match("这是一句坏话").unwrap());
        assert!(guard.is_ready());
        assert_eq!(guard.generation(), 1);

        // second use reuses the same snapshot
        let a = guard.snapshot().unwrap();
        let b = guard.snapshot().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_load_error_leaves_guard_uninitialized() {
        let loader = LexiconLoader::new().with_file("/nonexistent/lexicon/ads.txt");
        let guard = Guard::new(loader, GuardOptions::new());

        let err = guard.contains_match("text").unwrap_err();
        assert!(matches!(err, GuardError::Load(_)));
        assert!(!guard.is_ready());
    }

    #[test]
    fn test_eager_load_fails_fast() {
        let loader = LexiconLoader::new().with_dir("/nonexistent/lexicon/vocabulary");
        assert!(Guard::load(loader, GuardOptions::new()).is_err());
    }

    #[test]
    fn test_from_keywords_ready() {
        let guard = Guard::from_keywords(&keywords(&["spam"]), GuardOptions::new());
        assert!(guard.is_ready());
        assert_eq!(guard.generation(), 1);
        assert!(guard.contains_match("buy spam").unwrap());
        assert!(!guard.contains_match("buy eggs").unwrap());
    }

    #[test]
    fn test_refresh_without_sources_is_config_error() {
        let guard = Guard::from_keywords(&keywords(&["spam"]), GuardOptions::new());
        assert!(matches!(guard.refresh(), Err(GuardError::ConfigError(_))));
        // still serving the previous automaton
        assert!(guard.contains_match("spam").unwrap());
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let guard = Guard::from_keywords(&keywords(&["old"]), GuardOptions::new());
        let before = guard.snapshot().unwrap();

        let generation = guard.reload(&keywords(&["new"]));
        assert_eq!(generation, 2);
        assert!(guard.contains_match("new").unwrap());
        assert!(!guard.contains_match("old").unwrap());

        // the snapshot taken before the reload still answers with the old lexicon
        assert!(before.contains_match("old"));
        assert!(!before.contains_match("new"));
    }

    #[test]
    fn test_reload_before_first_use_skips_lazy_load() {
        let loader = LexiconLoader::new().with_file("/nonexistent/lexicon/ads.txt");
        let guard = Guard::new(loader, GuardOptions::new());

        guard.reload(&keywords(&["x"]));
        assert!(guard.contains_match("x").unwrap());
    }

    #[test]
    fn test_first_match_and_find_all() {
        let guard = Guard::from_keywords(&keywords(&["坏话", "spam"]), GuardOptions::new());
        let m = guard.first_match("这是一句坏话").unwrap().unwrap();
        assert_eq!((m.start, m.end), (4, 6));

        let all = guard.find_all("spam坏话").unwrap();
        assert_eq!(all.len(), 2);
        assert!(guard.first_match("clean").unwrap().is_none());
    }

    #[test]
    fn test_cache_respects_generation() {
        let options = GuardOptions::new().with_cache_size(16);
        let guard = Guard::from_keywords(&keywords(&["a"]), options);

        assert!(guard.contains_match("a").unwrap());
        assert!(guard.contains_match("a").unwrap()); // cached

        guard.reload(&keywords(&["b"]));
        assert!(!guard.contains_match("a").unwrap());
        assert!(guard.contains_match("b").unwrap());
    }

    #[test]
    fn test_cache_skips_long_text() {
        let options = GuardOptions::new().with_cache_size(4);
        let guard = Guard::from_keywords(&keywords(&["z"]), options);
        let long = "x".repeat(MAX_CACHED_TEXT_LEN + 1);
        assert!(!guard.contains_match(&long).unwrap());
        let cache = guard.cache.as_ref().unwrap();
        assert!(cache.lock().is_empty());

        guard.contains_match("short").unwrap();
        assert_eq!(cache.lock().len(), 1);
        guard.clear_cache();
        assert!(cache.lock().is_empty());
    }

    #[test]
    fn test_word_boundary_option() {
        let options = GuardOptions::new().with_boundary(BoundaryPolicy::Word);
        let guard = Guard::from_keywords(&keywords(&["ass"]), options);
        assert!(!guard.contains_match("classic").unwrap());
        assert!(guard.contains_match("you ass").unwrap());
    }

    #[test]
    fn test_refresh_picks_up_new_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ads.txt"), "加微信\n").unwrap();

        let guard = Guard::new(LexiconLoader::new().with_dir(dir.path()), GuardOptions::new());
        assert!(!guard.contains_match("新词").unwrap());

        std::fs::write(dir.path().join("extra.txt"), "新词\n").unwrap();
        assert_eq!(guard.refresh().unwrap(), 2);
        assert!(guard.contains_match("这是新词").unwrap());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_refresh_async() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ads.txt"), "加微信\n").unwrap();

        let guard = Arc::new(Guard::new(
            LexiconLoader::new().with_dir(dir.path()),
            GuardOptions::new(),
        ));
        let generation = Arc::clone(&guard).refresh_async().await.unwrap();
        assert_eq!(generation, 1);
        assert!(guard.contains_match("请加微信").unwrap());
    }
}
