//! Guard configuration.
//!
//! Read from a JSON file and/or `LEXGUARD_*` environment variables:
//!
//! ```json
//! {
//!     "lexicon_dir": "lexicon/vocabulary",
//!     "files": ["extra/ads.txt"],
//!     "urls": ["https://example.com/lists/violence.txt"],
//!     "cache_size": 4096,
//!     "boundary": "substring"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, Result};
use crate::guard::{Guard, GuardOptions};
use crate::lexicon::LexiconLoader;
use crate::matcher::BoundaryPolicy;

/// Lexicon directory used when nothing else is configured
pub const DEFAULT_LEXICON_DIR: &str = "lexicon/vocabulary";

/// Overrides `lexicon_dir`
pub const ENV_LEXICON_DIR: &str = "LEXGUARD_LEXICON_DIR";
/// Overrides `cache_size`
pub const ENV_CACHE_SIZE: &str = "LEXGUARD_CACHE_SIZE";
/// Overrides `boundary` (`substring` or `word`)
pub const ENV_BOUNDARY: &str = "LEXGUARD_BOUNDARY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Directory of `*.txt` word lists, one category per file
    pub lexicon_dir: Option<PathBuf>,
    /// Individual word-list files
    pub files: Vec<PathBuf>,
    /// Remote word lists
    pub urls: Vec<String>,
    /// Verdict cache size (0 disables)
    pub cache_size: usize,
    pub boundary: BoundaryPolicy,
}

impl GuardConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            GuardError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// Default directory plus environment overrides
    pub fn from_env() -> Result<Self> {
        Self {
            lexicon_dir: Some(PathBuf::from(DEFAULT_LEXICON_DIR)),
            ..Self::default()
        }
        .apply_env()
    }

    /// Overlay `LEXGUARD_*` environment variables
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup (unset or blank values are ignored)
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = var(ENV_LEXICON_DIR) {
            self.lexicon_dir = Some(PathBuf::from(dir));
        }
        if let Some(size) = var(ENV_CACHE_SIZE) {
            self.cache_size = size.trim().parse().map_err(|_| {
                GuardError::ConfigError(format!("Invalid {}: {}", ENV_CACHE_SIZE, size))
            })?;
        }
        if let Some(boundary) = var(ENV_BOUNDARY) {
            self.boundary = boundary.parse()?;
        }
        Ok(self)
    }

    /// Build the loader for the configured sources.
    ///
    /// A config naming no source at all is rejected: an empty lexicon would
    /// silently turn moderation off.
    pub fn loader(&self) -> Result<LexiconLoader> {
        if self.lexicon_dir.is_none() && self.files.is_empty() && self.urls.is_empty() {
            return Err(GuardError::ConfigError(
                "No lexicon sources configured".to_string(),
            ));
        }

        let mut loader = LexiconLoader::new();
        if let Some(ref dir) = self.lexicon_dir {
            loader = loader.with_dir(dir);
        }
        for file in &self.files {
            loader = loader.with_file(file);
        }
        for url in &self.urls {
            loader = loader.with_url(url.clone());
        }
        Ok(loader)
    }

    pub fn options(&self) -> GuardOptions {
        GuardOptions::new()
            .with_cache_size(self.cache_size)
            .with_boundary(self.boundary)
    }

    /// Build a lazy guard; the lexicon is read on first use.
    pub fn into_guard(self) -> Result<Guard> {
        Ok(Guard::new(self.loader()?, self.options()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_json_full() {
        let config = GuardConfig::from_json_str(
            r#"{
                "lexicon_dir": "/srv/lexicon",
                "files": ["a.txt"],
                "urls": ["https://example.com/b.txt"],
                "cache_size": 128,
                "boundary": "word"
            }"#,
        )
        .unwrap();

        assert_eq!(config.lexicon_dir, Some(PathBuf::from("/srv/lexicon")));
        assert_eq!(config.files, vec![PathBuf::from("a.txt")]);
        assert_eq!(config.urls.len(), 1);
        assert_eq!(config.cache_size, 128);
        assert_eq!(config.boundary, BoundaryPolicy::Word);
    }

    #[test]
    fn test_json_defaults() {
        let config = GuardConfig::from_json_str(r#"{"files": ["a.txt"]}"#).unwrap();
        assert!(config.lexicon_dir.is_none());
        assert_eq!(config.cache_size, 0);
        assert_eq!(config.boundary, BoundaryPolicy::Substring);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let result = GuardConfig::from_json_str(r#"{"lexicon": "x"}"#);
        assert!(matches!(result, Err(GuardError::Json(_))));
    }

    #[test]
    fn test_json_file_missing() {
        let result = GuardConfig::from_json_file("/nonexistent/guard.json");
        assert!(matches!(result, Err(GuardError::ConfigError(_))));
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.json");
        fs::write(&path, r#"{"lexicon_dir": "words", "cache_size": 8}"#).unwrap();

        let config = GuardConfig::from_json_file(&path).unwrap();
        assert_eq!(config.lexicon_dir, Some(PathBuf::from("words")));
        assert_eq!(config.cache_size, 8);
    }

    #[test]
    fn test_env_overrides() {
        let config = GuardConfig::default()
            .apply_env_with(env(&[
                (ENV_LEXICON_DIR, "/etc/words"),
                (ENV_CACHE_SIZE, " 512 "),
                (ENV_BOUNDARY, "word"),
            ]))
            .unwrap();

        assert_eq!(config.lexicon_dir, Some(PathBuf::from("/etc/words")));
        assert_eq!(config.cache_size, 512);
        assert_eq!(config.boundary, BoundaryPolicy::Word);
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let base = GuardConfig {
            cache_size: 7,
            ..GuardConfig::default()
        };
        let config = base
            .apply_env_with(env(&[(ENV_CACHE_SIZE, "  "), (ENV_LEXICON_DIR, "")]))
            .unwrap();
        assert_eq!(config.cache_size, 7);
        assert!(config.lexicon_dir.is_none());
    }

    #[test]
    fn test_env_invalid_values() {
        let result = GuardConfig::default().apply_env_with(env(&[(ENV_CACHE_SIZE, "lots")]));
        assert!(matches!(result, Err(GuardError::ConfigError(_))));

        let result = GuardConfig::default().apply_env_with(env(&[(ENV_BOUNDARY, "fuzzy")]));
        assert!(matches!(result, Err(GuardError::ConfigError(_))));
    }

    #[test]
    fn test_loader_requires_a_source() {
        assert!(matches!(
            GuardConfig::default().loader(),
            Err(GuardError::ConfigError(_))
        ));
        assert!(GuardConfig::default().into_guard().is_err());
    }

    #[test]
    fn test_into_guard_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("violence.txt"), "去你妈的\n").unwrap();

        let config = GuardConfig {
            lexicon_dir: Some(dir.path().to_path_buf()),
            cache_size: 16,
            ..GuardConfig::default()
        };
        let options = config.options();
        assert_eq!(options.cache_size, 16);

        let guard = config.into_guard().unwrap();
        assert!(!guard.is_ready());
        assert!(guard.contains_match("去你妈的！").unwrap());
    }
}
