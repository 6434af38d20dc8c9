//! Process-wide guard.
//!
//! Request handlers call [`check`] on every piece of untrusted text. The
//! guard behind it is either installed explicitly at startup with
//! [`install`], or built on first use from [`GuardConfig::from_env`].

use once_cell::sync::OnceCell;

use crate::config::GuardConfig;
use crate::error::Result;
use crate::guard::Guard;
use crate::lexicon::KeywordSet;

static GLOBAL: OnceCell<Guard> = OnceCell::new();

/// Install the process-wide guard.
///
/// Only the first install (or first lazy build) wins; a later guard is handed back.
pub fn install(guard: Guard) -> std::result::Result<(), Guard> {
    GLOBAL.set(guard)
}

/// The process-wide guard, building it from the environment if none was installed.
pub fn global() -> Result<&'static Guard> {
    GLOBAL.get_or_try_init(|| GuardConfig::from_env()?.into_guard())
}

/// True if `text` contains a banned phrase and must be rejected.
pub fn check(text: &str) -> Result<bool> {
    global()?.contains_match(text)
}

/// Swap the process-wide lexicon for `keywords`.
pub fn reload(keywords: &KeywordSet) -> Result<u64> {
    Ok(global()?.reload(keywords))
}
