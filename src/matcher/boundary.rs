use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GuardError;

/// Decides whether a keyword found inside the text counts as a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Any occurrence counts, including one embedded in a longer token.
    #[default]
    Substring,
    /// The scalar before the match and the scalar after it must not be word
    /// characters (ASCII letters, ASCII digits and `_`). CJK text has no such
    /// characters, so keywords still match inside CJK runs.
    Word,
}

impl BoundaryPolicy {
    /// Whether a match may begin right after `prev` (`None` = start of text)
    #[inline]
    pub fn accepts_start(self, prev: Option<char>) -> bool {
        match self {
            BoundaryPolicy::Substring => true,
            BoundaryPolicy::Word => !prev.is_some_and(is_word_char),
        }
    }

    /// Whether a match may end right before `next` (`None` = end of text)
    #[inline]
    pub fn accepts_end(self, next: Option<char>) -> bool {
        match self {
            BoundaryPolicy::Substring => true,
            BoundaryPolicy::Word => !next.is_some_and(is_word_char),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Substring => "substring",
            BoundaryPolicy::Word => "word",
        }
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

impl FromStr for BoundaryPolicy {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(BoundaryPolicy::Substring),
            "word" => Ok(BoundaryPolicy::Word),
            other => Err(GuardError::ConfigError(format!(
                "Unknown boundary policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
