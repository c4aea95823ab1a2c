//! Core domain types for Wikiracer link-graph races.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WikiracerError};

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// Canonical, case-sensitive identifier of one article in the link graph.
///
/// Equality is exact string equality. Canonicalization (redirects, casing)
/// is the provider's job, never the engine's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Wrap a string as a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Title {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Title {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Title {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Title {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Title {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A fully resolved `start` → `end` pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    start: Title,
    end: Title,
}

impl Coordinates {
    /// Build coordinates, rejecting blank titles.
    ///
    /// `start == end` is allowed; the engine still has to rediscover the
    /// target through some outbound link.
    pub fn new(start: Title, end: Title) -> Result<Self> {
        if start.as_str().trim().is_empty() {
            return Err(WikiracerError::validation("start title is empty"));
        }
        if end.as_str().trim().is_empty() {
            return Err(WikiracerError::validation("end title is empty"));
        }
        Ok(Self { start, end })
    }

    /// Where the race starts.
    pub fn start(&self) -> &Title {
        &self.start
    }

    /// Where the race ends.
    pub fn end(&self) -> &Title {
        &self.end
    }
}

// ---------------------------------------------------------------------------
// TraversalResult
// ---------------------------------------------------------------------------

/// Outcome of one traversal run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TraversalResult {
    /// `end` was discovered. The path starts at `start` and ends at `end`.
    PathFound {
        path: Vec<Title>,
        /// Number of distinct titles discovered before the search stopped.
        visited: usize,
    },
    /// The frontier was exhausted without discovering `end`.
    NotFound,
}

impl TraversalResult {
    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::PathFound { .. })
    }

    /// The found path, if any.
    pub fn path(&self) -> Option<&[Title]> {
        match self {
            Self::PathFound { path, .. } => Some(path),
            Self::NotFound => None,
        }
    }

    /// Number of link hops in the found path.
    pub fn hops(&self) -> Option<usize> {
        self.path().map(|p| p.len().saturating_sub(1))
    }
}

// ---------------------------------------------------------------------------
// RaceSettings
// ---------------------------------------------------------------------------

/// Raw, unresolved race terms as stored in a settings file:
/// `{"start": "...", "end": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSettings {
    /// Free-text term for the start article.
    pub start: String,
    /// Free-text term for the target article.
    pub end: String,
}
