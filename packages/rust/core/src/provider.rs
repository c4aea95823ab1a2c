//! The link-graph provider contract consumed by the resolver and the engine.

use std::collections::HashSet;

use async_trait::async_trait;
use wikiracer_shared::{Result, Title};

/// Outcome of fetching one article's outbound links.
///
/// Disambiguation and missing pages are ordinary variants here, inspected
/// by the engine rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkFetch {
    /// The article's outbound link titles.
    Links(HashSet<Title>),
    /// The article is a disambiguation page; its options stand in for links.
    Ambiguous(HashSet<Title>),
    /// The article does not exist.
    Missing,
    /// Any other provider failure, with a human-readable reason.
    Failed(String),
}

impl LinkFetch {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Links(_) => "links",
            Self::Ambiguous(_) => "ambiguous",
            Self::Missing => "missing",
            Self::Failed(_) => "failed",
        }
    }
}

/// A remote (or in-memory) source of article titles and their links.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    /// Candidate canonical titles for a free-text term, in provider order.
    ///
    /// An empty list is a valid answer. `Err` means the search itself could
    /// not be performed.
    async fn search(&self, term: &str) -> Result<Vec<Title>>;

    /// Outbound links of `title`. Never fails; failures are encoded in [`LinkFetch`].
    async fn links_of(&self, title: &Title) -> LinkFetch;
}

#[async_trait]
impl<'a, P: GraphProvider + ?Sized> GraphProvider for &'a P {
    async fn search(&self, term: &str) -> Result<Vec<Title>> {
        (**self).search(term).await
    }

    async fn links_of(&self, title: &Title) -> LinkFetch {
        (**self).links_of(title).await
    }
}
