//! In-memory [`GraphProvider`] for offline races and tests.
//!
//! The graph can be built programmatically or loaded from JSON:
//!
//! ```json
//! {
//!   "links":     { "A": ["B", "C"], "B": ["D"] },
//!   "search":    { "Mercury": ["Mercury (planet)", "Mercury (element)"] },
//!   "ambiguous": { "Mercury": ["Mercury (planet)", "Mercury (element)"] },
//!   "missing":   ["Ghost"],
//!   "failing":   ["Flaky"]
//! }
//! ```
//!
//! Titles with no `links` entry (and not listed elsewhere) are treated as
//! missing. Search falls back to an exact title match when a term has no
//! explicit entry; any title named anywhere in the graph, link targets
//! included, matches unless it is listed as missing.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use wikiracer_shared::{Result, Title, WikiracerError};

use crate::provider::{GraphProvider, LinkFetch};

/// Serialized form of a [`MemoryGraph`].
#[derive(Debug, Default, Deserialize)]
struct GraphFile {
    #[serde(default)]
    links: HashMap<String, Vec<String>>,
    #[serde(default)]
    search: HashMap<String, Vec<String>>,
    #[serde(default)]
    ambiguous: HashMap<String, Vec<String>>,
    #[serde(default)]
    missing: Vec<String>,
    #[serde(default)]
    failing: Vec<String>,
}

/// Deterministic link graph held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    links: HashMap<Title, HashSet<Title>>,
    search: HashMap<String, Vec<Title>>,
    ambiguous: HashMap<Title, HashSet<Title>>,
    missing: HashSet<Title>,
    failing: HashSet<Title>,
    fetches: AtomicUsize,
    fetch_log: Mutex<Vec<Title>>,
}

impl MemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(vertex, links)` pairs.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        edges
            .into_iter()
            .fold(Self::new(), |graph, (vertex, links)| {
                graph.with_links(vertex, links.iter().copied())
            })
    }

    /// Add outbound links for `vertex` (merged with any existing ones).
    pub fn with_links<'a>(
        mut self,
        vertex: &str,
        links: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.links
            .entry(Title::from(vertex))
            .or_default()
            .extend(links.into_iter().map(Title::from));
        self
    }

    /// Register search results for a free-text term.
    pub fn with_search<'a>(
        mut self,
        term: &str,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.search.insert(
            term.to_string(),
            candidates.into_iter().map(Title::from).collect(),
        );
        self
    }

    /// Mark `vertex` as a disambiguation page with the given options.
    pub fn with_ambiguous<'a>(
        mut self,
        vertex: &str,
        options: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.ambiguous.insert(
            Title::from(vertex),
            options.into_iter().map(Title::from).collect(),
        );
        self
    }

    /// Mark `vertex` as a page that does not exist.
    pub fn with_missing(mut self, vertex: &str) -> Self {
        self.missing.insert(Title::from(vertex));
        self
    }

    /// Mark `vertex` as a page whose fetch always fails.
    pub fn with_failing(mut self, vertex: &str) -> Self {
        self.failing.insert(Title::from(vertex));
        self
    }

    /// Parse a graph from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: GraphFile = serde_json::from_str(json)
            .map_err(|e| WikiracerError::parse(format!("invalid graph JSON: {e}")))?;

        let to_set = |titles: Vec<String>| -> HashSet<Title> {
            titles.into_iter().map(Title::from).collect()
        };

        Ok(Self {
            links: file
                .links
                .into_iter()
                .map(|(k, v)| (Title::from(k), to_set(v)))
                .collect(),
            search: file
                .search
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().map(Title::from).collect()))
                .collect(),
            ambiguous: file
                .ambiguous
                .into_iter()
                .map(|(k, v)| (Title::from(k), to_set(v)))
                .collect(),
            missing: file.missing.into_iter().map(Title::from).collect(),
            failing: file.failing.into_iter().map(Title::from).collect(),
            ..Self::default()
        })
    }

    /// Load a graph from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WikiracerError::io(path, e))?;
        Self::from_json(&content)
    }

    /// Number of `links_of` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Titles passed to `links_of`, in call order.
    pub fn fetched(&self) -> Vec<Title> {
        self.fetch_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn is_known(&self, title: &Title) -> bool {
        if self.missing.contains(title) {
            return false;
        }
        self.links.contains_key(title)
            || self.ambiguous.contains_key(title)
            || self.failing.contains(title)
            || self.links.values().any(|links| links.contains(title))
            || self.ambiguous.values().any(|options| options.contains(title))
    }
}

#[async_trait]
impl GraphProvider for MemoryGraph {
    async fn search(&self, term: &str) -> Result<Vec<Title>> {
        if let Some(candidates) = self.search.get(term) {
            return Ok(candidates.clone());
        }

        let exact = Title::from(term);
        if self.is_known(&exact) {
            Ok(vec![exact])
        } else {
            Ok(Vec::new())
        }
    }

    async fn links_of(&self, title: &Title) -> LinkFetch {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut log) = self.fetch_log.lock() {
            log.push(title.clone());
        }

        if self.failing.contains(title) {
            return LinkFetch::Failed(format!("simulated failure for {title}"));
        }
        if self.missing.contains(title) {
            return LinkFetch::Missing;
        }
        if let Some(options) = self.ambiguous.get(title) {
            return LinkFetch::Ambiguous(options.clone());
        }

        match self.links.get(title) {
            Some(links) => LinkFetch::Links(links.clone()),
            None => LinkFetch::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_links_and_variants() {
        let graph = MemoryGraph::from_edges([("A", &["B", "C"][..])])
            .with_ambiguous("Mercury", ["Mercury (planet)"])
            .with_failing("Flaky")
            .with_missing("Ghost");

        match graph.links_of(&"A".into()).await {
            LinkFetch::Links(links) => {
                assert_eq!(links.len(), 2);
                assert!(links.contains("B"));
            }
            other => panic!("expected links, got {other:?}"),
        }
        assert!(matches!(
            graph.links_of(&"Mercury".into()).await,
            LinkFetch::Ambiguous(_)
        ));
        assert!(matches!(
            graph.links_of(&"Flaky".into()).await,
            LinkFetch::Failed(_)
        ));
        assert_eq!(graph.links_of(&"Ghost".into()).await, LinkFetch::Missing);
        assert_eq!(graph.links_of(&"Nowhere".into()).await, LinkFetch::Missing);
        assert_eq!(graph.fetch_count(), 5);
    }

    #[tokio::test]
    async fn search_prefers_explicit_entries() {
        let graph = MemoryGraph::from_edges([("A", &["B"][..])])
            .with_search("Ada", ["Ada Lovelace"]);

        let hits = graph.search("Ada").await.unwrap();
        assert_eq!(hits, vec![Title::from("Ada Lovelace")]);

        let hits = graph.search("A").await.unwrap();
        assert_eq!(hits, vec![Title::from("A")]);

        assert!(graph.search("zzzznotreal").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_finds_link_targets() {
        let graph = MemoryGraph::from_edges([("A", &["B", "Ghost"][..]), ("B", &["E"][..])])
            .with_ambiguous("Mercury", ["Mercury (planet)"])
            .with_missing("Ghost");

        assert_eq!(graph.search("E").await.unwrap(), vec![Title::from("E")]);
        assert_eq!(
            graph.search("Mercury (planet)").await.unwrap(),
            vec![Title::from("Mercury (planet)")]
        );
        assert!(graph.search("Ghost").await.unwrap().is_empty());
    }

    #[test]
    fn parses_json_graph() {
        let graph = MemoryGraph::from_json(
            r#"{
                "links": {"A": ["B"], "B": ["A"]},
                "search": {"start": ["A"]},
                "missing": ["Ghost"]
            }"#,
        )
        .expect("parse graph");

        assert_eq!(graph.links.len(), 2);
        assert!(graph.missing.contains("Ghost"));
        assert_eq!(graph.search["start"], vec![Title::from("A")]);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = MemoryGraph::from_json(r#"{"links": ["A"]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid graph JSON"));
    }
}
