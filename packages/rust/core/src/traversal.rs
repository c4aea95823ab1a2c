//! Breadth-first traversal over a lazily fetched link graph.
//!
//! The engine starts at `start`, fetches outbound links one vertex at a time
//! in FIFO order, and stops the moment `end` is discovered as a link. Titles
//! are marked visited when discovered (not when dequeued), so no title is
//! queued twice by discovery and the first path found is a fewest-hops path
//! in the discovered graph.
//!
//! Frontier entries don't carry their whole path. Each discovery records the
//! arena index of the entry that found it, and the path is rebuilt once, on
//! success.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};
use wikiracer_shared::{Coordinates, RaceConfig, Title, TraversalResult};

use crate::provider::{GraphProvider, LinkFetch};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for one traversal.
#[derive(Debug, Clone, Default)]
pub struct TraversalConfig {
    /// Don't expand entries whose path already has this many hops.
    /// `None` explores until the frontier is exhausted.
    pub max_depth: Option<u32>,
}

impl From<&RaceConfig> for TraversalConfig {
    fn from(race: &RaceConfig) -> Self {
        Self {
            max_depth: race.max_depth,
        }
    }
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Why a dequeued vertex contributed no links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The page does not exist.
    Missing,
    /// The provider failed to fetch it.
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("page missing"),
            Self::Failed(reason) => write!(f, "fetch failed: {reason}"),
        }
    }
}

/// Progress callback for reporting traversal status.
pub trait TraversalObserver: Send + Sync {
    /// Called before a vertex's links are fetched. `depth` is its hop distance.
    fn expanding(&self, vertex: &Title, depth: u32);
    /// Called when a link is seen for the first time.
    fn discovered(&self, link: &Title, depth: u32);
    /// Called when a vertex is skipped because its links could not be fetched.
    fn skipped(&self, vertex: &Title, reason: &SkipReason);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl TraversalObserver for SilentObserver {
    fn expanding(&self, _vertex: &Title, _depth: u32) {}
    fn discovered(&self, _link: &Title, _depth: u32) {}
    fn skipped(&self, _vertex: &Title, _reason: &SkipReason) {}
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// One discovered title and the arena index of the entry that found it.
struct Discovery {
    title: Title,
    parent: Option<usize>,
    depth: u32,
}

/// FIFO queue of arena indices plus the arena itself. Owned by a single run.
struct Frontier {
    arena: Vec<Discovery>,
    queue: VecDeque<usize>,
}

impl Frontier {
    fn seeded(start: &Title) -> Self {
        Self {
            arena: vec![Discovery {
                title: start.clone(),
                parent: None,
                depth: 0,
            }],
            queue: VecDeque::from([0]),
        }
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    fn push(&mut self, title: Title, parent: usize) {
        let depth = self.arena[parent].depth + 1;
        self.arena.push(Discovery {
            title,
            parent: Some(parent),
            depth,
        });
        self.queue.push_back(self.arena.len() - 1);
    }

    /// Titles from `start` to the entry at `idx`, inclusive.
    fn path_to(&self, idx: usize) -> Vec<Title> {
        let mut path = Vec::with_capacity(self.arena[idx].depth as usize + 2);
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            path.push(self.arena[i].title.clone());
            cursor = self.arena[i].parent;
        }
        path.reverse();
        path
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Sequential breadth-first search engine over a [`GraphProvider`].
pub struct TraversalEngine<P> {
    provider: P,
    config: TraversalConfig,
}

impl<P: GraphProvider> TraversalEngine<P> {
    /// Create an engine with default (unbounded) configuration.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: TraversalConfig::default(),
        }
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: TraversalConfig) -> Self {
        self.config = config;
        self
    }

    /// Search for a link chain from `coords.start()` to `coords.end()`.
    ///
    /// Per-vertex fetch problems never abort the search: missing or failing
    /// vertices contribute no links, disambiguation pages contribute their
    /// options. Fetches are awaited one at a time.
    #[instrument(skip_all, fields(start = %coords.start(), end = %coords.end()))]
    pub async fn run(
        &self,
        coords: &Coordinates,
        observer: &dyn TraversalObserver,
    ) -> TraversalResult {
        let started = Instant::now();
        let end = coords.end();

        let mut frontier = Frontier::seeded(coords.start());
        let mut visited: HashSet<Title> = HashSet::new();
        let mut expanded: usize = 0;
        let mut skipped: usize = 0;

        info!(max_depth = ?self.config.max_depth, "starting traversal");

        while let Some(idx) = frontier.pop() {
            let depth = frontier.arena[idx].depth;
            if self.config.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }

            let vertex = frontier.arena[idx].title.clone();
            observer.expanding(&vertex, depth);
            expanded += 1;

            let fetch = self.provider.links_of(&vertex).await;
            debug!(%vertex, depth, kind = fetch.kind(), "links fetched");

            let links = match fetch {
                // Disambiguation options stand in for outbound links.
                LinkFetch::Links(links) | LinkFetch::Ambiguous(links) => links,
                LinkFetch::Missing => {
                    warn!(%vertex, "page missing, skipping");
                    observer.skipped(&vertex, &SkipReason::Missing);
                    skipped += 1;
                    continue;
                }
                LinkFetch::Failed(reason) => {
                    warn!(%vertex, error = %reason, "link fetch failed, skipping");
                    observer.skipped(&vertex, &SkipReason::Failed(reason));
                    skipped += 1;
                    continue;
                }
            };

            for link in links {
                if visited.contains(&link) {
                    continue;
                }
                visited.insert(link.clone());
                observer.discovered(&link, depth + 1);

                if link == *end {
                    let mut path = frontier.path_to(idx);
                    path.push(link);

                    info!(
                        hops = path.len() - 1,
                        visited = visited.len(),
                        expanded,
                        skipped,
                        elapsed_ms = started.elapsed().as_millis(),
                        "target reached"
                    );

                    return TraversalResult::PathFound {
                        path,
                        visited: visited.len(),
                    };
                }

                frontier.push(link, idx);
            }
        }

        info!(
            visited = visited.len(),
            expanded,
            skipped,
            elapsed_ms = started.elapsed().as_millis(),
            "frontier exhausted, target not found"
        );

        TraversalResult::NotFound
    }
}

/// Run a default-configured traversal with no observer.
pub async fn run<P: GraphProvider>(coords: &Coordinates, provider: P) -> TraversalResult {
    TraversalEngine::new(provider)
        .run(coords, &SilentObserver)
        .await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::memory::MemoryGraph;

    fn coords(start: &str, end: &str) -> Coordinates {
        Coordinates::new(start.into(), end.into()).expect("valid coordinates")
    }

    fn path_of(result: &TraversalResult) -> Vec<&str> {
        result
            .path()
            .expect("expected a path")
            .iter()
            .map(Title::as_str)
            .collect()
    }

    /// Every consecutive pair must be an edge the graph actually serves.
    fn assert_edges(edges: &[(&str, &[&str])], path: &[&str]) {
        let adjacency: HashMap<&str, &[&str]> = edges.iter().copied().collect();
        for pair in path.windows(2) {
            let links = adjacency.get(pair[0]).copied().unwrap_or_default();
            assert!(links.contains(&pair[1]), "{} -> {} is not an edge", pair[0], pair[1]);
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        discovered: Mutex<Vec<Title>>,
        skipped: Mutex<Vec<(Title, SkipReason)>>,
    }

    impl TraversalObserver for RecordingObserver {
        fn expanding(&self, _vertex: &Title, _depth: u32) {}

        fn discovered(&self, link: &Title, _depth: u32) {
            self.discovered.lock().unwrap().push(link.clone());
        }

        fn skipped(&self, vertex: &Title, reason: &SkipReason) {
            self.skipped
                .lock()
                .unwrap()
                .push((vertex.clone(), reason.clone()));
        }
    }

    #[tokio::test]
    async fn diamond_graph_takes_three_hops() {
        let edges: &[(&str, &[&str])] = &[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &["E"]),
        ];
        let graph = MemoryGraph::from_edges(edges.iter().copied());

        let result = run(&coords("A", "E"), &graph).await;
        let path = path_of(&result);

        assert!(path == ["A", "B", "D", "E"] || path == ["A", "C", "D", "E"]);
        assert_edges(edges, &path);
        assert!(matches!(result, TraversalResult::PathFound { visited: 4, .. }));
    }

    #[tokio::test]
    async fn cycle_without_target_is_not_found() {
        let graph = MemoryGraph::from_edges([("A", &["B"][..]), ("B", &["A"][..])]);

        let result = run(&coords("A", "E"), &graph).await;
        assert_eq!(result, TraversalResult::NotFound);
    }

    #[tokio::test]
    async fn prefers_fewest_hops() {
        let edges: &[(&str, &[&str])] = &[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("D", &["E"]),
            ("C", &["E"]),
        ];
        let graph = MemoryGraph::from_edges(edges.iter().copied());

        let result = run(&coords("A", "E"), &graph).await;
        assert_eq!(path_of(&result), ["A", "C", "E"]);
        assert_eq!(result.hops(), Some(2));
    }

    #[tokio::test]
    async fn failed_vertex_does_not_abort() {
        let graph = MemoryGraph::from_edges([("A", &["B", "C"][..]), ("C", &["end"][..])])
            .with_failing("B");

        let result = run(&coords("A", "end"), &graph).await;
        assert_eq!(path_of(&result), ["A", "C", "end"]);
    }

    #[tokio::test]
    async fn failed_siblings_are_reported_and_level_continues() {
        let graph = MemoryGraph::from_edges([
            ("A", &["B", "C", "D"][..]),
            ("D", &["X"][..]),
            ("X", &["end"][..]),
        ])
        .with_failing("B")
        .with_missing("C");
        let observer = RecordingObserver::default();

        let result = TraversalEngine::new(&graph)
            .run(&coords("A", "end"), &observer)
            .await;

        assert_eq!(path_of(&result), ["A", "D", "X", "end"]);

        let mut skipped = observer.skipped.into_inner().unwrap();
        skipped.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].0, "B");
        assert!(matches!(skipped[0].1, SkipReason::Failed(_)));
        assert_eq!(skipped[1], (Title::from("C"), SkipReason::Missing));
    }

    #[tokio::test]
    async fn failing_start_contributes_nothing() {
        let graph = MemoryGraph::from_edges([("B", &["E"][..])]).with_failing("A");

        let result = run(&coords("A", "E"), &graph).await;
        assert_eq!(result, TraversalResult::NotFound);
        assert_eq!(graph.fetch_count(), 1);
    }

    #[tokio::test]
    async fn disambiguation_options_act_as_links() {
        let graph = MemoryGraph::from_edges([("A", &["Mercury"][..])])
            .with_ambiguous("Mercury", ["Mercury (planet)", "Mercury (element)"])
            .with_links("Mercury (planet)", ["Sun"]);

        let result = run(&coords("A", "Sun"), &graph).await;
        assert_eq!(path_of(&result), ["A", "Mercury", "Mercury (planet)", "Sun"]);
    }

    #[tokio::test]
    async fn start_equal_to_end_needs_a_cycle() {
        let graph = MemoryGraph::from_edges([("A", &["B"][..]), ("B", &["A"][..])]);

        let result = run(&coords("A", "A"), &graph).await;
        assert_eq!(path_of(&result), ["A", "B", "A"]);
        assert!(matches!(result, TraversalResult::PathFound { visited: 2, .. }));

        let self_loop = MemoryGraph::from_edges([("A", &["A"][..])]);
        let result = run(&coords("A", "A"), &self_loop).await;
        assert_eq!(path_of(&result), ["A", "A"]);

        let dead_end = MemoryGraph::from_edges([("A", &["B"][..])]);
        let result = run(&coords("A", "A"), &dead_end).await;
        assert_eq!(result, TraversalResult::NotFound);
    }

    #[tokio::test]
    async fn titles_are_discovered_and_fetched_once() {
        // Dense graph with many back-edges and no route to the target.
        let names = ["A", "B", "C", "D", "E", "F"];
        let graph = names.iter().fold(MemoryGraph::new(), |g, name| {
            g.with_links(name, names.iter().copied())
        });
        let observer = RecordingObserver::default();

        let result = TraversalEngine::new(&graph)
            .run(&coords("A", "Z"), &observer)
            .await;
        assert_eq!(result, TraversalResult::NotFound);

        let discovered = observer.discovered.into_inner().unwrap();
        let unique: HashSet<&Title> = discovered.iter().collect();
        assert_eq!(discovered.len(), unique.len());
        assert_eq!(discovered.len(), names.len());

        // `start` is seeded before it is discovered, so it may be fetched twice.
        let fetched = graph.fetched();
        for name in names {
            let count = fetched.iter().filter(|t| *t == name).count();
            let limit = if name == "A" { 2 } else { 1 };
            assert!(count <= limit, "{name} fetched {count} times");
        }
    }

    #[tokio::test]
    async fn long_chain_path_is_well_formed() {
        let edges: &[(&str, &[&str])] = &[
            ("A", &["B", "X"]),
            ("B", &["C"]),
            ("X", &["Y"]),
            ("Y", &["Q"]),
            ("C", &["D"]),
            ("D", &["E"]),
        ];
        let graph = MemoryGraph::from_edges(edges.iter().copied());

        let result = run(&coords("A", "E"), &graph).await;
        let path = path_of(&result);
        assert_eq!(path.first(), Some(&"A"));
        assert_eq!(path.last(), Some(&"E"));
        assert_eq!(path.len(), 5);
        assert_edges(edges, &path);
    }

    #[tokio::test]
    async fn max_depth_bounds_expansion() {
        let graph = MemoryGraph::from_edges([
            ("A", &["B"][..]),
            ("B", &["C"][..]),
            ("C", &["E"][..]),
        ]);

        let shallow = TraversalEngine::new(&graph).with_config(TraversalConfig {
            max_depth: Some(2),
        });
        let result = shallow.run(&coords("A", "E"), &SilentObserver).await;
        assert_eq!(result, TraversalResult::NotFound);
        assert_eq!(graph.fetch_count(), 2);

        let deep = TraversalEngine::new(&graph).with_config(TraversalConfig {
            max_depth: Some(3),
        });
        let result = deep.run(&coords("A", "E"), &SilentObserver).await;
        assert_eq!(path_of(&result), ["A", "B", "C", "E"]);
    }

    #[test]
    fn traversal_config_from_race_config() {
        let race = RaceConfig {
            max_depth: Some(6),
            first_candidate: false,
        };
        assert_eq!(TraversalConfig::from(&race).max_depth, Some(6));
    }
}
