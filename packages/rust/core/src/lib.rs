//! Traversal engine and title resolution for Wikiracer.
//!
//! This crate provides:
//! - [`provider`]: the [`GraphProvider`] contract and its [`LinkFetch`] outcomes
//! - [`resolver`]: free-text term → canonical [`Title`] with pluggable disambiguation
//! - [`traversal`]: breadth-first search from `start` to `end` over fetched links
//! - [`memory`]: an in-memory provider for offline graphs and tests
//!
//! [`Title`]: wikiracer_shared::Title

pub mod memory;
pub mod provider;
pub mod resolver;
pub mod traversal;

pub use memory::MemoryGraph;
pub use provider::{GraphProvider, LinkFetch};
pub use resolver::{CandidateChooser, Decision, FirstCandidate, TitleResolver, resolve_coordinates};
pub use traversal::{
    SilentObserver, SkipReason, TraversalConfig, TraversalEngine, TraversalObserver, run,
};
