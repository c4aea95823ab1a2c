//! Free-text term → canonical title resolution with pluggable disambiguation.
//!
//! A term is searched via the [`GraphProvider`]. Zero candidates is fatal,
//! one candidate resolves directly, and several candidates are handed to a
//! [`CandidateChooser`] until it picks a valid index.

use std::fmt;

use tracing::{debug, instrument, warn};
use wikiracer_shared::{Coordinates, Result, Title, WikiracerError};

use crate::provider::GraphProvider;

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// What a chooser answered when asked to pick among candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A numeric index into the candidate list. May be out of range.
    Pick(i64),
    /// Input that could not be read as a number at all.
    Unrecognized(String),
}

/// Picks one of several candidate titles for an ambiguous term.
///
/// `attempt` is 0 on the first request and increments every time the
/// previous answer was rejected, so interactive choosers can reword the prompt.
/// Returning `Err` aborts resolution.
pub trait CandidateChooser {
    fn choose(&mut self, term: &str, candidates: &[Title], attempt: u32) -> Result<Decision>;
}

impl<F> CandidateChooser for F
where
    F: FnMut(&str, &[Title], u32) -> Result<Decision>,
{
    fn choose(&mut self, term: &str, candidates: &[Title], attempt: u32) -> Result<Decision> {
        self(term, candidates, attempt)
    }
}

/// Always takes the first search result.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl CandidateChooser for FirstCandidate {
    fn choose(&mut self, _term: &str, _candidates: &[Title], _attempt: u32) -> Result<Decision> {
        Ok(Decision::Pick(0))
    }
}

/// A rejected decision. Handled inside the resolver by asking again.
#[derive(Debug)]
struct InvalidChoice {
    decision: Decision,
    len: usize,
}

impl fmt::Display for InvalidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.decision {
            Decision::Pick(i) => write!(f, "index {i} is outside 0..{}", self.len),
            Decision::Unrecognized(raw) => write!(f, "'{raw}' is not a number"),
        }
    }
}

fn validate(decision: Decision, len: usize) -> std::result::Result<usize, InvalidChoice> {
    match decision {
        Decision::Pick(i) => match usize::try_from(i) {
            Ok(idx) if idx < len => Ok(idx),
            _ => Err(InvalidChoice { decision, len }),
        },
        Decision::Unrecognized(_) => Err(InvalidChoice { decision, len }),
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves free-text terms against a provider's search.
///
/// Holds no mutable state, so start and end can be resolved independently.
pub struct TitleResolver<P> {
    provider: P,
}

impl<P: GraphProvider> TitleResolver<P> {
    /// Create a resolver over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Resolve one term to exactly one canonical title.
    #[instrument(skip(self, chooser))]
    pub async fn resolve<C>(&self, term: &str, chooser: &mut C) -> Result<Title>
    where
        C: CandidateChooser + ?Sized,
    {
        let term = term.trim();
        if term.is_empty() {
            return Err(WikiracerError::no_candidates(term));
        }

        let mut candidates = self.provider.search(term).await?;
        debug!(candidates = candidates.len(), "search complete");

        match candidates.len() {
            0 => Err(WikiracerError::no_candidates(term)),
            1 => Ok(candidates.swap_remove(0)),
            len => {
                let mut attempt = 0;
                loop {
                    let decision = chooser.choose(term, &candidates, attempt)?;
                    match validate(decision, len) {
                        Ok(idx) => {
                            debug!(idx, title = %candidates[idx], "candidate chosen");
                            return Ok(candidates.swap_remove(idx));
                        }
                        Err(invalid) => {
                            warn!(attempt, %invalid, "invalid disambiguation choice, asking again");
                            attempt += 1;
                        }
                    }
                }
            }
        }
    }

    /// Resolve both race terms. Does not guard against `start == end`.
    pub async fn resolve_coordinates<C>(
        &self,
        raw_start: &str,
        raw_end: &str,
        chooser: &mut C,
    ) -> Result<Coordinates>
    where
        C: CandidateChooser + ?Sized,
    {
        let start = self.resolve(raw_start, chooser).await?;
        let end = self.resolve(raw_end, chooser).await?;
        Coordinates::new(start, end)
    }
}

/// Resolve a raw `start`/`end` pair in one call.
pub async fn resolve_coordinates<P, C>(
    raw_start: &str,
    raw_end: &str,
    provider: P,
    chooser: &mut C,
) -> Result<Coordinates>
where
    P: GraphProvider,
    C: CandidateChooser + ?Sized,
{
    TitleResolver::new(provider)
        .resolve_coordinates(raw_start, raw_end, chooser)
        .await
}
