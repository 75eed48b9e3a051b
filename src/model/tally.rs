use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::election::{Candidate, ElectionType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown candidate '{0}'")]
pub struct UnknownCandidate(pub String);

/// The vote count for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTotal {
    pub candidate: Candidate,
    pub votes: u64,
}

impl CandidateTotal {
    pub fn new(candidate: impl Into<Candidate>, votes: u64) -> Self {
        Self {
            candidate: candidate.into(),
            votes,
        }
    }
}

/// Running per-candidate counts for one election type, in initialisation order.
#[derive(Debug, Default)]
pub struct Tally {
    totals: Vec<CandidateTotal>,
    /// Maps candidate names to their position in `totals`.
    positions: HashMap<Candidate, usize>,
}

impl Tally {
    /// Zeroed counts for the given candidates. Repeated names keep their first position.
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut tally = Self::default();
        for candidate in candidates {
            if !tally.positions.contains_key(&candidate) {
                tally.positions.insert(candidate.clone(), tally.totals.len());
                tally.totals.push(CandidateTotal::new(candidate, 0));
            }
        }
        tally
    }

    pub fn record_vote(&mut self, candidate: &str) -> Result<(), UnknownCandidate> {
        let position = *self
            .positions
            .get(candidate)
            .ok_or_else(|| UnknownCandidate(candidate.to_string()))?;
        self.totals[position].votes += 1;
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<CandidateTotal> {
        self.totals.clone()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.totals
            .iter()
            .map(|total| total.candidate.clone())
            .collect()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.totals.iter().map(|total| total.votes).sum()
    }
}

/// One [`Tally`] per election type, each behind its own lock.
#[derive(Debug, Default)]
pub struct TallyEngine {
    tallies: [Mutex<Tally>; ElectionType::COUNT],
}

impl TallyEngine {
    /// An engine with no candidates in any election.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up an election with zeroed counts, discarding any previous counts.
    pub fn initialize(
        &self,
        election: ElectionType,
        candidates: impl IntoIterator<Item = Candidate>,
    ) {
        *self.lock(election) = Tally::new(candidates);
    }

    pub fn record_vote(&self, election: ElectionType, candidate: &str) -> Result<(), UnknownCandidate> {
        self.lock(election).record_vote(candidate)
    }

    pub fn snapshot(&self, election: ElectionType) -> Vec<CandidateTotal> {
        self.lock(election).snapshot()
    }

    pub fn candidates(&self, election: ElectionType) -> Vec<Candidate> {
        self.lock(election).candidates()
    }

    pub fn total(&self, election: ElectionType) -> u64 {
        self.lock(election).total()
    }

    pub fn lock(&self, election: ElectionType) -> MutexGuard<'_, Tally> {
        self.tallies[election.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
