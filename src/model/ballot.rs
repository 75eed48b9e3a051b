use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::{election::ElectionType, voter::VoterId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("Voter has already voted in this election")]
pub struct AlreadyVoted;

/// The voter IDs that have cast a ballot in one election type. Append-only.
#[derive(Debug, Default)]
pub struct BallotRecord {
    voters: HashSet<VoterId>,
}

impl BallotRecord {
    pub fn has_voted(&self, voter_id: &VoterId) -> bool {
        self.voters.contains(voter_id)
    }

    pub fn mark_voted(&mut self, voter_id: VoterId) -> Result<(), AlreadyVoted> {
        if self.voters.insert(voter_id) {
            Ok(())
        } else {
            Err(AlreadyVoted)
        }
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}

/// One [`BallotRecord`] per election type, each behind its own lock.
#[derive(Debug, Default)]
pub struct BallotRegistry {
    records: [Mutex<BallotRecord>; ElectionType::COUNT],
}

impl BallotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, election: ElectionType, voter_id: &VoterId) -> bool {
        self.lock(election).has_voted(voter_id)
    }

    pub fn mark_voted(&self, election: ElectionType, voter_id: VoterId) -> Result<(), AlreadyVoted> {
        self.lock(election).mark_voted(voter_id)
    }

    /// Number of ballots cast in the given election.
    pub fn ballots_cast(&self, election: ElectionType) -> usize {
        self.lock(election).len()
    }

    /// Hold the record for an election, for check-then-act sequences.
    pub fn lock(&self, election: ElectionType) -> MutexGuard<'_, BallotRecord> {
        self.records[election.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
