use thiserror::Error;

use super::{
    ballot::{AlreadyVoted, BallotRegistry},
    credentials::{AuthError, CredentialStore, RegistrationError},
    election::{default_candidates, Candidate, ElectionType},
    session::{Session, SessionState},
    tally::{CandidateTotal, TallyEngine, UnknownCandidate},
    voter::{VoterCredentials, VoterId},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("No election selected")]
    NoActiveElection,
    #[error("You have already voted in this election")]
    AlreadyVoted,
    #[error(transparent)]
    UnknownCandidate(#[from] UnknownCandidate),
}

impl From<AlreadyVoted> for VoteError {
    fn from(_: AlreadyVoted) -> Self {
        Self::AlreadyVoted
    }
}

/// Results and ballot count of one election, read together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionAudit {
    pub election: ElectionType,
    pub results: Vec<CandidateTotal>,
    pub ballots_cast: usize,
}

impl ElectionAudit {
    /// Does every ballot correspond to exactly one counted vote?
    pub fn is_consistent(&self) -> bool {
        let votes: u64 = self.results.iter().map(|total| total.votes).sum();
        votes == self.ballots_cast as u64
    }
}

/// The voting integrity engine: registration, login, one vote per voter per
/// election, and tallies.
///
/// All state is in memory. The engine is shared by reference between callers;
/// each caller carries its own [`Session`].
#[derive(Debug)]
pub struct VotingEngine {
    credentials: CredentialStore,
    ballots: BallotRegistry,
    tallies: TallyEngine,
}

impl Default for VotingEngine {
    /// Every election type with the default candidates.
    fn default() -> Self {
        Self::with_candidates(std::iter::empty())
    }
}

impl VotingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine with the given candidates. Election types not listed get
    /// the default candidates.
    pub fn with_candidates(
        candidates: impl IntoIterator<Item = (ElectionType, Vec<Candidate>)>,
    ) -> Self {
        let engine = Self {
            credentials: CredentialStore::new(),
            ballots: BallotRegistry::new(),
            tallies: TallyEngine::new(),
        };
        for election in ElectionType::ALL {
            engine.tallies.initialize(election, default_candidates());
        }
        for (election, names) in candidates {
            engine.tallies.initialize(election, names);
        }
        engine
    }

    pub fn register(&self, credentials: VoterCredentials) -> Result<(), RegistrationError> {
        self.credentials.register(credentials)
    }

    /// Check the credentials and open a session bound to the voter ID.
    pub fn login(&self, credentials: &VoterCredentials) -> Result<Session, AuthError> {
        let voter_id = self.credentials.authenticate(
            &credentials.voter_id,
            &credentials.username,
            &credentials.password,
        )?;
        Ok(Session::new(voter_id, credentials.username.clone()))
    }

    pub fn select_election(&self, session: Session, election: ElectionType) -> Session {
        session.select_election(election)
    }

    /// Cast the session's one vote in its selected election, returning that
    /// election.
    ///
    /// The ballot record for the election stays locked from the duplicate check
    /// until the voter is marked, so concurrent casts by one voter cannot both
    /// pass the check. A vote for an unknown candidate leaves the ballot unused.
    pub fn cast_vote(&self, session: &Session, candidate: &str) -> Result<ElectionType, VoteError> {
        let election = session.election().ok_or(VoteError::NoActiveElection)?;

        let mut record = self.ballots.lock(election);
        if record.has_voted(session.voter_id()) {
            return Err(VoteError::AlreadyVoted);
        }
        self.tallies.record_vote(election, candidate)?;
        record.mark_voted(session.voter_id().clone())?;
        Ok(election)
    }

    /// Current counts for an election, in candidate order. Not gated on login.
    pub fn results(&self, election: ElectionType) -> Vec<CandidateTotal> {
        self.tallies.snapshot(election)
    }

    pub fn election_types(&self) -> Vec<ElectionType> {
        ElectionType::ALL.to_vec()
    }

    pub fn candidates(&self, election: ElectionType) -> Vec<Candidate> {
        self.tallies.candidates(election)
    }

    /// Has this session's voter already voted in the selected election?
    pub fn has_voted(&self, session: &Session) -> bool {
        session
            .election()
            .map_or(false, |election| {
                self.ballots.has_voted(election, session.voter_id())
            })
    }

    pub fn session_state(&self, session: &Session) -> SessionState {
        match session.election() {
            None => SessionState::Authenticated,
            Some(election) if self.ballots.has_voted(election, session.voter_id()) => {
                SessionState::Voted(election)
            }
            Some(election) => SessionState::ElectionSelected(election),
        }
    }

    /// Results and ballot count, read under the same locks `cast_vote` takes.
    pub fn audit(&self, election: ElectionType) -> ElectionAudit {
        let record = self.ballots.lock(election);
        let tally = self.tallies.lock(election);
        ElectionAudit {
            election,
            results: tally.snapshot(),
            ballots_cast: record.len(),
        }
    }

    /// Is there a registered voter with this ID and username?
    pub fn is_registered(&self, voter_id: &VoterId, username: &str) -> bool {
        self.credentials.contains(voter_id, username)
    }

    pub fn registered_voters(&self) -> usize {
        self.credentials.len()
    }
}
