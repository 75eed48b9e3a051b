use serde::{Deserialize, Serialize};

use super::{election::ElectionType, voter::VoterId};

/// An authenticated voter's context, owned by the caller and passed back into
/// every voting operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    voter_id: VoterId,
    username: String,
    election: Option<ElectionType>,
}

impl Session {
    /// A freshly authenticated session with no election selected.
    /// Only the engine hands these out, after checking credentials.
    pub(crate) fn new(voter_id: VoterId, username: String) -> Self {
        Self {
            voter_id,
            username,
            election: None,
        }
    }

    pub fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The election this session is voting in, if one has been selected.
    pub fn election(&self) -> Option<ElectionType> {
        self.election
    }

    /// Choose the election to vote in. Replaces any earlier choice.
    pub fn select_election(self, election: ElectionType) -> Self {
        Self {
            election: Some(election),
            ..self
        }
    }
}

/// Where a session stands in the voting workflow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Authenticated,
    ElectionSelected(ElectionType),
    Voted(ElectionType),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_election_is_pure() {
        let session = Session::example();
        assert_eq!(session.election(), None);

        let selected = session.clone().select_election(ElectionType::Educational);
        assert_eq!(selected.election(), Some(ElectionType::Educational));
        assert_eq!(selected.voter_id(), session.voter_id());
        assert_eq!(session.election(), None);

        let reselected = selected.select_election(ElectionType::Governmental);
        assert_eq!(reselected.election(), Some(ElectionType::Governmental));
    }
}
