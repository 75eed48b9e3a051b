use std::collections::hash_map::{Entry, HashMap};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use super::voter::{Voter, VoterCredentials, VoterId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("All fields are required")]
    EmptyField,
    #[error("Username already exists")]
    DuplicateUsername,
}

/// Login failure. Deliberately says nothing about which field was wrong.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Registered voters, keyed by username.
#[derive(Debug, Default)]
pub struct CredentialStore {
    voters: RwLock<HashMap<String, Voter>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new voter.
    ///
    /// The voter ID is not checked for reuse: two usernames may share one voter ID,
    /// in which case they also share a ballot in every election.
    pub fn register(&self, credentials: VoterCredentials) -> Result<(), RegistrationError> {
        if credentials.has_blank_field() {
            return Err(RegistrationError::EmptyField);
        }
        if self.read().contains_key(&credentials.username) {
            return Err(RegistrationError::DuplicateUsername);
        }

        // Hash outside the lock; the entry check below settles any race.
        let voter = Voter::from(credentials);
        match self
            .voters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(voter.username.clone())
        {
            Entry::Occupied(_) => Err(RegistrationError::DuplicateUsername),
            Entry::Vacant(entry) => {
                entry.insert(voter);
                Ok(())
            }
        }
    }

    /// Check a login attempt, returning the bound voter ID on success.
    pub fn authenticate(
        &self,
        voter_id: &str,
        username: &str,
        password: &str,
    ) -> Result<VoterId, AuthError> {
        let voter = self.read().get(username).cloned();

        // An unknown username still pays for a verification, so response time
        // does not reveal which usernames exist.
        let password_ok = voter
            .as_ref()
            .unwrap_or_else(|| Voter::unknown())
            .verify_password(password);

        match voter {
            Some(voter) if password_ok && voter.voter_id.as_str() == voter_id => {
                Ok(voter.voter_id)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Is there a voter registered under this username with this voter ID?
    pub fn contains(&self, voter_id: &VoterId, username: &str) -> bool {
        self.read()
            .get(username)
            .map_or(false, |voter| &voter.voter_id == voter_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Voter>> {
        self.voters.read().unwrap_or_else(PoisonError::into_inner)
    }
}
