use std::fmt::{Display, Formatter};

use argon2::Config;
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Externally assigned voter identifier. Not guaranteed unique across usernames.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Raw voter credentials, received from a caller. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct VoterCredentials {
    pub voter_id: String,
    pub username: String,
    pub password: String,
}

impl VoterCredentials {
    pub fn new(
        voter_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            voter_id: voter_id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Are any of the fields empty or pure whitespace?
    pub fn has_blank_field(&self) -> bool {
        [&self.voter_id, &self.username, &self.password]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

/// Stand-in checked when a login names no registered voter, so that attempt
/// costs one password verification like any other.
static UNKNOWN_VOTER: Lazy<Voter> =
    Lazy::new(|| Voter::from(VoterCredentials::new("", "", "no registered voter")));

/// A registered voter, as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    pub voter_id: VoterId,
    pub username: String,
    password_hash: String,
}

impl Voter {
    /// A voter that is never stored. Its password hash has the same cost as a
    /// real one.
    pub fn unknown() -> &'static Voter {
        &UNKNOWN_VOTER
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // A malformed hash can only come from outside `From<VoterCredentials>`,
        // and matches nothing.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or(false)
    }
}

impl From<VoterCredentials> for Voter {
    /// Convert [`VoterCredentials`] to a new [`Voter`] by hashing the password.
    fn from(cred: VoterCredentials) -> Self {
        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default())
                .expect("the default argon2 config is valid");
        Self {
            voter_id: VoterId::new(cred.voter_id),
            username: cred.username,
            password_hash,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl VoterCredentials {
        pub fn example() -> Self {
            Self::new("V1", "alice", "pw1")
        }

        pub fn example2() -> Self {
            Self::new("V2", "bob", "hunter2")
        }

        pub fn empty() -> Self {
            Self::new("", "", "")
        }
    }
}
