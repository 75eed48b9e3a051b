use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rocket::request::FromParam;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The categories of election on offer. The set is fixed for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElectionType {
    Governmental,
    Organizational,
    Educational,
}

impl ElectionType {
    pub const COUNT: usize = 3;

    /// Every election type, in display order.
    pub const ALL: [ElectionType; Self::COUNT] = [
        ElectionType::Governmental,
        ElectionType::Organizational,
        ElectionType::Educational,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Governmental => "Governmental",
            Self::Organizational => "Organizational",
            Self::Educational => "Educational",
        }
    }

    /// Position of this type within [`ElectionType::ALL`].
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for ElectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown election type '{0}'")]
pub struct UnknownElectionType(pub String);

impl FromStr for ElectionType {
    type Err = UnknownElectionType;

    /// Parse an election type from its name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|election| election.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownElectionType(s.to_string()))
    }
}

/// Allow election types to be used directly as route segments.
impl<'a> FromParam<'a> for ElectionType {
    type Error = UnknownElectionType;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

/// A candidate standing in one election type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Candidate {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Candidate {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The candidates preloaded for every election type unless configured otherwise.
pub const DEFAULT_CANDIDATES: [&str; 3] = ["Candidate A", "Candidate B", "Candidate C"];

pub fn default_candidates() -> Vec<Candidate> {
    DEFAULT_CANDIDATES.into_iter().map(Candidate::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        assert_eq!(
            "governmental".parse::<ElectionType>(),
            Ok(ElectionType::Governmental)
        );
        assert_eq!(
            "EDUCATIONAL".parse::<ElectionType>(),
            Ok(ElectionType::Educational)
        );
        assert_eq!(
            "Municipal".parse::<ElectionType>(),
            Err(UnknownElectionType("Municipal".to_string()))
        );
    }

    #[test]
    fn indices_follow_display_order() {
        for (i, election) in ElectionType::ALL.iter().enumerate() {
            assert_eq!(election.index(), i);
        }
    }

    #[test]
    fn serializes_as_variant_name() {
        let json = rocket::serde::json::to_string(&ElectionType::Organizational).unwrap();
        assert_eq!(json, "\"Organizational\"");
        let candidate = rocket::serde::json::to_string(&Candidate::from("Candidate B")).unwrap();
        assert_eq!(candidate, "\"Candidate B\"");
    }
}
