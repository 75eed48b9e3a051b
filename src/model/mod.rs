//! The voting integrity engine. Framework-agnostic apart from the route-parameter
//! parsing of [`election::ElectionType`].

pub mod ballot;
pub mod credentials;
pub mod election;
pub mod engine;
pub mod session;
pub mod tally;
pub mod voter;

pub use engine::VotingEngine;
