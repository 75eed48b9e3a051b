use std::collections::BTreeMap;

use chrono::Duration;
use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    election::{Candidate, ElectionType},
    VotingEngine,
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    // secrets
    jwt_secret: String,
}

impl Config {
    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Candidate lists per election type. Types left out keep the default candidates.
#[derive(Debug, Default, Deserialize)]
pub struct ElectionsConfig {
    #[serde(default)]
    elections: BTreeMap<ElectionType, Vec<String>>,
}

impl ElectionsConfig {
    /// Check that no configured election is left without candidates.
    pub fn validate(&self) -> Result<(), ElectionType> {
        match self
            .elections
            .iter()
            .find(|(_, names)| names.iter().all(|name| name.trim().is_empty()))
        {
            Some((election, _)) => Err(*election),
            None => Ok(()),
        }
    }

    pub fn into_engine(self) -> VotingEngine {
        VotingEngine::with_candidates(self.elections.into_iter().map(|(election, names)| {
            (
                election,
                names
                    .into_iter()
                    .filter(|name| !name.trim().is_empty())
                    .map(Candidate::from)
                    .collect(),
            )
        }))
    }
}

/// A fairing that loads the election config, builds the voting engine, and
/// places it into managed state.
///
/// If an engine is already managed (e.g. by a test), it is left alone.
pub struct EngineFairing;

#[rocket::async_trait]
impl Fairing for EngineFairing {
    fn info(&self) -> Info {
        Info {
            name: "Voting engine",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        if rocket.state::<VotingEngine>().is_some() {
            return Ok(rocket);
        }

        // Load the config.
        let config = match rocket.figment().extract::<ElectionsConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load election config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if let Err(election) = config.validate() {
            error!("No candidates configured for the {election} election");
            return Err(rocket);
        }

        let engine = config.into_engine();
        for election in engine.election_types() {
            let candidates = engine
                .candidates(election)
                .iter()
                .map(Candidate::name)
                .collect::<Vec<_>>()
                .join(", ");
            info!("{election} election open with candidates: {candidates}");
        }

        // Manage the state.
        rocket = rocket.manage(engine);
        Ok(rocket)
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::{providers::Serialized, Figment};

    use super::*;
    use crate::model::election::default_candidates;

    fn elections(value: rocket::serde::json::Value) -> ElectionsConfig {
        Figment::new()
            .merge(Serialized::defaults(value))
            .extract()
            .unwrap()
    }

    #[test]
    fn missing_table_means_defaults() {
        let config = elections(rocket::serde::json::json!({}));
        assert!(config.validate().is_ok());
        let engine = config.into_engine();
        for election in ElectionType::ALL {
            assert_eq!(engine.candidates(election), default_candidates());
        }
    }

    #[test]
    fn configured_candidates() {
        let config = elections(rocket::serde::json::json!({
            "elections": { "Educational": ["Yes", "No", "  "] }
        }));
        assert!(config.validate().is_ok());
        let engine = config.into_engine();
        assert_eq!(
            engine.candidates(ElectionType::Educational),
            vec![Candidate::from("Yes"), Candidate::from("No")]
        );
        assert_eq!(engine.candidates(ElectionType::Governmental), default_candidates());
    }

    #[test]
    fn empty_candidate_list_is_rejected() {
        let config = elections(rocket::serde::json::json!({
            "elections": { "Organizational": [] }
        }));
        assert_eq!(config.validate(), Err(ElectionType::Organizational));
    }

    #[test]
    fn auth_ttl_in_seconds() {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(rocket::serde::json::json!({
                "auth_ttl": 90,
                "jwt_secret": "secret",
            })))
            .extract()
            .unwrap();
        assert_eq!(config.auth_ttl(), Duration::seconds(90));
        assert_eq!(config.jwt_secret(), b"secret");
    }
}
