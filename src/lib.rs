#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, EngineFairing};
use crate::logging::LoggerFairing;
use crate::model::VotingEngine;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build a server whose voting engine comes from the `elections` config.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(EngineFairing)
        .attach(LoggerFairing)
}

/// Build a server around an existing engine, ignoring the `elections` config.
pub fn build_with_engine(engine: VotingEngine) -> Rocket<Build> {
    build().manage(engine)
}
