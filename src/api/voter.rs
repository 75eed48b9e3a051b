use rocket::{http::CookieJar, serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::{
    api::token::SessionToken,
    config::Config,
    error::Result,
    model::{
        election::{Candidate, ElectionType},
        session::{Session, SessionState},
        tally::CandidateTotal,
        voter::VoterId,
        VotingEngine,
    },
};

pub fn routes() -> Vec<Route> {
    routes![get_session, select_election, cast_vote]
}

/// API-friendly view of a voting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    pub voter_id: VoterId,
    pub election: Option<ElectionType>,
    /// Has the voter already voted in the selected election?
    pub has_voted: bool,
    pub state: SessionState,
}

impl SessionDescription {
    pub fn new(session: &Session, engine: &VotingEngine) -> Self {
        Self {
            voter_id: session.voter_id().clone(),
            election: session.election(),
            has_voted: engine.has_voted(session),
            state: engine.session_state(session),
        }
    }
}

/// The election a voter wishes to vote in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSelection {
    pub election: ElectionType,
}

/// The candidate a voter wishes to vote for, in their selected election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSpec {
    pub candidate: Candidate,
}

#[get("/session")]
fn get_session(token: SessionToken, engine: &State<VotingEngine>) -> Json<SessionDescription> {
    Json(SessionDescription::new(&token, engine))
}

#[put("/session/election", data = "<selection>", format = "json")]
fn select_election(
    token: SessionToken,
    selection: Json<ElectionSelection>,
    cookies: &CookieJar<'_>,
    engine: &State<VotingEngine>,
    config: &State<Config>,
) -> Result<Json<SessionDescription>> {
    let session = engine.select_election(token.into_session(), selection.election);
    let description = SessionDescription::new(&session, engine);

    // The session lives in the cookie, so re-issue it.
    cookies.add(SessionToken::new(session).into_cookie(config)?);

    Ok(Json(description))
}

/// Cast the session's vote and return the updated results of its election.
#[post("/vote", data = "<ballot>", format = "json")]
fn cast_vote(
    token: SessionToken,
    ballot: Json<BallotSpec>,
    engine: &State<VotingEngine>,
) -> Result<Json<Vec<CandidateTotal>>> {
    let election = engine.cast_vote(&token, ballot.candidate.name())?;
    Ok(Json(engine.results(election)))
}
