use rocket::{serde::json::Json, Route, State};

use crate::model::{
    election::{Candidate, ElectionType},
    tally::CandidateTotal,
    VotingEngine,
};

pub fn routes() -> Vec<Route> {
    routes![elections, candidates, results]
}

#[get("/elections")]
fn elections(engine: &State<VotingEngine>) -> Json<Vec<ElectionType>> {
    Json(engine.election_types())
}

#[get("/elections/<election>/candidates")]
fn candidates(election: ElectionType, engine: &State<VotingEngine>) -> Json<Vec<Candidate>> {
    Json(engine.candidates(election))
}

/// Current totals. Open to everyone, voter or not.
#[get("/elections/<election>/results")]
fn results(election: ElectionType, engine: &State<VotingEngine>) -> Json<Vec<CandidateTotal>> {
    Json(engine.results(election))
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;
    use crate::model::{election::default_candidates, voter::VoterCredentials};

    #[backend_test]
    async fn list_elections(client: Client) {
        let response = client.get(uri!(elections)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let elections: Vec<ElectionType> = response.into_json().await.unwrap();
        assert_eq!(elections, ElectionType::ALL.to_vec());
    }

    #[backend_test]
    async fn list_candidates(client: Client) {
        for election in ElectionType::ALL {
            let uri = format!("/elections/{election}/candidates");
            let response = client.get(uri.as_str()).dispatch().await;

            assert_eq!(Status::Ok, response.status());
            let candidates: Vec<Candidate> = response.into_json().await.unwrap();
            assert_eq!(candidates, default_candidates());
        }
    }

    #[backend_test]
    async fn election_names_ignore_case(client: Client) {
        let response = client.get("/elections/organizational/candidates").dispatch().await;
        assert_eq!(Status::Ok, response.status());
    }

    #[backend_test]
    async fn unknown_election(client: Client) {
        let response = client.get("/elections/Municipal/results").dispatch().await;
        assert_eq!(Status::NotFound, response.status());

        let response = client.get("/elections/Municipal/candidates").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn results_without_login(client: Client) {
        // Someone else votes directly through the engine.
        let engine = client.rocket().state::<VotingEngine>().unwrap();
        engine.register(VoterCredentials::example2()).unwrap();
        let session = engine.login(&VoterCredentials::example2()).unwrap();
        let session = engine.select_election(session, ElectionType::Organizational);
        engine.cast_vote(&session, "Candidate C").unwrap();

        let uri = format!("/elections/{}/results", ElectionType::Organizational);
        let response = client.get(uri.as_str()).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let results: Vec<CandidateTotal> = response.into_json().await.unwrap();
        assert_eq!(
            results,
            vec![
                CandidateTotal::new("Candidate A", 0),
                CandidateTotal::new("Candidate B", 0),
                CandidateTotal::new("Candidate C", 1),
            ]
        );
    }
}
