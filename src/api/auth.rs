use log::info;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    api::{
        token::{SessionToken, AUTH_TOKEN_COOKIE},
        voter::SessionDescription,
    },
    config::Config,
    error::Result,
    model::{voter::VoterCredentials, VotingEngine},
};

pub fn routes() -> Vec<Route> {
    routes![register, login, logout]
}

#[post("/auth/register", data = "<credentials>", format = "json")]
pub fn register(
    credentials: Json<VoterCredentials>,
    engine: &State<VotingEngine>,
) -> Result<Status> {
    let username = credentials.username.clone();
    engine.register(credentials.into_inner())?;
    info!("Registered voter '{username}'");
    Ok(Status::Created)
}

#[post("/auth/login", data = "<credentials>", format = "json")]
pub fn login(
    credentials: Json<VoterCredentials>,
    cookies: &CookieJar<'_>,
    engine: &State<VotingEngine>,
    config: &State<Config>,
) -> Result<Json<SessionDescription>> {
    let session = engine.login(&credentials)?;
    let description = SessionDescription::new(&session, engine);

    cookies.add(SessionToken::new(session).into_cookie(config)?);

    Ok(Json(description))
}

#[delete("/auth")]
pub fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}

#[cfg(test)]
mod tests {
    use rocket::{http::ContentType, local::asynchronous::Client, serde::json::json};

    use super::*;
    use crate::model::session::SessionState;

    #[backend_test]
    async fn register_valid(client: Client) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Created, response.status());
        let engine = client.rocket().state::<VotingEngine>().unwrap();
        assert_eq!(engine.registered_voters(), 1);
    }

    #[backend_test]
    async fn register_empty_field(client: Client) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::empty()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            response.into_string().await.unwrap(),
            "All fields are required"
        );
    }

    #[backend_test(voter)]
    async fn register_duplicate_username(client: Client) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::new("V7", "alice", "other")).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Conflict, response.status());

        // The original voter can still log in.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::example()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
    }

    #[backend_test]
    async fn login_valid(client: Client) {
        client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::example()).to_string())
            .dispatch()
            .await;

        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
        let description: SessionDescription = response.into_json().await.unwrap();
        assert_eq!(description.voter_id.as_str(), "V1");
        assert_eq!(description.election, None);
        assert!(!description.has_voted);
        assert_eq!(description.state, SessionState::Authenticated);
    }

    #[backend_test]
    async fn login_invalid(client: Client) {
        client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(VoterCredentials::example()).to_string())
            .dispatch()
            .await;

        for credentials in [
            VoterCredentials::new("V2", "alice", "pw1"),
            VoterCredentials::new("V1", "alice", "pw2"),
            VoterCredentials::new("V1", "nobody", "pw1"),
        ] {
            let response = client
                .post(uri!(login))
                .header(ContentType::JSON)
                .body(json!(credentials).to_string())
                .dispatch()
                .await;

            assert_eq!(Status::Unauthorized, response.status());
            assert_eq!(
                response.into_string().await.unwrap(),
                "Invalid credentials"
            );
            assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
        }
    }

    #[backend_test(voter)]
    async fn logout_voter(client: Client) {
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let response = client.delete(uri!(logout)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }

    #[backend_test]
    async fn logout_not_logged_in(client: Client) {
        let response = client.delete(uri!(logout)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
    }
}
