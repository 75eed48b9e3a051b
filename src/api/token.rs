use std::ops::Deref;

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{FromRequest, Outcome},
    time::Duration,
    Request,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{session::Session, VotingEngine};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// A voting session carried by the caller in a signed cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(Session);

impl SessionToken {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    pub fn into_session(self) -> Session {
        self.0
    }

    /// Serialize this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Result<Cookie<'static>, Error> {
        let claims = Claims {
            session: self.0,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )?;

        Ok(Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish())
    }

    /// Deserialize a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| Self(claims.claims.session))?;
        Ok(token)
    }
}

impl Deref for SessionToken {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Cookie claims: the session itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    session: Session,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionToken {
    type Error = Error;

    /// Get a [`SessionToken`] from the cookie and check that its voter is known
    /// to this process.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let (config, engine) = match (
            req.rocket().state::<Config>(),
            req.rocket().state::<VotingEngine>(),
        ) {
            (Some(config), Some(engine)) => (config, engine),
            _ => {
                return Outcome::Failure((
                    Status::InternalServerError,
                    Error::Status(Status::InternalServerError, "Unmanaged state".to_string()),
                ))
            }
        };

        let cookie = match req.cookies().get(AUTH_TOKEN_COOKIE) {
            Some(cookie) => cookie,
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    Error::Status(Status::Unauthorized, "Not logged in".to_string()),
                ))
            }
        };

        let token = match Self::from_cookie(cookie, config) {
            Ok(token) => token,
            Err(e) => return Outcome::Failure((Status::Unauthorized, e)),
        };

        // Voters are not persisted, so a token may outlive the voter it names.
        if !engine.is_registered(token.voter_id(), token.username()) {
            return Outcome::Failure((
                Status::Unauthorized,
                Error::Status(Status::Unauthorized, "Unknown voter".to_string()),
            ));
        }

        Outcome::Success(token)
    }
}
