use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use log::{log, Level};
use rocket::{
    http::{Status, StatusClass},
    response::{self, Responder},
    Request,
};
use thiserror::Error;

use crate::model::{
    credentials::{AuthError, RegistrationError},
    engine::VoteError,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Status(Status::NotFound, format!("{} not found", what.into()))
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Registration(RegistrationError::EmptyField) => Status::BadRequest,
            Self::Registration(RegistrationError::DuplicateUsername) => Status::Conflict,
            Self::Auth(AuthError::InvalidCredentials) => Status::Unauthorized,
            Self::Vote(VoteError::NoActiveElection) => Status::BadRequest,
            Self::Vote(VoteError::AlreadyVoted) => Status::Conflict,
            Self::Vote(VoteError::UnknownCandidate(_)) => Status::NotFound,
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
            Self::Status(status, _) => *status,
        }
    }
}

impl Error {
    /// Level the failure is logged at when returned to a client.
    pub fn log_level(&self) -> Level {
        match self.status().class() {
            StatusClass::ServerError => Level::Error,
            StatusClass::ClientError => Level::Warn,
            _ => Level::Info,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        log!(self.log_level(), "{} {}: {self}", req.method(), req.uri());
        (status, self.to_string()).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tally::UnknownCandidate;

    #[test]
    fn statuses() {
        assert_eq!(Error::from(RegistrationError::EmptyField).status(), Status::BadRequest);
        assert_eq!(Error::from(RegistrationError::DuplicateUsername).status(), Status::Conflict);
        assert_eq!(Error::from(AuthError::InvalidCredentials).status(), Status::Unauthorized);
        assert_eq!(Error::from(VoteError::NoActiveElection).status(), Status::BadRequest);
        assert_eq!(Error::from(VoteError::AlreadyVoted).status(), Status::Conflict);
        assert_eq!(
            Error::from(VoteError::from(UnknownCandidate("X".to_string()))).status(),
            Status::NotFound
        );
        assert_eq!(Error::not_found("Election 'X'").status(), Status::NotFound);
    }

    #[test]
    fn client_failures_log_at_warn() {
        assert_eq!(Error::from(AuthError::InvalidCredentials).log_level(), Level::Warn);
        assert_eq!(Error::from(VoteError::AlreadyVoted).log_level(), Level::Warn);
        assert_eq!(Error::not_found("Election 'X'").log_level(), Level::Warn);
        assert_eq!(
            Error::Status(Status::InternalServerError, "Unmanaged state".to_string()).log_level(),
            Level::Error
        );
    }

    #[test]
    fn messages_pass_through() {
        assert_eq!(
            Error::from(AuthError::InvalidCredentials).to_string(),
            "Invalid credentials"
        );
        assert_eq!(Error::not_found("Election 'X'").to_string(), "Election 'X' not found");
    }
}
