use log::error;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use thiserror::Error;
use crate::access_granter::AccessGranterError;
use crate::note_access::NoteAccessError;
use crate::routes::api::model::ErrorResponse;

/// Everything a handler can answer with, already collapsed to what the
/// client is allowed to learn. Internal causes are logged where the
/// conversions happen and never echoed into a response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    Unauthorized,

    #[error("user with this email already exists")]
    EmailTaken,

    #[error("note not found")]
    NotFound,

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::InvalidCredentials => Status::Unauthorized,
            ApiError::Unauthorized => Status::Unauthorized,
            ApiError::EmailTaken => Status::Conflict,
            ApiError::NotFound => Status::NotFound,
            ApiError::Internal => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (
            self.status(),
            Json(
                ErrorResponse {
                    error: self.to_string(),
                }
            ),
        ).respond_to(request)
    }
}

impl From<AccessGranterError> for ApiError {
    fn from(e: AccessGranterError) -> Self {
        match e {
            AccessGranterError::InvalidCredentials => ApiError::InvalidCredentials,
            AccessGranterError::EmailTaken => ApiError::EmailTaken,
            AccessGranterError::HeaderFormatError |
            AccessGranterError::InvalidToken => ApiError::Unauthorized,
            e => {
                error!("authentication backend failure: {e}");
                ApiError::Internal
            },
        }
    }
}

impl From<NoteAccessError> for ApiError {
    fn from(e: NoteAccessError) -> Self {
        match e {
            NoteAccessError::NotFound => ApiError::NotFound,
            e => {
                error!("note store failure: {e}");
                ApiError::Internal
            },
        }
    }
}
