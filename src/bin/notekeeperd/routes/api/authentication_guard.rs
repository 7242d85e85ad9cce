use async_trait::async_trait;
use rocket::{Request, State};
use rocket::http::hyper::header;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use crate::access_granter::{AccessGranter, AccessGranterError, Identity, SessionInfo};

/// Request guard for protected routes. A handler taking this runs only
/// after the bearer token checked out; everything else is answered
/// with one uniform 401 by the catcher.
#[derive(Debug)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl<'r> FromRequest<'r> for Authenticated {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_header = if let Some(h) = request.headers().get_one(header::AUTHORIZATION.as_str()) {
            h
        } else {
            return Outcome::Error((Status::Unauthorized, ()));
        };
        let access_granter = try_outcome!(request.guard::<&State<AccessGranter>>().await);
        match access_granter.check_user_access(auth_header) {
            Ok(SessionInfo::Valid(identity)) => Outcome::Success(Authenticated(identity)),
            Ok(SessionInfo::Expired(_)) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => match e {
                AccessGranterError::HeaderFormatError |
                AccessGranterError::InvalidToken |
                AccessGranterError::InvalidCredentials
                => Outcome::Error((Status::Unauthorized, ())),

                AccessGranterError::EmailTaken |
                AccessGranterError::UserDbError(_) |
                AccessGranterError::AccessTokenGeneratorError(_)
                => Outcome::Error((Status::InternalServerError, ())),
            }
        }
    }
}
