use thiserror::Error;
use notekeeper::access_token::AccessTokenGeneratorError;
use notekeeper::user_db::UserDbError;

#[derive(Debug, Error)]
pub enum AccessGranterError {
    #[error("token format error")]
    HeaderFormatError,

    #[error("invalid token")]
    InvalidToken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error(transparent)]
    UserDbError(UserDbError),

    #[error(transparent)]
    AccessTokenGeneratorError(#[from] AccessTokenGeneratorError),
}

impl From<UserDbError> for AccessGranterError {
    fn from(e: UserDbError) -> Self {
        match e {
            UserDbError::EmailTaken => AccessGranterError::EmailTaken,
            _ => AccessGranterError::UserDbError(e),
        }
    }
}
