use uuid::Uuid;
use notekeeper::data::User;
use notekeeper::email_string::EmailString;

#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

#[derive(Debug)]
pub enum SessionInfo {
    Valid(Identity),
    Expired(Identity),
}

/// The verified subject of a request, recovered from token claims.
/// Handlers receive it as a typed guard value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: EmailString,
}
