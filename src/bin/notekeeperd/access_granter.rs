use std::time::SystemTime;
use log::{debug, info, trace, warn};
use notekeeper::access_token::{AccessTokenDecoder, AccessTokenGenerator};
use notekeeper::data::User;
use notekeeper::email_string::EmailString;
use notekeeper::user_db::UserDb;
use crate::app_constants::ACCESS_TOKEN_VALIDITY_TIME;

mod errors;
mod model;

pub use errors::AccessGranterError;
pub use model::{Identity, LoginResult, SessionInfo};

pub struct AccessGranter {
    user_db: Box<dyn UserDb>,
    access_token_generator: AccessTokenGenerator,
    access_token_decoder: AccessTokenDecoder,
}

impl AccessGranter {
    pub fn new(
        user_db: Box<dyn UserDb>,
        access_token_generator: AccessTokenGenerator,
        access_token_decoder: AccessTokenDecoder,
    ) -> Self {
        AccessGranter {
            user_db,
            access_token_generator,
            access_token_decoder,
        }
    }

    /// Establish who is asking from an `Authorization` header value.
    /// Nothing here looks at resources; that is the note guard's job.
    pub fn check_user_access(
        &self,
        auth_header_value: &str,
    ) -> Result<SessionInfo, AccessGranterError> {
        trace!("authenticating user by authorization header");
        let token = auth_header_value.strip_prefix("Bearer ")
            .ok_or(AccessGranterError::HeaderFormatError)?;
        let token = self.access_token_decoder.decode_token(token)
            .map_err(|e| {
                warn!("failed to decode token: {}", e);
                AccessGranterError::InvalidToken
            })?;
        let identity = Identity {
            user_id: token.user_id,
            email: token.email,
        };
        let now = SystemTime::now();
        Ok(
            if token.expires_at <= now {
                trace!("expired token for user \"{}\"", identity.email);
                SessionInfo::Expired(identity)
            } else {
                trace!("valid token for user \"{}\"", identity.email);
                SessionInfo::Valid(identity)
            }
        )
    }

    pub async fn login_user(
        &self,
        email: &EmailString,
        password: String,
    ) -> Result<LoginResult, AccessGranterError> {
        debug!("logging user \"{email}\" in");
        let user = self.user_db
            .check_user_credentials(email, password)
            .await?;
        let Some(user) = user else {
            warn!("invalid credentials for user \"{email}\"");
            return Err(AccessGranterError::InvalidCredentials);
        };
        let now = SystemTime::now();
        let token = self.access_token_generator
            .generate_token(
                user.id,
                &user.email,
                &now,
                &(now + ACCESS_TOKEN_VALIDITY_TIME),
            )?;
        info!("logged user \"{email}\" in");
        Ok(
            LoginResult {
                token,
                user,
            }
        )
    }

    pub async fn register_user(
        &self,
        name: String,
        email: EmailString,
        password: String,
    ) -> Result<User, AccessGranterError> {
        debug!("registering user \"{email}\"");
        let user = self.user_db
            .create_user(name, email.clone(), password)
            .await?;
        info!("registered user \"{email}\"");
        Ok(user)
    }
}
