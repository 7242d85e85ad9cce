mod errors;
mod internal;

use async_trait::async_trait;
use crate::data::User;
use crate::email_string::EmailString;

pub use errors::UserDbError;
pub use internal::ProductionUserDb;

#[async_trait]
pub trait UserDb: Send + Sync {
    async fn find_user_by_email(
        &self,
        email: &EmailString,
    ) -> Result<Option<User>, UserDbError>;

    /// Create a credential record. The email must not be in use by any
    /// existing record, logically deleted ones included.
    async fn create_user(
        &self,
        name: String,
        email: EmailString,
        password: String,
    ) -> Result<User, UserDbError>;

    /// Look the user up and verify the password against the stored
    /// hash. `None` covers both an unknown email and a wrong password;
    /// callers get no way to tell them apart.
    async fn check_user_credentials(
        &self,
        email: &EmailString,
        password: String,
    ) -> Result<Option<User>, UserDbError>;
}
