use time::OffsetDateTime;
use uuid::Uuid;
use crate::email_string::EmailString;

pub const EMAIL_CLAIM_NAME: &str = "email";

#[derive(Debug)]
pub struct AccessTokenData {
    pub user_id: Uuid,
    pub email: EmailString,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}
