use std::time::SystemTime;
use josekit::jwk::Jwk;
use josekit::jws::alg::hmac::{HmacJwsAlgorithm, HmacJwsSigner};
use josekit::jws::JwsHeader;
use josekit::jwt;
use josekit::jwt::JwtPayload;
use uuid::Uuid;
use errors::AccessTokenGeneratorError;
use crate::access_token::data::EMAIL_CLAIM_NAME;
use crate::email_string::EmailString;

pub mod errors;

pub struct AccessTokenGenerator {
    signer: HmacJwsSigner,
}

impl AccessTokenGenerator {
    pub fn from_jwk(key: &Jwk) -> Result<Self, AccessTokenGeneratorError> {
        Ok(
            AccessTokenGenerator {
                signer: HmacJwsAlgorithm::Hs256.signer_from_jwk(key)?,
            }
        )
    }

    /// Encode and sign a token for the given subject. Pure function of
    /// the secret and the arguments; the expiry policy belongs to the
    /// caller.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        email: &EmailString,
        issued_at: &SystemTime,
        expires_at: &SystemTime,
    ) -> Result<String, AccessTokenGeneratorError> {
        let mut payload = JwtPayload::new();
        payload.set_subject(user_id.to_string());
        payload.set_claim(
            EMAIL_CLAIM_NAME,
            Some(serde_json::to_value(email)?),
        )?;
        payload.set_issued_at(issued_at);
        payload.set_expires_at(expires_at);

        Ok(
            jwt::encode_with_signer(
                &payload,
                &JwsHeader::new(),
                &self.signer,
            )?
        )
    }
}
