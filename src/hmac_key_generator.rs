use std::io;
use std::path::Path;
use josekit::jws::alg::hmac::HmacJwsAlgorithm;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use crate::lib_constants::HMAC_SECRET_LEN;

/// Generate a fresh HS256 secret and write it out as a JWK. The server
/// refuses to start without this file, so this is the only way a
/// signing secret ever comes into existence.
pub fn make_hmac_key(
    path: impl AsRef<Path>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(), HmacKeyGeneratorError> {
    let mut secret = [0u8; HMAC_SECRET_LEN];
    rng.try_fill_bytes(&mut secret)
        .map_err(|_| HmacKeyGeneratorError::Random)?;
    std::fs::write(
        path,
        serde_json::to_string_pretty(
            &HmacJwsAlgorithm::Hs256.to_jwk(&secret)
        )? + "\n",
    )?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum HmacKeyGeneratorError {
    #[error("failed to get random values")]
    Random,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to serialize the key: {0}")]
    Serialization(#[from] serde_json::Error),
}
