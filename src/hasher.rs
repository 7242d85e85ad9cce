
use argon2::{Algorithm, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use argon2::Argon2;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use log::debug;
use thiserror::Error;

// TODO: support an additional secret-key pepper once there is a place
//  to provision it from

pub trait Hasher: Send + Sync {
    fn generate_hash(&self, password: &str) -> Result<String, HasherError>;

    /// Check [password] against a stored PHC hash string.
    ///
    /// Any failure is `false`: a wrong password and an unparseable
    /// stored hash are indistinguishable to the caller.
    fn check_hash(&self, hash: &str, password: &str) -> bool;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProductionHasherConfig {
    pub argon2_params: argon2::Params,
}

impl ProductionHasherConfig {
    pub fn new(argon2_params: argon2::Params) -> Self {
        ProductionHasherConfig {
            argon2_params,
        }
    }
}

pub struct ProductionHasher {
    config: ProductionHasherConfig,
}

impl ProductionHasher {
    pub fn new(config: ProductionHasherConfig) -> Self {
        ProductionHasher {
            config,
        }
    }

    fn get_hasher(&self) -> Argon2<'_> {
        Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            self.config.argon2_params.clone(),
        )
    }
}

impl Hasher for ProductionHasher {
    fn generate_hash(&self, password: &str) -> Result<String, HasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.get_hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.serialize().to_string())
            .map_err(|e| HasherError::Hash(e.to_string()))
    }

    fn check_hash(&self, hash: &str, password: &str) -> bool {
        let hash = match PasswordHash::new(hash) {
            Ok(hash) => hash,
            Err(e) => {
                debug!("stored hash did not parse: {e}");
                return false;
            },
        };
        self.get_hasher()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }
}

#[derive(Debug, Error)]
pub enum HasherError {
    #[error("failed to hash password: {0}")]
    Hash(String),
}
