use std::io::Error as IoError;
use thiserror::Error;
use crate::hasher::HasherError;

#[derive(Debug, Error)]
pub enum UserDbError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error("invalid user db contents: {0}")]
    Parsing(#[from] toml::de::Error),

    #[error("serializing the user db failed: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("email is already registered")]
    EmailTaken,

    #[error(transparent)]
    Hasher(#[from] HasherError),

    #[error("hashing task failed to complete")]
    HasherTask,
}
