use thiserror::Error;

use tokio::io::Error as IoError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    IoError(#[from] IoError),

    #[error("invalid note file contents: {0}")]
    Parsing(#[from] toml::de::Error),

    #[error("serializing the note failed: {0}")]
    Serialization(#[from] toml::ser::Error),
}
