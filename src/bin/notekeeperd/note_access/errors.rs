use thiserror::Error;
use notekeeper::storage::StorageError;

#[derive(Debug, Error)]
pub enum NoteAccessError {
    #[error("note not found")]
    NotFound,

    #[error("note store call timed out")]
    Timeout,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
