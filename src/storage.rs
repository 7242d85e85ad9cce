mod errors;
mod internal;

use async_trait::async_trait;
use uuid::Uuid;
use crate::data::Note;

pub use errors::StorageError;
pub use internal::ProductionNoteStorage;

/// Narrow persistence contract for notes. Ownership decisions are not
/// made here; records come back whoever owns them, and the guard in
/// front decides what the caller may see.
#[async_trait]
pub trait NoteStorage: Send + Sync {
    async fn load_note(
        &self,
        note_id: Uuid,
    ) -> Result<Option<Note>, StorageError>;

    /// All non-deleted notes of [owner], newest first.
    async fn list_notes(
        &self,
        owner: Uuid,
    ) -> Result<Vec<Note>, StorageError>;

    /// Create or replace the stored record for `note.id`.
    async fn write_note(&self, note: &Note) -> Result<(), StorageError>;
}
