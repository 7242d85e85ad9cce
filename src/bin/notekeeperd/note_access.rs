use log::debug;
use time::OffsetDateTime;
use tokio::time::timeout;
use uuid::Uuid;
use notekeeper::data::Note;
use notekeeper::rng::make_uuid;
use notekeeper::storage::NoteStorage;
use crate::access_granter::Identity;
use crate::app_constants::STORAGE_CALL_TIMEOUT;

mod errors;

pub use errors::NoteAccessError;

/// Per-note authorization gate. Every operation loads the record first
/// and lets it through only when the verified identity owns it; an
/// absent note, a deleted note and someone else's note all produce the
/// same `NotFound`, so callers cannot probe for foreign notes.
pub struct NoteAccess {
    storage: Box<dyn NoteStorage>,
}

impl NoteAccess {
    pub fn new(storage: Box<dyn NoteStorage>) -> Self {
        NoteAccess {
            storage,
        }
    }

    pub async fn get_note(
        &self,
        identity: &Identity,
        note_id: Uuid,
    ) -> Result<Note, NoteAccessError> {
        let note = timeout(
            STORAGE_CALL_TIMEOUT,
            self.storage.load_note(note_id),
        )
            .await
            .map_err(|_| NoteAccessError::Timeout)??;
        match note {
            Some(note) if note.owner == identity.user_id && !note.deleted =>
                Ok(note),
            Some(_) => {
                debug!(
                    "denying user {} access to note {note_id}",
                    identity.user_id,
                );
                Err(NoteAccessError::NotFound)
            },
            None => Err(NoteAccessError::NotFound),
        }
    }

    pub async fn list_notes(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Note>, NoteAccessError> {
        Ok(
            timeout(
                STORAGE_CALL_TIMEOUT,
                self.storage.list_notes(identity.user_id),
            )
                .await
                .map_err(|_| NoteAccessError::Timeout)??
        )
    }

    pub async fn create_note(
        &self,
        identity: &Identity,
        title: String,
        content: String,
    ) -> Result<Note, NoteAccessError> {
        let now = OffsetDateTime::now_utc();
        let note = Note {
            id: make_uuid(&mut rand::thread_rng()),
            owner: identity.user_id,
            title,
            content,
            image_url: None,
            created_at: now,
            updated_at: now,
            deleted: false,
        };
        self.write(&note).await?;
        Ok(note)
    }

    /// Overwrite only the provided fields, like the original HTTP
    /// contract: an omitted or empty field keeps its stored value.
    pub async fn update_note(
        &self,
        identity: &Identity,
        note_id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Note, NoteAccessError> {
        let mut note = self.get_note(identity, note_id).await?;
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        note.updated_at = OffsetDateTime::now_utc();
        self.write(&note).await?;
        Ok(note)
    }

    pub async fn delete_note(
        &self,
        identity: &Identity,
        note_id: Uuid,
    ) -> Result<(), NoteAccessError> {
        let mut note = self.get_note(identity, note_id).await?;
        note.deleted = true;
        note.updated_at = OffsetDateTime::now_utc();
        self.write(&note).await
    }

    pub async fn attach_image(
        &self,
        identity: &Identity,
        note_id: Uuid,
        image_url: String,
    ) -> Result<Note, NoteAccessError> {
        let mut note = self.get_note(identity, note_id).await?;
        note.image_url = Some(image_url);
        note.updated_at = OffsetDateTime::now_utc();
        self.write(&note).await?;
        Ok(note)
    }

    async fn write(&self, note: &Note) -> Result<(), NoteAccessError> {
        timeout(STORAGE_CALL_TIMEOUT, self.storage.write_note(note))
            .await
            .map_err(|_| NoteAccessError::Timeout)?
            .map_err(NoteAccessError::from)
    }
}
