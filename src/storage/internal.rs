
use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use async_trait::async_trait;
use log::error;
use tokio::fs;
use uuid::Uuid;
use crate::config::AppConfig;
use crate::data::Note;
use crate::storage::{NoteStorage, StorageError};

pub struct ProductionNoteStorage {
    notes_dir: PathBuf,
}

impl ProductionNoteStorage {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<ProductionNoteStorage, StorageError> {
        let notes_dir = app_config.data_directory.join("notes");
        fs::create_dir_all(&notes_dir).await?;
        Ok(ProductionNoteStorage { notes_dir })
    }

    fn note_path(&self, note_id: Uuid) -> PathBuf {
        self.notes_dir.join(format!("{note_id}.toml"))
    }
}

#[async_trait]
impl NoteStorage for ProductionNoteStorage {
    async fn load_note(
        &self,
        note_id: Uuid,
    ) -> Result<Option<Note>, StorageError> {
        let contents = match fs::read_to_string(self.note_path(note_id)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(toml::from_str(&contents)?))
    }

    async fn list_notes(
        &self,
        owner: Uuid,
    ) -> Result<Vec<Note>, StorageError> {
        let mut notes = Vec::new();
        let mut entries = fs::read_dir(&self.notes_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension() != Some(OsStr::new("toml")) {
                continue;
            }
            let note: Note = toml::from_str(&fs::read_to_string(&path).await?)?;
            if note.owner == owner && !note.deleted {
                notes.push(note);
            }
        }
        notes.sort_unstable_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn write_note(&self, note: &Note) -> Result<(), StorageError> {
        let path = self.note_path(note.id);
        let tmp_path = self.notes_dir.join(Uuid::new_v4().to_string());
        fs::write(&tmp_path, toml::to_string_pretty(note)?).await?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                error!(
                    "failed to clean up stray note file {}: {e}",
                    tmp_path.display(),
                );
            }
            return Err(e.into());
        }
        Ok(())
    }
}
