//! In-process stand-in for the Postgres repository, used by tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use std::sync::atomic::{AtomicBool, Ordering};

use super::NoteStore;
use crate::{
    error::NoteError,
    models::{NewNote, Note, NoteChanges, NoteId},
};

#[derive(Default)]
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Makes every following operation fail as if the connection dropped.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), NoteError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NoteError::StoreUnavailable("connection closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Note>, NoteError> {
        self.check()?;
        Ok(self.notes.read().await.clone())
    }

    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteError> {
        self.check()?;
        Ok(self.notes.read().await.iter().find(|n| n.id == id).cloned())
    }

    async fn create(&self, fields: NewNote) -> Result<Note, NoteError> {
        self.check()?;
        let now = Utc::now();
        let note = Note {
            id: NoteId::generate(),
            title: fields.title,
            content: fields.content,
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        changes: NoteChanges,
    ) -> Result<Option<Note>, NoteError> {
        self.check()?;
        let mut notes = self.notes.write().await;
        let updated = notes.iter_mut().find(|n| n.id == id).map(|note| {
            if let Some(title) = changes.title {
                note.title = title;
            }
            if let Some(content) = changes.content {
                note.content = content;
            }
            note.updated_at = Utc::now().max(note.created_at);
            note.clone()
        });
        drop(notes);

        Ok(updated)
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<bool, NoteError> {
        self.check()?;
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        let removed = notes.len() != before;
        drop(notes);

        Ok(removed)
    }
}
