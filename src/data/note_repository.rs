use crate::domain::note::Note;
use crate::domain::repository::NoteRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryNoteRepository {
    storage: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    #[instrument(skip(self, note), fields(note_id = %note.id, user_id = %note.user_id))]
    async fn save(&self, note: Note) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(note.id, note);
        trace!("Note saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(note_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Note>> {
        let storage = self.storage.read().await;
        let notes: Vec<Note> = storage
            .values()
            .filter(|note| note.is_owned_by(user_id))
            .cloned()
            .collect();
        debug!(count = notes.len(), "Loaded notes for owner");
        Ok(notes)
    }

    #[instrument(skip(self), fields(note_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(user_id: &str, title: &str) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            category: None,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryNoteRepository::new();
        let saved = note("user-1", "First");

        repo.save(saved.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_find_by_id_returns_none_for_unknown_id() {
        let repo = InMemoryNoteRepository::new();
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing_note() {
        let repo = InMemoryNoteRepository::new();
        let mut saved = note("user-1", "Before");
        repo.save(saved.clone()).await.unwrap();

        saved.title = "After".to_string();
        repo.save(saved.clone()).await.unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.title, "After");
        assert_eq!(repo.find_by_owner("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_owner_only_returns_owned_notes() {
        let repo = InMemoryNoteRepository::new();
        repo.save(note("alice", "a1")).await.unwrap();
        repo.save(note("alice", "a2")).await.unwrap();
        repo.save(note("bob", "b1")).await.unwrap();

        let alice = repo.find_by_owner("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|n| n.user_id == "alice"));

        assert!(repo.find_by_owner("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_note() {
        let repo = InMemoryNoteRepository::new();
        let saved = note("user-1", "Doomed");
        repo.save(saved.clone()).await.unwrap();

        assert!(repo.delete(saved.id).await.unwrap());
        assert!(repo.find_by_id(saved.id).await.unwrap().is_none());
        assert!(!repo.delete(saved.id).await.unwrap());
    }
}
