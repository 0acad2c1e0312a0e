use crate::domain::note::Note;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Inserts the note, replacing any stored note with the same id.
    async fn save(&self, note: Note) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>>;
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Note>>;
    /// Returns `true` if a note was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Validation` if another user already holds the email.
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
}
