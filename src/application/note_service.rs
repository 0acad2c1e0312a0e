use crate::domain::error::DomainError;
use crate::domain::note::{CreateNote, ListNotesQuery, Note, UpdateNote};
use crate::domain::repository::NoteRepository;
use crate::domain::user::AuthenticatedUser;
use crate::domain::validation::{validate_category, validate_content, validate_title};
use anyhow::Result;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const NOTE_NOT_FOUND: &str = "Note not found";

/// Which operation an ownership check guards; only affects the message.
#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Modify,
    Delete,
}

impl Access {
    fn denied_message(self) -> &'static str {
        match self {
            Access::Read => "You do not have access to this note",
            Access::Modify => "You do not have permission to modify this note",
            Access::Delete => "You do not have permission to delete this note",
        }
    }
}

pub struct NoteService<R: NoteRepository> {
    repository: Arc<R>,
}

fn require_caller(caller: Option<&AuthenticatedUser>) -> Result<&AuthenticatedUser, DomainError> {
    caller.ok_or_else(|| DomainError::unauthorized("Authentication required"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, caller, query), fields(user_id))]
    pub async fn list(
        &self,
        caller: Option<&AuthenticatedUser>,
        query: ListNotesQuery,
    ) -> Result<Vec<Note>> {
        let caller = require_caller(caller)?;
        tracing::Span::current().record("user_id", caller.user_id.as_str());

        let category = non_empty(query.category.as_deref());
        let search = non_empty(query.search.as_deref()).map(str::to_lowercase);

        let mut notes: Vec<Note> = self
            .repository
            .find_by_owner(&caller.user_id)
            .await?
            .into_iter()
            .filter(|note| category.is_none_or(|c| note.category.as_deref() == Some(c)))
            .collect();

        match &search {
            Some(needle) => {
                notes.retain(|note| {
                    note.title.to_lowercase().contains(needle.as_str())
                        || note.content.to_lowercase().contains(needle.as_str())
                });
                notes.sort_by_cached_key(|note| {
                    (
                        !note.title.to_lowercase().contains(needle.as_str()),
                        Reverse(note.created_at),
                    )
                });
            }
            None => notes.sort_by_key(|note| Reverse(note.created_at)),
        }

        debug!(
            count = notes.len(),
            category = ?category,
            search = ?search,
            "Listed notes"
        );
        Ok(notes)
    }

    #[instrument(skip(self, caller), fields(note_id = id))]
    pub async fn get(&self, caller: Option<&AuthenticatedUser>, id: &str) -> Result<Note> {
        let caller = require_caller(caller)?;
        let note = self.load_owned(caller, id, Access::Read).await?;
        debug!(note_id = %note.id, "Note retrieved");
        Ok(note)
    }

    #[instrument(skip(self, caller, req))]
    pub async fn create(&self, caller: Option<&AuthenticatedUser>, req: CreateNote) -> Result<Note> {
        let caller = require_caller(caller)?;

        let title = validate_title(&req.title)?;
        let content = req.content.unwrap_or_default();
        validate_content(&content)?;
        let category = validate_category(req.category.as_deref())?;

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title,
            content,
            category,
            user_id: caller.user_id.clone(),
            created_at: now,
            updated_at: now,
        };

        self.repository.save(note.clone()).await?;
        info!(note_id = %note.id, user_id = %note.user_id, "Note created");
        Ok(note)
    }

    #[instrument(skip(self, caller, req), fields(note_id = id))]
    pub async fn update(
        &self,
        caller: Option<&AuthenticatedUser>,
        id: &str,
        req: UpdateNote,
    ) -> Result<Note> {
        let caller = require_caller(caller)?;
        let mut note = self.load_owned(caller, id, Access::Modify).await?;

        if req.is_empty() {
            debug!(note_id = %note.id, "Empty update, returning note unchanged");
            return Ok(note);
        }

        if let Some(title) = &req.title {
            note.title = validate_title(title)?;
        }
        if let Some(content) = req.content {
            validate_content(&content)?;
            note.content = content;
        }
        if let Some(category) = &req.category {
            note.category = validate_category(category.as_deref())?;
        }
        note.updated_at = Utc::now();

        self.repository.save(note.clone()).await?;
        info!(note_id = %note.id, "Note updated");
        Ok(note)
    }

    #[instrument(skip(self, caller), fields(note_id = id))]
    pub async fn delete(&self, caller: Option<&AuthenticatedUser>, id: &str) -> Result<()> {
        let caller = require_caller(caller)?;
        let note = self.load_owned(caller, id, Access::Delete).await?;

        if !self.repository.delete(note.id).await? {
            // Removed by a concurrent request between the lookup and now.
            return Err(DomainError::not_found(NOTE_NOT_FOUND).into());
        }
        info!(note_id = %note.id, "Note deleted");
        Ok(())
    }

    #[instrument(skip(self, caller))]
    pub async fn categories(&self, caller: Option<&AuthenticatedUser>) -> Result<Vec<String>> {
        let caller = require_caller(caller)?;

        let categories: BTreeSet<String> = self
            .repository
            .find_by_owner(&caller.user_id)
            .await?
            .into_iter()
            .filter_map(|note| note.category)
            .filter(|category| !category.is_empty())
            .collect();

        Ok(categories.into_iter().collect())
    }

    async fn load_owned(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        access: Access,
    ) -> Result<Note> {
        let note_id =
            Uuid::parse_str(id).map_err(|_| DomainError::not_found(NOTE_NOT_FOUND))?;

        let note = self
            .repository
            .find_by_id(note_id)
            .await?
            .ok_or_else(|| DomainError::not_found(NOTE_NOT_FOUND))?;

        if !note.is_owned_by(&caller.user_id) {
            warn!(
                note_id = %note.id,
                owner_id = %note.user_id,
                caller_id = %caller.user_id,
                "Ownership check failed"
            );
            return Err(DomainError::forbidden(access.denied_message()).into());
        }
        Ok(note)
    }
}
