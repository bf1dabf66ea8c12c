/*
 * Responsibility
 * - notes CRUD (in-memory, owner 単位で分離)
 * - id は 1 から単調増加、削除されても再利用しない
 * - 変更系は write lock の中で完結させる (id 採番と追加をアトミックに)
 */
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub completed: bool,
    // `sub` of the creating caller, fixed for the lifetime of the note.
    pub owner: String,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub completed: bool,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

pub const MSG_REQUIRED: &str = "Title and content are required";
pub const MSG_EMPTY: &str = "Title and content cannot be empty";

#[derive(Debug)]
struct Notes {
    // Kept in creation order, which is also ascending id order.
    rows: Vec<NoteRow>,
    next_id: u64,
}

impl Notes {
    fn position_owned(&self, owner: &str, id: u64) -> Option<usize> {
        self.rows
            .binary_search_by_key(&id, |row| row.id)
            .ok()
            .filter(|&idx| self.rows[idx].owner == owner)
    }
}

/// Shared note collection. Cheap to clone; all clones see the same notes.
#[derive(Debug, Clone)]
pub struct NoteStore {
    inner: Arc<RwLock<Notes>>,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Notes {
                rows: Vec::new(),
                next_id: 1,
            })),
        }
    }

    pub async fn list(&self, owner: &str) -> Vec<NoteRow> {
        let notes = self.inner.read().await;
        notes
            .rows
            .iter()
            .filter(|row| row.owner == owner)
            .cloned()
            .collect()
    }

    pub async fn create(&self, owner: &str, new: NewNote) -> Result<NoteRow, RepoError> {
        if new.title.is_empty() || new.content.is_empty() {
            return Err(RepoError::Validation(MSG_REQUIRED));
        }

        let mut notes = self.inner.write().await;
        let row = NoteRow {
            id: notes.next_id,
            title: new.title,
            content: new.content,
            completed: new.completed,
            owner: owner.to_string(),
        };
        notes.next_id += 1;
        notes.rows.push(row.clone());

        Ok(row)
    }

    pub async fn update(
        &self,
        owner: &str,
        id: u64,
        patch: NotePatch,
    ) -> Result<NoteRow, RepoError> {
        if patch.title.as_deref() == Some("") || patch.content.as_deref() == Some("") {
            return Err(RepoError::Validation(MSG_EMPTY));
        }

        let mut notes = self.inner.write().await;
        let idx = notes
            .position_owned(owner, id)
            .ok_or(RepoError::NotFound)?;

        let row = &mut notes.rows[idx];
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(content) = patch.content {
            row.content = content;
        }
        if let Some(completed) = patch.completed {
            row.completed = completed;
        }

        Ok(row.clone())
    }

    pub async fn delete(&self, owner: &str, id: u64) -> Result<(), RepoError> {
        let mut notes = self.inner.write().await;
        let idx = notes
            .position_owned(owner, id)
            .ok_or(RepoError::NotFound)?;

        // Vec::remove keeps the remaining rows in creation order.
        notes.rows.remove(idx);
        Ok(())
    }
}
