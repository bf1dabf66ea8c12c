/*
 * Responsibility
 * - Notes の request/response DTO
 * - owner (sub) はレスポンスに含めない
 */
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::note_repo::{MSG_REQUIRED, NewNote, NotePatch, NoteRow};

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl CreateNoteRequest {
    /// Presence check only. Empty strings are rejected by the store.
    pub fn into_new_note(self) -> Result<NewNote, AppError> {
        match (self.title, self.content) {
            (Some(title), Some(content)) => Ok(NewNote {
                title,
                content,
                completed: self.completed.unwrap_or(false),
            }),
            _ => Err(AppError::bad_request(MSG_REQUIRED, None)),
        }
    }
}

// `null` and a missing key both mean "leave as is".
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateNoteRequest> for NotePatch {
    fn from(req: UpdateNoteRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            completed: req.completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub completed: bool,
}

impl From<NoteRow> for NoteResponse {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            completed: row.completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
