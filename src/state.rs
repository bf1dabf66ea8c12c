/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - notes: NoteStore, auth: CredentialVerifier
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::note_repo::NoteStore;
use crate::services::auth::CredentialVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub notes: NoteStore,
    pub auth: Arc<CredentialVerifier>,
}

impl AppState {
    pub fn new(notes: NoteStore, auth: Arc<CredentialVerifier>) -> Self {
        Self { notes, auth }
    }
}
