/*
 * Responsibility
 * - /api/notes 系 CRUD handler
 * - AuthCtx の owner を必ず repo に渡す (他人の note は見えない・触れない)
 * - Path の {note_id} は NoteId extractor で受ける
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::notes::{CreateNoteRequest, MessageResponse, NoteResponse, UpdateNoteRequest},
        extractors::{AuthCtxExtractor, JsonBody, NoteId},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_notes(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Json<Vec<NoteResponse>> {
    let rows = state.notes.list(&auth.owner).await;

    Json(rows.into_iter().map(NoteResponse::from).collect())
}

pub async fn create_note(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    JsonBody(req): JsonBody<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    let new_note = req.into_new_note()?;
    let row = state.notes.create(&auth.owner, new_note).await?;

    tracing::debug!(
        note_id = row.id,
        owner = %auth.owner,
        username = auth.username.as_deref().unwrap_or("-"),
        "note created"
    );
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_note(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    NoteId(note_id): NoteId,
    JsonBody(req): JsonBody<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let row = state
        .notes
        .update(&auth.owner, note_id, req.into())
        .await?;

    Ok(Json(row.into()))
}

pub async fn delete_note(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    NoteId(note_id): NoteId,
) -> Result<Json<MessageResponse>, AppError> {
    state.notes.delete(&auth.owner, note_id).await?;

    tracing::debug!(note_id, owner = %auth.owner, "note deleted");
    Ok(Json(MessageResponse {
        message: "Note deleted",
    }))
}
