/*
 * Responsibility
 * - /api の URL 構造を定義
 * - /notes 以下はすべて Bearer 必須 (route_layer で auth middleware を適用)
 */
use axum::{
    Router,
    routing::{get, put},
};

use crate::api::handlers::notes::{create_note, delete_note, list_notes, update_note};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let notes = Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{note_id}", put(update_note).delete(delete_note));

    middleware::auth::access::apply(notes, state)
}
