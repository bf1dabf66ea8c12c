/*
 * Responsibility
 * - handler が受け取る extractor 群
 * - 失敗時は AppError に変換して JSON で返す
 */
mod auth_ctx;
mod json_body;
mod note_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json_body::JsonBody;
pub use note_id::NoteId;
