/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoError {
    #[error("{0}")]
    Validation(&'static str),
    // Covers both "no such id" and "id owned by another caller".
    #[error("note not found")]
    NotFound,
}
