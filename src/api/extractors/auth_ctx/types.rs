/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が credential を解決して request extensions に格納し、handler はこの型だけを受け取る
 */
use crate::services::auth::CallerIdentity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `owner` は credential の `sub` そのもの。notes の分離キーになる
/// - `username` はログ用 (`preferred_username`)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub owner: String,
    pub username: Option<String>,
}

impl From<CallerIdentity> for AuthCtx {
    fn from(identity: CallerIdentity) -> Self {
        Self {
            owner: identity.subject,
            username: identity.username,
        }
    }
}
