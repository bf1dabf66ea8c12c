//! Bearer credential → AuthCtx を extensions に入れる
//!
//! - `Authorization` を CredentialVerifier に渡し、`sub` を owner として解決する
//! - 失敗したら handler / body の読み取りより前に 401 で打ち切る
//! - handler へは request extensions 経由でのみ受け渡す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 保護対象のルートに認証を掛ける。
///
/// `route_layer` なので、マッチしたルートだけに効く (404/405 は認証なしで返る)。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match state.auth.identify(req.headers().get(header::AUTHORIZATION)) {
        Ok(identity) => identity,
        Err(err) => {
            // token 自体はログに出さない
            tracing::warn!(
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "bearer credential rejected"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        owner = %identity.subject,
        username = identity.username.as_deref().unwrap_or("-"),
        "caller identified"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(identity));

    Ok(next.run(req).await)
}
