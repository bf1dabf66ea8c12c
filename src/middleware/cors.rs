//! CORS policy for the browser frontend.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials.
//! - Production: allowlist origins from Config (`CORS_ALLOWED_ORIGINS`), WITHOUT credentials.
//!   An empty allowlist means no CORS headers at all.
//!
//! Bearer tokens travel in `Authorization`, never in cookies, so credentials stay off.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

fn allow_origin(config: &Config) -> AllowOrigin {
    if !config.app_env.is_production() {
        return AllowOrigin::from(Any);
    }

    // Exact match only. A `*` entry would never match a browser origin, so it is dropped.
    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| {
            if s == "*" {
                tracing::warn!("ignoring wildcard CORS origin in production");
                return None;
            }
            match HeaderValue::from_str(s) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %s, "ignoring unusable CORS origin");
                    None
                }
            }
        })
        .collect();

    AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
        allowed.iter().any(|v| v == origin)
    })
}

/// Apply CORS policy to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(config))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(60 * 10));

    router.layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt as _;

    use super::*;

    fn production(origins: &str) -> Config {
        Config::from_lookup(|key| match key {
            "APP_ENV" => Some("production".to_string()),
            "AUTH_PUBLIC_KEY_PEM" => Some("-----BEGIN PUBLIC KEY-----".to_string()),
            "CORS_ALLOWED_ORIGINS" => Some(origins.to_string()),
            _ => None,
        })
        .unwrap()
    }

    async fn allow_origin_header(config: &Config, origin: &str) -> Option<String> {
        let app = apply(Router::new().route("/health", get(|| async { "ok" })), config);
        let req = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn production_allows_only_listed_origins() {
        let config = production("https://notes.example.com");

        assert_eq!(
            allow_origin_header(&config, "https://notes.example.com").await.as_deref(),
            Some("https://notes.example.com")
        );
        assert_eq!(allow_origin_header(&config, "https://evil.example.com").await, None);
    }

    #[tokio::test]
    async fn production_wildcard_is_ignored() {
        let config = production("*, https://notes.example.com");

        assert_eq!(allow_origin_header(&config, "https://evil.example.com").await, None);
        assert_eq!(
            allow_origin_header(&config, "https://notes.example.com").await.as_deref(),
            Some("https://notes.example.com")
        );
    }

    #[tokio::test]
    async fn development_allows_any_origin() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(
            allow_origin_header(&config, "http://localhost:3000").await.as_deref(),
            Some("*")
        );
    }
}
