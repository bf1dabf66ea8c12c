/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, Keycloak / Auth 設定など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity provider settings.
///
/// `public_key_pem` が無い場合は署名検証なし (decode-only) で動く。
/// production ではそれを許可しない。
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub keycloak_url: Url,
    pub realm: String,
    pub client_id: String,
    pub public_key_pem: Option<String>,
    pub algorithm: Algorithm,
    pub leeway_seconds: u64,
}

impl AuthConfig {
    /// Expected `iss` claim: `{KEYCLOAK_URL}/realms/{KEYCLOAK_REALM}`.
    pub fn issuer(&self) -> String {
        format!(
            "{}/realms/{}",
            self.keycloak_url.as_str().trim_end_matches('/'),
            self.realm
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a `Config` from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 5000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(&get("APP_ENV").unwrap_or_else(|| "development".to_string()));

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let keycloak_url =
            get("KEYCLOAK_URL").unwrap_or_else(|| "http://localhost:8080".to_string());
        let keycloak_url =
            Url::parse(&keycloak_url).map_err(|_| ConfigError::Invalid("KEYCLOAK_URL"))?;

        let realm = get("KEYCLOAK_REALM").unwrap_or_else(|| "notes-realm".to_string());
        if realm.trim().is_empty() {
            return Err(ConfigError::Invalid("KEYCLOAK_REALM"));
        }

        let client_id = get("KEYCLOAK_CLIENT_ID").unwrap_or_else(|| "notes-client".to_string());
        if client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("KEYCLOAK_CLIENT_ID"));
        }

        let public_key_pem = get("AUTH_PUBLIC_KEY_PEM")
            .map(|pem| pem.replace("\\n", "\n"))
            .filter(|pem| !pem.trim().is_empty());

        if public_key_pem.is_none() && app_env.is_production() {
            // production で署名検証なしは許可しない
            return Err(ConfigError::Missing("AUTH_PUBLIC_KEY_PEM"));
        }

        let algorithm = match get("AUTH_JWT_ALGORITHM") {
            Some(raw) => parse_algorithm(&raw).ok_or(ConfigError::Invalid("AUTH_JWT_ALGORITHM"))?,
            None => Algorithm::RS256,
        };

        let leeway_seconds = get("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth: AuthConfig {
                keycloak_url,
                realm,
                client_id,
                public_key_pem,
                algorithm,
                leeway_seconds,
            },
        })
    }
}

// Keycloak realm keys are RS256 by default; EC and Ed25519 keys are accepted too.
fn parse_algorithm(raw: &str) -> Option<Algorithm> {
    match raw.trim() {
        "RS256" => Some(Algorithm::RS256),
        "RS384" => Some(Algorithm::RS384),
        "RS512" => Some(Algorithm::RS512),
        "ES256" => Some(Algorithm::ES256),
        "ES384" => Some(Algorithm::ES384),
        "EdDSA" => Some(Algorithm::EdDSA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_local_keycloak() {
        let config = load(&[]).unwrap();

        assert_eq!(config.addr.port(), 5000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.auth.realm, "notes-realm");
        assert_eq!(config.auth.client_id, "notes-client");
        assert_eq!(config.auth.issuer(), "http://localhost:8080/realms/notes-realm");
        assert_eq!(config.auth.algorithm, Algorithm::RS256);
        assert!(config.auth.public_key_pem.is_none());
    }

    #[test]
    fn production_requires_public_key() {
        let err = load(&[("APP_ENV", "prod")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AUTH_PUBLIC_KEY_PEM")));

        let config = load(&[
            ("APP_ENV", "production"),
            ("AUTH_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----"),
        ])
        .unwrap();
        assert!(config.app_env.is_production());
        assert_eq!(
            config.auth.public_key_pem.as_deref(),
            Some("-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----")
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::Invalid("PORT"))));
        assert!(matches!(
            load(&[("KEYCLOAK_URL", "not a url")]),
            Err(ConfigError::Invalid("KEYCLOAK_URL"))
        ));
        assert!(matches!(
            load(&[("AUTH_JWT_ALGORITHM", "HS256")]),
            Err(ConfigError::Invalid("AUTH_JWT_ALGORITHM"))
        ));
    }

    #[test]
    fn issuer_ignores_trailing_slash() {
        let config = load(&[
            ("KEYCLOAK_URL", "https://sso.example.com/"),
            ("KEYCLOAK_REALM", "team"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, ,https://b.example.com"),
        ])
        .unwrap();

        assert_eq!(config.auth.issuer(), "https://sso.example.com/realms/team");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }
}
