//! Bearer credential → caller identity.
//!
//! - `Authorization` ヘッダからトークンを取り出す (scheme prefix は任意)
//! - claims を取り出して `sub` を owner identity として返す
//! - DecodeOnly: 署名検証なし (ローカル開発用)
//! - Verified: IdP の公開鍵で署名 + iss/aud/exp を検証
use axum::http::HeaderValue;
use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;

pub type Claims = serde_json::Map<String, Value>;

// JWT segments are base64url; some issuers keep the `=` padding, so accept both.
const B64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("token is missing")]
    Missing,
    #[error("{0}")]
    Invalid(String),
}

impl CredentialError {
    fn invalid(detail: impl Into<String>) -> Self {
        Self::Invalid(detail.into())
    }
}

/// Identity taken from a decoded credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub subject: String,
    // Log correlation only; never used for scoping.
    pub username: Option<String>,
}

/// Pull the raw token out of an `Authorization` header value.
///
/// `"Bearer abc"` and `"abc"` both yield `"abc"`. With a space present the token
/// is the word right after the first space.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, CredentialError> {
    let value = header.ok_or(CredentialError::Missing)?;
    if value.is_empty() {
        return Err(CredentialError::Missing);
    }

    let raw = value
        .to_str()
        .map_err(|_| CredentialError::invalid("authorization header is not visible ASCII"))?;

    let token = match raw.split_once(' ') {
        Some((_scheme, rest)) => rest.split_once(' ').map_or(rest, |(token, _)| token),
        None => raw,
    };

    if token.is_empty() {
        return Err(CredentialError::invalid("empty bearer token"));
    }

    Ok(token)
}

/// Decode a compact JWT without checking its signature.
pub fn decode_unverified(token: &str) -> Result<Claims, CredentialError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(CredentialError::invalid("wrong number of segments"));
    };

    decode_segment(header, "header")?;
    decode_segment(payload, "payload")
}

fn decode_segment(segment: &str, part: &str) -> Result<Claims, CredentialError> {
    let bytes = B64URL
        .decode(segment)
        .map_err(|e| CredentialError::invalid(format!("invalid {part} encoding: {e}")))?;

    serde_json::from_slice::<Claims>(&bytes)
        .map_err(|e| CredentialError::invalid(format!("invalid {part}: {e}")))
}

fn identity_from_claims(claims: &Claims) -> Result<CallerIdentity, CredentialError> {
    let subject = claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|sub| !sub.is_empty())
        .ok_or_else(|| CredentialError::invalid("missing 'sub' claim"))?;

    let username = claims
        .get("preferred_username")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(CallerIdentity {
        subject: subject.to_string(),
        username,
    })
}

#[derive(Clone)]
enum Mode {
    DecodeOnly,
    Verified {
        decoding_key: DecodingKey,
        validation: Box<Validation>,
    },
}

/// Resolves the caller identity for a request.
#[derive(Clone)]
pub struct CredentialVerifier {
    mode: Mode,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        match &self.mode {
            Mode::DecodeOnly => f
                .debug_struct("CredentialVerifier")
                .field("mode", &"decode-only")
                .finish(),
            Mode::Verified { validation, .. } => f
                .debug_struct("CredentialVerifier")
                .field("mode", &"verified")
                .field("validation", validation)
                .finish(),
        }
    }
}

impl CredentialVerifier {
    /// Claims are trusted as-is. Only for local development.
    pub fn decode_only() -> Self {
        Self {
            mode: Mode::DecodeOnly,
        }
    }

    pub fn verified(
        public_key_pem: &str,
        algorithm: Algorithm,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let pem = public_key_pem.as_bytes();
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem)?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem)?,
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem)?,
            _ => return Err(jsonwebtoken::errors::ErrorKind::InvalidAlgorithm.into()),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            mode: Mode::Verified {
                decoding_key,
                validation: Box::new(validation),
            },
        })
    }

    pub fn verifies_signature(&self) -> bool {
        matches!(self.mode, Mode::Verified { .. })
    }

    pub fn claims(&self, token: &str) -> Result<Claims, CredentialError> {
        match &self.mode {
            Mode::DecodeOnly => decode_unverified(token),
            Mode::Verified {
                decoding_key,
                validation,
            } => jsonwebtoken::decode::<Claims>(token, decoding_key, validation)
                .map(|data| data.claims)
                .map_err(|e| CredentialError::invalid(e.to_string())),
        }
    }

    /// Header → identity. Entry point for the auth middleware.
    pub fn identify(
        &self,
        header: Option<&HeaderValue>,
    ) -> Result<CallerIdentity, CredentialError> {
        let token = bearer_token(header)?;
        let claims = self.claims(token)?;
        identity_from_claims(&claims)
    }
}
