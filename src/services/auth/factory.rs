/// Factory: build `CredentialVerifier` from application `Config`.
use std::sync::Arc;

use anyhow::Context;

use crate::config::AuthConfig;
use crate::services::auth::CredentialVerifier;

pub fn build_credential_verifier(
    config: &AuthConfig,
) -> anyhow::Result<Arc<CredentialVerifier>> {
    let Some(pem) = config.public_key_pem.as_deref() else {
        tracing::warn!(
            "AUTH_PUBLIC_KEY_PEM is not set: \
             bearer tokens are decoded WITHOUT signature verification"
        );
        return Ok(Arc::new(CredentialVerifier::decode_only()));
    };

    let verifier = CredentialVerifier::verified(
        pem,
        config.algorithm,
        &config.issuer(),
        &config.client_id,
        config.leeway_seconds,
    )
    .with_context(|| format!("invalid {:?} public key in AUTH_PUBLIC_KEY_PEM", config.algorithm))?;

    Ok(Arc::new(verifier))
}
