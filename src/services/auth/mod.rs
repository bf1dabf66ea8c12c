pub mod credential;
pub mod factory;

pub use credential::{CallerIdentity, CredentialError, CredentialVerifier};
pub use factory::build_credential_verifier;
