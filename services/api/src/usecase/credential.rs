use anyhow::{Context as _, anyhow};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::error::CrumbsError;

/// URL-safe base64 alphabet. 43 draws carry 258 bits, the same as 32 random bytes.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Length of the random part of API keys and reset tokens.
pub const TOKEN_LEN: usize = 43;

/// Unguessable URL-safe token.
pub fn random_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// `{prefix}_{random_token}`.
pub fn generate_api_key(prefix: &str) -> String {
    format!("{prefix}_{}", random_token())
}

/// Deterministic lookup hash for API keys (SHA-256, lowercase hex).
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}

/// Argon2id hash in PHC string form. Runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, CrumbsError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| anyhow!("hash password: {e}"))
    })
    .await
    .context("join password hasher")??;
    Ok(hash)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, CrumbsError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let ok = tokio::task::spawn_blocking(move || {
        let parsed =
            PasswordHash::new(&password_hash).map_err(|e| anyhow!("parse password hash: {e}"))?;
        Ok::<_, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .context("join password verifier")??;
    Ok(ok)
}
