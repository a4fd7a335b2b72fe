//! Argon2id hashing for passwords and security answers.
//!
//! The `*_blocking` variants run on tokio's blocking pool.

use anyhow::{Context, Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

/// Trim and case-fold a security answer. Applied both when setting and when checking.
#[must_use]
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Hash a secret into a PHC string with a fresh random salt.
///
/// # Errors
/// Returns an error if Argon2 rejects the input.
pub fn hash_secret(secret: &SecretString) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash secret: {e}"))
}

/// Check a secret against a stored PHC string.
///
/// # Errors
/// Returns an error only if the stored hash is malformed; a mismatch is `Ok(false)`.
pub fn verify_secret(secret: &SecretString, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| anyhow!("Invalid stored hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(secret.expose_secret().as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_secret`] on the blocking pool.
///
/// # Errors
/// Returns an error if hashing fails or the blocking task panics.
pub async fn hash_secret_blocking(secret: SecretString) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_secret(&secret))
        .await
        .context("hashing task failed")?
}

/// [`verify_secret`] on the blocking pool.
///
/// # Errors
/// Returns an error if the stored hash is malformed or the blocking task panics.
pub async fn verify_secret_blocking(secret: SecretString, phc: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_secret(&secret, &phc))
        .await
        .context("verification task failed")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_answer_trims_and_lowercases() {
        assert_eq!(normalize_answer("  Blue \n"), "blue");
        assert_eq!(normalize_answer("ÉCOLE"), "école");
    }

    #[test]
    fn hash_is_salted_phc() -> Result<()> {
        let secret = SecretString::from("blue");
        let first = hash_secret(&secret)?;
        let second = hash_secret(&secret)?;
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_secret(&secret, &first)?);
        assert!(verify_secret(&secret, &second)?);
        Ok(())
    }

    #[test]
    fn wrong_secret_is_a_mismatch_not_an_error() -> Result<()> {
        let hash = hash_secret(&SecretString::from("blue"))?;
        assert!(!verify_secret(&SecretString::from("green"), &hash)?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_secret(&SecretString::from("blue"), "plaintext-blue").is_err());
    }

    #[tokio::test]
    async fn blocking_wrappers_round_trip() -> Result<()> {
        let hash = hash_secret_blocking(SecretString::from(normalize_answer(" Blue "))).await?;
        assert!(verify_secret_blocking(SecretString::from("blue"), hash).await?);
        Ok(())
    }
}
