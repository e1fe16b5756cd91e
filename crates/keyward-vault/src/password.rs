// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id hashing for the login password.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`), so the parameters used at
//! signup travel with the hash and verification does not depend on the
//! current configuration.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use keyward_config::model::AuthConfig;
use keyward_core::KeywardError;
use ring::rand::{SecureRandom, SystemRandom};

/// Prefix shared by every Argon2 PHC string.
const PHC_PREFIX: &str = "$argon2";

/// Hash `password` with Argon2id and a random 16-byte salt.
pub fn hash_password(password: &str, config: &AuthConfig) -> Result<String, KeywardError> {
    let params = Params::new(
        config.kdf_memory_cost,
        config.kdf_iterations,
        config.kdf_parallelism,
        None,
    )
    .map_err(|e| KeywardError::Config(format!("invalid Argon2id parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = SaltString::encode_b64(&generate_salt()?)
        .map_err(|e| KeywardError::Internal(format!("failed to encode salt: {e}")))?;
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| KeywardError::Internal(format!("Argon2id hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Whether a stored login password is a hash rather than ciphertext.
///
/// Hex ciphertext can never start with `$`, so the two never collide.
pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with(PHC_PREFIX)
}

fn generate_salt() -> Result<[u8; 16], KeywardError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; 16];
    rng.fill(&mut salt)
        .map_err(|_| KeywardError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}
