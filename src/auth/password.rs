//! Argon2id password hashing.
//!
//! [`hash_password`] salts with [`OsRng`] and uses the crate's default parameters,
//! so every hash is produced with the same work factor. The result is a PHC string
//! (`$argon2id$v=19$m=19456,t=2,p=1$...`) stored in `users.password`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password. Returns a PHC-format string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// `Ok(false)` on mismatch, `Err` only if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
