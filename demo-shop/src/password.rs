use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::ShopError;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub(crate) fn hash_password(password: &str) -> Result<String, ShopError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ShopError::Password(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC-format hash.
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ShopError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| ShopError::Password(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
