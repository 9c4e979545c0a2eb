//! Password hashing
//!
//! bcrypt with a configurable cost factor. The hash is stored on the
//! user row and never serialized out of the data layer.

use crate::error::AppError;

/// Hash a plaintext password with bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost).map_err(|e| AppError::Internal(e.into()))
}

/// Check a plaintext password against a stored bcrypt hash
///
/// A malformed stored hash is an internal error, not a failed login.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, stored_hash).map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("hunter2", TEST_COST).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("hunter2", "not-a-bcrypt-hash").is_err());
    }
}
