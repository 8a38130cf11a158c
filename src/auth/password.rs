//! Credential hashing via bcrypt
//!
//! bcrypt embeds a fresh random salt and the cost factor in the hash string,
//! so hashing the same password twice yields different outputs and the cost
//! can be raised without a schema change.

use crate::error::ApiError;

/// bcrypt cost factor
const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password
///
/// Hashing failure (e.g. entropy source unavailable) is fatal to the calling
/// operation.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(|e| ApiError::Internal(format!("bcrypt hash: {}", e)))
}

/// Verify a plaintext password against a stored hash
///
/// Returns `false` for any mismatch or malformed hash; never errors on bad
/// input, so a corrupt hash reads as "invalid credentials" rather than a 500.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: A password verifies against its own hash
    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
    }

    // Test 2: Hashing the same password twice yields different strings
    #[test]
    fn test_salt_uniqueness() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        // Both still verify
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    // Test 3: Wrong password fails verification
    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("secret1").unwrap();
        assert!(!verify_password("secret2", &hash));
    }

    // Test 4: Malformed hash verifies false instead of erroring
    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!verify_password("secret1", "not-a-bcrypt-hash"));
        assert!(!verify_password("secret1", ""));
    }

    // Test 5: Hash output is bcrypt PHC format
    #[test]
    fn test_hash_format() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$2"));
    }
}
