use crate::api::error::AppError;

/// Credential verification against the stored one-way hash. The plaintext
/// secret is never logged or persisted; it only transits this module on the
/// way into bcrypt.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("failed to hash password: {e}")))
}

/// Returns whether the presented secret matches the stored hash. A
/// malformed stored hash counts as a mismatch rather than an error, so the
/// login path stays indistinguishable for the caller.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_secret() {
        // Low cost keeps the test fast; the cost factor is not under test.
        let hash = bcrypt::hash("s3creta", 4).unwrap();
        assert!(verify_password("s3creta", &hash));
        assert!(!verify_password("otra", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("s3creta", "not-a-bcrypt-hash"));
    }
}
