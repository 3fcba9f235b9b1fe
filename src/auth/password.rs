use thiserror::Error;
use tracing::{error, warn};

/// Fixed bcrypt work factor so offline-cracking cost is stable across
/// deployments. The digest embeds salt and cost, no side table needed.
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

pub fn hash_password(plain: &str) -> Result<String, HashError> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        HashError(e.to_string())
    })
}

/// Constant-time comparison of a submitted password against a stored
/// digest. A malformed digest and a wrong password are both reported as a
/// mismatch; the cause is only logged.
pub fn verify_password(digest: &str, plain: &str) -> bool {
    match bcrypt::verify(plain, digest) {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "bcrypt verify error");
            false
        }
    }
}
