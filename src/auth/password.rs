use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::warn;

const SHA256_SCHEME: &str = "sha256";
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

fn sha256_digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

fn sha256_hash(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);

    format!("{}${}${}", SHA256_SCHEME, salt, sha256_digest(password, &salt))
}

/// Hashes with bcrypt at the default cost. Falls back to salted SHA-256
/// (`sha256$<salt>$<digest>`) if bcrypt fails.
pub fn hash_password(password: &str) -> String {
    match bcrypt::hash(password, bcrypt::DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            warn!("bcrypt hashing failed, using sha256: {}", e);
            sha256_hash(password)
        }
    }
}

/// Accepts bcrypt hashes and legacy `sha256$` rows.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p)) {
        return bcrypt::verify(password, stored).unwrap_or(false);
    }

    let mut parts = stored.split('$');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(SHA256_SCHEME), Some(salt), Some(expected), None) => {
            sha256_digest(password, salt) == expected
        }
        _ => false,
    }
}
