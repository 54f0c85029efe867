//! Password hashing and avatar fingerprinting.
//!
//! The derivation constants here are a compatibility surface: hashes produced
//! with a different iteration count, inner digest, or PRF will never match
//! previously stored credentials. Treat any change as a data migration, not a
//! tuning knob.

use base64::{Engine, engine::general_purpose};
use md5::Md5;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

use tracklet_core::{DomainError, UserId};

/// PBKDF2 iteration count for password stretching.
pub const PASSWORD_HASH_ITERATIONS: u32 = 20_000;

/// Derived password hash length in bytes (before base64 encoding).
pub const PASSWORD_HASH_LEN: usize = 64;

/// Salt length in bytes (before base64 encoding).
pub const SALT_LEN: usize = 16;

/// Failure of a cryptographic primitive.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS secure random source failed. Fatal for the operation: there is
    /// deliberately no fallback to a weaker generator.
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(#[from] rand::Error),
}

/// Fill an `N`-byte array from the OS CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut bytes = [0u8; N];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes)
}

/// A 16-byte password salt.
///
/// Generated once at account creation and stored as base64 text alongside the
/// hash. The fixed length is an invariant of the hash derivation, so the type
/// refuses to decode anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Generate a fresh random salt.
    pub fn generate() -> Result<Self, CryptoError> {
        Ok(Self(random_bytes()?))
    }

    /// Decode a salt from its stored base64 form.
    pub fn from_base64(encoded: &str) -> Result<Self, DomainError> {
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| DomainError::validation(format!("salt is not valid base64: {}", e)))?;
        let bytes: [u8; SALT_LEN] = bytes
            .try_into()
            .map_err(|_| DomainError::validation("salt must decode to exactly 16 bytes"))?;
        Ok(Self(bytes))
    }

    /// The stored (base64) form.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl From<[u8; SALT_LEN]> for Salt {
    fn from(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }
}

/// Derive the password hash for `(id, salt, password)`.
///
/// The inner digest is SHA-256 over the UTF-8 bytes of `hex(id) + password`,
/// where `hex(id)` is the identifier's 32-character lowercase simple form.
/// That digest is then stretched with PBKDF2-HMAC-SHA1 over the salt for
/// [`PASSWORD_HASH_ITERATIONS`] rounds into [`PASSWORD_HASH_LEN`] bytes.
///
/// Deterministic: identical `(id, salt, password)` always yields the same
/// output. Changing any of the three changes the hash.
pub fn compute_password_hash(
    id: UserId,
    salt: &Salt,
    password: &str,
) -> [u8; PASSWORD_HASH_LEN] {
    let mut inner = Sha256::new();
    inner.update(id.to_simple_hex().as_bytes());
    inner.update(password.as_bytes());
    let digest = inner.finalize();

    let mut derived = [0u8; PASSWORD_HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha1>(
        digest.as_slice(),
        salt.as_bytes(),
        PASSWORD_HASH_ITERATIONS,
        &mut derived,
    );
    derived
}

/// [`compute_password_hash`] encoded as base64, the stored form.
pub fn compute_password_hash_b64(id: UserId, salt: &Salt, password: &str) -> String {
    general_purpose::STANDARD.encode(compute_password_hash(id, salt, password))
}

/// Fingerprint used to build avatar URLs for an email address.
///
/// Trims and lower-cases the email, then MD5s it into 32 lowercase hex
/// characters. MD5 is mandated by the third-party avatar service; this is an
/// interop identifier, not a security primitive, and not a secret.
pub fn avatar_fingerprint(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let mut md5 = Md5::new();
    md5.update(normalized.as_bytes());
    hex::encode(md5.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_id() -> UserId {
        "11111111-1111-1111-1111-111111111111".parse().unwrap()
    }

    fn zero_salt() -> Salt {
        Salt::from([0u8; SALT_LEN])
    }

    #[test]
    fn password_hash_is_deterministic() {
        let id = UserId::new();
        let salt = Salt::generate().unwrap();
        let a = compute_password_hash(id, &salt, "hunter2");
        let b = compute_password_hash(id, &salt, "hunter2");
        assert_eq!(a, b);
    }

    #[test]
    fn password_hash_matches_known_vector() {
        // Interop vector: any reimplementation of the derivation must
        // reproduce this exact output for stored hashes to keep working.
        let hash = compute_password_hash_b64(fixed_id(), &zero_salt(), "hunter2");
        assert_eq!(
            hash,
            "f2ZXHyN+EnxHVJ6yAvDL1pVhv5DJZuXOrO0CODqpiV1gLkBsEQpVZ5aiHCHqbtaZn9IFHrDHjgC3u6TbyMxpCg=="
        );
    }

    #[test]
    fn one_character_password_change_changes_hash() {
        let id = fixed_id();
        let salt = zero_salt();
        let a = compute_password_hash(id, &salt, "hunter2");
        let b = compute_password_hash(id, &salt, "hunter3");
        assert_ne!(a, b);
    }

    #[test]
    fn different_id_changes_hash() {
        let salt = zero_salt();
        let a = compute_password_hash(fixed_id(), &salt, "hunter2");
        let b = compute_password_hash(UserId::new(), &salt, "hunter2");
        assert_ne!(a, b);
    }

    #[test]
    fn different_salt_changes_hash() {
        let id = fixed_id();
        let a = compute_password_hash(id, &zero_salt(), "hunter2");
        let b = compute_password_hash(id, &Salt::from([1u8; SALT_LEN]), "hunter2");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_64_bytes() {
        let hash = compute_password_hash(fixed_id(), &zero_salt(), "hunter2");
        assert_eq!(hash.len(), PASSWORD_HASH_LEN);
    }

    #[test]
    fn fingerprint_normalizes_case_and_whitespace() {
        assert_eq!(
            avatar_fingerprint("Test@Example.com "),
            avatar_fingerprint("test@example.com")
        );
    }

    #[test]
    fn fingerprint_matches_known_vector() {
        assert_eq!(
            avatar_fingerprint("test@example.com"),
            "55502f40dc8b7c769880b10874abc9d0"
        );
    }

    #[test]
    fn fingerprint_is_32_lowercase_hex_chars() {
        let fp = avatar_fingerprint("x@y.com");
        assert_eq!(fp.len(), 32);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn salt_base64_round_trip() {
        let salt = Salt::generate().unwrap();
        let decoded = Salt::from_base64(&salt.to_base64()).unwrap();
        assert_eq!(salt, decoded);
    }

    #[test]
    fn salt_rejects_wrong_length() {
        // base64 of 12 bytes, not 16
        let err = Salt::from_base64("AAAAAAAAAAAAAAAA").unwrap_err();
        assert!(matches!(err, tracklet_core::DomainError::Validation(_)));
    }

    #[test]
    fn salt_rejects_invalid_base64() {
        assert!(Salt::from_base64("!!! not base64 !!!").is_err());
    }
}
