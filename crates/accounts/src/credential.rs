//! Credential assembly for new accounts.

use serde::{Deserialize, Serialize};

use tracklet_core::UserId;

use crate::hash::{self, CryptoError, Salt};

/// The freshly minted credential bundle for a new account.
///
/// Persistence belongs to the surrounding store; this type only guarantees
/// that the fields are internally consistent (the hash is derived from this
/// exact id and salt).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: UserId,
    /// Lower-cased email address.
    pub email: String,
    /// Lower-cased username; defaults to the normalized email.
    pub username: String,
    /// 32 lowercase hex characters, derived from the normalized email.
    pub avatar_fingerprint: String,
    pub salt: Salt,
    /// Base64 of the 64-byte derived hash.
    pub password_hash: String,
}

impl Credential {
    /// Create a credential bundle for a new account.
    ///
    /// The username defaults to the normalized email when absent or empty.
    /// A missing password is hashed as an empty contribution; whether such an
    /// account may authenticate at all is policy for the surrounding
    /// application, not enforced here.
    pub fn create(
        email: &str,
        password: Option<&str>,
        username: Option<&str>,
    ) -> Result<Self, CryptoError> {
        let salt = Salt::generate()?;
        let id = UserId::new();

        let username = match username {
            Some(name) if !name.is_empty() => name.to_lowercase(),
            _ => email.to_lowercase(),
        };

        let password_hash =
            hash::compute_password_hash_b64(id, &salt, password.unwrap_or_default());

        Ok(Self {
            id,
            email: email.to_lowercase(),
            username,
            avatar_fingerprint: hash::avatar_fingerprint(email),
            salt,
            password_hash,
        })
    }
}
