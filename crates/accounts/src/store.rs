//! Collaborator contracts for user lookup and role membership.
//!
//! Storage and role representation live outside this crate. The checker only
//! needs two lookup operations and an opaque capability test; anything that
//! satisfies these traits (a SQL-backed repository, an in-memory map in
//! tests) plugs in unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tracklet_core::UserId;

use crate::roles::Role;

/// A stored user record, as surfaced by a [`UserStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub avatar_fingerprint: String,
    /// Base64 of the 16-byte salt generated at account creation.
    pub salt: String,
    /// Base64 of the 64-byte derived password hash.
    pub password_hash: String,
    pub role: Role,
}

/// Failure talking to the backing store.
///
/// Distinct from a lookup miss: a miss is `Ok(None)`, an error means the
/// check never completed and must not be reported as "user not found".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),

    #[error("user store lookup timed out")]
    Timeout,
}

/// Read-side user lookup contract.
///
/// Implementations must scope any connection acquisition to the single call
/// (acquire, read, release on every exit path). Each lookup is one read; no
/// transaction spans calls.
pub trait UserStore {
    /// Fetch a user by already-normalized (lower-cased) username.
    fn find_by_username(&self, normalized_username: &str) -> Result<Option<User>, StoreError>;

    /// Fetch a user by identifier.
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Role-membership capability test.
pub trait RoleCheck {
    fn has(&self, user: &User, role: &Role) -> bool;
}
