//! Authentication and authorization orchestration.
//!
//! All outcomes visible to callers collapse to "authenticated or not": an
//! unknown username, a wrong password and a malformed stored record are
//! indistinguishable, which keeps account enumeration and oracle probing
//! uninformative. Only a store failure surfaces as an error, because
//! "could not check" must never masquerade as "checked and rejected".

use base64::{Engine, engine::general_purpose};
use subtle::ConstantTimeEq;
use thiserror::Error;

use tracklet_core::UserId;

use crate::hash::{self, Salt};
use crate::roles::Role;
use crate::store::{RoleCheck, StoreError, User, UserStore};

#[derive(Debug, Error)]
pub enum AuthError {
    /// The store could not complete the lookup.
    #[error("authentication failed to complete")]
    Store(#[from] StoreError),
}

/// Credential checks against injected collaborators.
///
/// Holds no connection state of its own; the store owns resource scoping.
pub struct AuthChecker<S, R> {
    store: S,
    roles: R,
}

impl<S: UserStore, R: RoleCheck> AuthChecker<S, R> {
    pub fn new(store: S, roles: R) -> Self {
        Self { store, roles }
    }

    /// Authenticate by username and password.
    ///
    /// `Ok(None)` covers an unknown username and a wrong password alike.
    /// Hashing runs synchronously and is intentionally expensive; callers
    /// performing many concurrent checks should bound concurrency.
    pub fn authenticate_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let username = username.to_lowercase();

        let Some(user) = self.store.find_by_username(&username)? else {
            tracing::debug!(%username, "authentication rejected");
            return Ok(None);
        };

        let Ok(salt) = Salt::from_base64(&user.salt) else {
            tracing::warn!(user_id = %user.id, "stored salt is malformed");
            return Ok(None);
        };
        let Ok(stored) = general_purpose::STANDARD.decode(&user.password_hash) else {
            tracing::warn!(user_id = %user.id, "stored password hash is malformed");
            return Ok(None);
        };

        let computed = hash::compute_password_hash(user.id, &salt, password);
        if bool::from(computed.as_slice().ct_eq(stored.as_slice())) {
            Ok(Some(user))
        } else {
            tracing::debug!(%username, "authentication rejected");
            Ok(None)
        }
    }

    /// Re-validate an identity by id alone, with no password check.
    ///
    /// For flows where the caller already trusts the identifier (e.g.
    /// session re-validation).
    pub fn authenticate_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Pure capability test, delegated to the role collaborator.
    pub fn authorize(&self, user: &User, role: &Role) -> bool {
        self.roles.has(user, role)
    }
}
