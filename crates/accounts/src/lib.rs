//! `tracklet-accounts` — credential issuance and verification core.
//!
//! This crate is intentionally decoupled from HTTP and storage. User lookup
//! and role membership come in through the [`store`] collaborator traits;
//! everything else is pure computation: salted password hashing ([`hash`]),
//! self-contained verification tokens ([`token`]), credential assembly
//! ([`credential`]) and the authentication checks that tie them together
//! ([`checker`]).

pub mod checker;
pub mod credential;
pub mod gravatar;
pub mod hash;
pub mod roles;
pub mod store;
pub mod token;

pub use checker::{AuthChecker, AuthError};
pub use credential::Credential;
pub use hash::{CryptoError, Salt, avatar_fingerprint, compute_password_hash};
pub use roles::Role;
pub use store::{RoleCheck, StoreError, User, UserStore};
pub use token::TokenError;
