//! Self-contained verification tokens for out-of-band flows (e.g. email
//! confirmation).
//!
//! A token is 16 random bytes hex-encoded (32 characters) followed by the
//! issuance minute in UTC (`YYYYMMDDhhmm`). Validity is judged purely from
//! the embedded timestamp against a fixed 60-minute window; nothing is ever
//! persisted or looked up. The random prefix only makes tokens unguessable
//! and unique.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use thiserror::Error;

use crate::hash::{CryptoError, random_bytes};

/// Fixed-width timestamp layout appended to every token.
///
/// Part of the token wire format: changing it invalidates every outstanding
/// token.
pub const TOKEN_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Length of the encoded timestamp segment.
pub const TOKEN_TIMESTAMP_LEN: usize = 12;

/// Random prefix length in bytes (32 hex characters once encoded).
pub const TOKEN_RANDOM_LEN: usize = 16;

/// Tokens expire this many minutes after the encoded issuance minute.
pub const TOKEN_VALIDITY_MINUTES: i64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Empty, too short, or the timestamp segment does not parse. Presented
    /// to users identically to [`TokenError::Expired`] — both just mean the
    /// token is not usable.
    #[error("token is malformed")]
    Malformed,

    /// The timestamp parsed but the validity window has passed.
    #[error("token has expired")]
    Expired,
}

/// Issue a token stamped with the current UTC minute.
pub fn issue() -> Result<String, CryptoError> {
    issue_at(Utc::now())
}

/// Issue a token stamped with an explicit instant.
///
/// Seconds and smaller units are truncated by the minute-precision layout.
pub fn issue_at(now: DateTime<Utc>) -> Result<String, CryptoError> {
    let random = random_bytes::<TOKEN_RANDOM_LEN>()?;
    Ok(format!(
        "{}{}",
        hex::encode(random),
        now.format(TOKEN_TIMESTAMP_FORMAT)
    ))
}

/// Validate a token against the current UTC time.
pub fn validate(token: &str) -> Result<DateTime<Utc>, TokenError> {
    validate_at(token, Utc::now())
}

/// Validate a token against an explicit `now`, returning the issuance instant.
///
/// Succeeds only while `now` is strictly before issuance + 60 minutes. The
/// random prefix is never checked against stored state.
pub fn validate_at(token: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TokenError> {
    if token.len() < TOKEN_TIMESTAMP_LEN {
        return Err(TokenError::Malformed);
    }

    // Byte-indexed split; reject a cut landing inside a multi-byte character
    // rather than panicking.
    let segment = token
        .get(token.len() - TOKEN_TIMESTAMP_LEN..)
        .ok_or(TokenError::Malformed)?;

    let issued = NaiveDateTime::parse_from_str(segment, TOKEN_TIMESTAMP_FORMAT)
        .map_err(|_| TokenError::Malformed)?
        .and_utc();

    if now < issued + Duration::minutes(TOKEN_VALIDITY_MINUTES) {
        Ok(issued)
    } else {
        Err(TokenError::Expired)
    }
}
