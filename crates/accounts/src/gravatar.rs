//! Avatar image URL construction.
//!
//! URLs point at the gravatar service using the fingerprint from
//! [`hash::avatar_fingerprint`]; `r=pg` and `d=mm` pin the rating filter and
//! the fallback image.

use crate::hash;

/// Build an avatar URL from a precomputed fingerprint.
///
/// `size` is appended only when greater than zero.
pub fn image_url(fingerprint: &str, secure: bool, size: u32) -> String {
    let protocol = if secure { "https" } else { "http" };
    let size_query = if size > 0 {
        format!("&s={}", size)
    } else {
        String::new()
    };
    format!(
        "{}://www.gravatar.com/avatar/{}?r=pg&d=mm{}",
        protocol, fingerprint, size_query
    )
}

/// Build an avatar URL straight from an email address.
pub fn image_url_for_email(email: &str, secure: bool, size: u32) -> String {
    image_url(&hash::avatar_fingerprint(email), secure, size)
}
