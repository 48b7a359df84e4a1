//! Unique fixture values so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `{prefix}-{ulid}@example.test`, lowercased.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("test");
/// assert_ne!(a, unique_email("test"));
/// assert!(a.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

/// Ten-digit phone number derived from a fresh ulid.
pub fn unique_phone() -> String {
    let n = Ulid::new().random() % 10_000_000_000;
    format!("{n:010}")
}
