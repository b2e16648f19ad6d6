use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[0-9a-f]{8}-[0-9a-f]{4}-[1-8][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}|00000000-0000-0000-0000-000000000000|ffffffff-ffff-ffff-ffff-ffffffffffff)$",
    )
    .expect("UUID regex should be valid")
});

/// Canonical textual UUID check.
///
/// Hyphenated 8-4-4-4-12 hex, version nibble `1`-`8`, variant nibble `8`/`9`/`a`/`b`,
/// case-insensitive. The nil and max UUIDs are accepted as well.
#[must_use]
pub fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}
