//! Opaque identifier generation for sessions and stored results.
//!
//! Ids have the shape `<prefix>_<unix-millis>_<suffix>` where the suffix is
//! nine random base36 characters. No uniqueness check is performed; the
//! millisecond prefix plus ~46 bits of randomness keeps collisions negligible.

use rand::Rng;

use crate::types::Timestamp;

/// Prefix for server-generated session ids.
pub const SESSION_ID_PREFIX: &str = "session";

/// Prefix for stored analysis result ids.
pub const RESULT_ID_PREFIX: &str = "analysis";

/// Length of the random base36 suffix.
pub const RANDOM_SUFFIX_LEN: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build a fresh id with the given prefix, stamped with `now`.
pub fn generate_id(prefix: &str, now: Timestamp) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{prefix}_{}_{suffix}", now.timestamp_millis())
}

/// Fallback session id for clients that did not supply one.
pub fn generate_session_id(now: Timestamp) -> String {
    generate_id(SESSION_ID_PREFIX, now)
}

/// Id for a newly saved analysis result.
pub fn generate_result_id(now: Timestamp) -> String {
    generate_id(RESULT_ID_PREFIX, now)
}
