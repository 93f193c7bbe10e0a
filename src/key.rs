//! Key space definitions
//!
//! Keys are ordered byte sequences; their total order defines range
//! membership and is the unit of routing.
//!
//! ## Metadata Addressing
//!
//! The locations of data ranges are themselves stored as records in the key
//! space, under two reserved prefixes that sort below all data keys:
//!
//! ```text
//! \0\0meta1<key>   first-level index: where the meta2 record for <key> lives
//! \0\0meta2<key>   second-level index: the descriptor of the range owning <key>
//! <key>            data keys (must not start with \0\0)
//! ```
//!
//! `meta_key` steps one level up this hierarchy; the first range (located
//! via the topology source) covers all meta1 records, which terminates the
//! descent.

use bytes::Bytes;

/// A routing key: an ordered byte sequence.
pub type Key = Bytes;

/// Smallest possible key (empty).
pub const KEY_MIN: &[u8] = b"";

/// Exclusive upper bound of the addressable key space. All addressable keys
/// sort strictly below it; the last range uses it as its end key.
pub const KEY_MAX: &[u8] = b"\xff\xff";

/// Prefix of first-level metadata index keys.
pub const META1_PREFIX: &[u8] = b"\x00\x00meta1";

/// Prefix of second-level metadata index keys.
pub const META2_PREFIX: &[u8] = b"\x00\x00meta2";

/// Return the metadata key addressing the range record for `key`, one level
/// up the index hierarchy:
///
/// - data key `k`          -> `meta2` key for `k`
/// - `meta2` key for `k`   -> `meta1` key for `k`
/// - `meta1` key           -> `None` (covered by the first range)
pub fn meta_key(key: &[u8]) -> Option<Key> {
    if key.starts_with(META1_PREFIX) {
        return None;
    }
    if let Some(stripped) = key.strip_prefix(META2_PREFIX) {
        return Some(prefixed(META1_PREFIX, stripped));
    }
    Some(prefixed(META2_PREFIX, key))
}

/// Whether `key` lives in the reserved metadata portion of the key space.
pub fn is_meta_key(key: &[u8]) -> bool {
    key.starts_with(META1_PREFIX) || key.starts_with(META2_PREFIX)
}

fn prefixed(prefix: &[u8], key: &[u8]) -> Key {
    let mut buf = Vec::with_capacity(prefix.len() + key.len());
    buf.extend_from_slice(prefix);
    buf.extend_from_slice(key);
    Bytes::from(buf)
}
