//! ID generation for tags and issues.
//!
//! IDs have the format `<prefix>-<hash>` where hash is base36 lowercase
//! (0-9, a-z) derived from a SHA-256 of creation-time inputs. Collisions
//! are resolved by retrying with an incremented nonce.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Hash length used for generated IDs.
const HASH_LENGTH: usize = 6;

/// Prefix for tag IDs.
pub const TAG_PREFIX: &str = "tag";

/// Prefix for issue IDs.
pub const ISSUE_PREFIX: &str = "iss";

/// Generate an ID, checking for collisions with the provided checker.
///
/// The checker function should return `true` if the ID already exists.
pub fn generate<F>(prefix: &str, seed_text: &str, created_at: DateTime<Utc>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut nonce = 0u32;
    loop {
        let id = generate_candidate(prefix, seed_text, created_at, nonce);
        if !exists(&id) {
            return id;
        }
        nonce += 1;

        // Safety break (only reachable if the existence check is broken)
        if nonce > 1000 {
            return format!("{id}-{nonce}");
        }
    }
}

/// Generate a candidate ID for the given inputs.
#[must_use]
pub fn generate_candidate(
    prefix: &str,
    seed_text: &str,
    created_at: DateTime<Utc>,
    nonce: u32,
) -> String {
    let seed = format!(
        "{}|{}|{}",
        seed_text,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    let hash = compute_id_hash(&seed, HASH_LENGTH);
    format!("{prefix}-{hash}")
}

/// Compute a base36 hash of the input string with a specific length.
///
/// Hashes the input with SHA-256, folds the first 8 bytes into a u64,
/// encodes as base36, and truncates to the requested length.
#[must_use]
pub fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut s = base36_encode(num);
    if s.len() < length {
        s = format!("{s:0>length$}");
    }

    s.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}
