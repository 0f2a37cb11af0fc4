//! Content hashing for duplicate detection.
//!
//! The digest covers the message body only (trimmed, lowercased), never the
//! sender, so a redelivered or relayed SMS hashes the same wherever it came from.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use taqqafi_core::ContentHash;

/// SHA-256 of the trimmed, lowercased body as lowercase hex.
pub fn compute_hash(raw_text: &str) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.trim().to_lowercase().as_bytes());
    ContentHash::from_hex(format!("{:x}", hasher.finalize()))
}

pub fn is_processed(hash: &ContentHash, seen: &HashSet<ContentHash>) -> bool {
    seen.contains(hash)
}

/// Returns `seen` with `hash` added.
pub fn mark_processed(hash: ContentHash, mut seen: HashSet<ContentHash>) -> HashSet<ContentHash> {
    seen.insert(hash);
    seen
}
