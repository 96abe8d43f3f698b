//! Synthetic identifiers for data sources

use sha2::{Digest, Sha256};

/// Deterministic ID for a list of item IDs.
///
/// Lowercase hex SHA-256 over the IDs sorted ascending, each followed by
/// `\n`, so the result does not depend on the order the API returned them in.
pub fn string_list_checksum<S: AsRef<str>>(ids: &[S]) -> String {
    let mut sorted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    for id in sorted {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
