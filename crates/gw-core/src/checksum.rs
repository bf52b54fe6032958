//! SHA-256 checksums for migration drift detection.

use sha2::{Digest, Sha256};

/// Compute the SHA256 checksum of a migration file body as a hex string.
///
/// The checksum is recorded in the ledger when a migration is applied and
/// compared against the file on later runs to detect edits to already
/// applied migrations.
pub fn compute_checksum(contents: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_hex_sha256() {
        let sum = compute_checksum("up: []\n");
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_changes_with_content() {
        assert_ne!(compute_checksum("a"), compute_checksum("b"));
        assert_eq!(compute_checksum("a"), compute_checksum("a"));
    }
}
