use sha2::{Digest, Sha256};

/// Content address for stored file bytes.
///
/// SHA256 of the raw bytes, hex encoded. Identical uploads map to the same
/// address, so re-uploading a file is idempotent.
pub fn content_address(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_same_address() {
        assert_eq!(content_address(b"%PDF-1.7"), content_address(b"%PDF-1.7"));
    }

    #[test]
    fn different_bytes_different_address() {
        assert_ne!(content_address(b"a"), content_address(b"b"));
    }

    #[test]
    fn address_is_64_hex_chars() {
        let address = content_address(b"Test content");
        assert_eq!(address.len(), 64);
        assert!(address.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
