use sha2::{Digest, Sha256};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Normalize a phone number / email before hashing
///
/// Whitespace is dropped and letters are lower-cased so that
/// `"+34 600 000 000"` and `"+34600000000"` key the same guest.
pub fn normalize_contact(contact: &str) -> String {
    contact
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// SHA-256 hex of the normalized contact; the guest document key
pub fn hash_contact(contact: &str) -> String {
    let digest = Sha256::digest(normalize_contact(contact).as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_contact_ignores_spacing_and_case() {
        assert_eq!(hash_contact("+34 600 000 000"), hash_contact("+34600000000"));
        assert_eq!(hash_contact("Ana@Example.com "), hash_contact("ana@example.com"));
        assert_ne!(hash_contact("+34600000000"), hash_contact("+34600000001"));
    }

    #[test]
    fn test_hash_contact_is_sha256_hex() {
        let hash = hash_contact("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
