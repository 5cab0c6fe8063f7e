//! Canonical hashing
//!
//! Values are serialized to JSON through `serde_json::Value`, whose maps keep
//! keys sorted, then hashed with SHA-256. Equal inputs therefore hash equally
//! regardless of insertion order.

use crate::error::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical (sorted-key, compact) JSON encoding
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&json)?)
}

/// Lower-case hex SHA-256 of raw bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// SHA-256 of the canonical JSON encoding
pub fn digest<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(sha256_hex(canonical_json(value)?.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_digest_ignores_insertion_order() {
        let mut a = HashMap::new();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = HashMap::new();
        b.insert("y", 2);
        b.insert("x", 1);

        assert_eq!(digest(&a).unwrap(), digest(&b).unwrap());
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let mut m = HashMap::new();
        m.insert("b", 1);
        m.insert("a", 2);
        assert_eq!(canonical_json(&m).unwrap(), r#"{"a":2,"b":1}"#);
    }
}
