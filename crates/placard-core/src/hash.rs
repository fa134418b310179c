//! Content fingerprints for scene snapshots

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 fingerprint of a serialized scene snapshot.
///
/// The editor session stamps every validation request with the fingerprint of
/// the snapshot it was computed against, so a late result for a scene that has
/// since changed can be recognised and dropped.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash the canonical JSON form of any serializable value.
    ///
    /// Struct fields serialize in declaration order, so equal values always
    /// produce equal fingerprints.
    pub fn of<T: Serialize>(value: &T) -> crate::Result<Self> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self(Sha256::digest(&bytes).into()))
    }

    /// Short hex prefix for logs
    fn short_hex(&self) -> String {
        self.0[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        size: u32,
    }

    #[test]
    fn test_hash_of_serializable() {
        let a = ContentHash::of(&Sample { name: "a", size: 1 }).unwrap();
        let b = ContentHash::of(&Sample { name: "a", size: 1 }).unwrap();
        let c = ContentHash::of(&Sample { name: "a", size: 2 }).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_is_short_hex() {
        let h = ContentHash::of(&"layout").unwrap();
        let shown = h.to_string();
        assert_eq!(shown.len(), 16);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(format!("{:?}", h), format!("ContentHash({})", shown));
    }
}
