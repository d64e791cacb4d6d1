use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::TreeEntry;

/// Domain separation context for tree digests.
const DIGEST_CONTEXT: &str = "twc 2024 tree digest v1";

/// BLAKE3 digest of a tree's contents.
///
/// Two trees with the same keys, titles and contents always produce the same
/// digest, which makes reruns over unchanged layers checkable bit for bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeDigest([u8; 32]);

impl TreeDigest {
    /// Digest a sequence of entries. Callers must supply them in key order.
    pub fn of_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a TreeEntry)>,
    {
        let mut hasher = blake3::Hasher::new_derive_key(DIGEST_CONTEXT);
        for (key, entry) in entries {
            hasher.update(&(key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            match &entry.title {
                Some(title) => {
                    hasher.update(&[1]);
                    hasher.update(&(title.as_str().len() as u64).to_le_bytes());
                    hasher.update(title.as_str().as_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            hasher.update(&(entry.content.len() as u64).to_le_bytes());
            hasher.update(&entry.content);
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for TreeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeDigest({})", self.short_hex())
    }
}

impl fmt::Display for TreeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::title::Title;

    fn entries(pairs: &[(&str, Option<&str>, &str)]) -> Vec<(String, TreeEntry)> {
        pairs
            .iter()
            .map(|(k, t, c)| {
                (
                    k.to_string(),
                    TreeEntry {
                        title: t.map(|t| Title::new(t).unwrap()),
                        content: c.as_bytes().to_vec(),
                    },
                )
            })
            .collect()
    }

    fn digest(pairs: &[(&str, Option<&str>, &str)]) -> TreeDigest {
        let e = entries(pairs);
        TreeDigest::of_entries(e.iter().map(|(k, v)| (k, v)))
    }

    #[test]
    fn empty_digest_is_stable() {
        assert_eq!(digest(&[]), digest(&[]));
    }

    #[test]
    fn key_content_boundary_is_unambiguous() {
        let a = digest(&[("ab", None, "c")]);
        let b = digest(&[("a", None, "bc")]);
        assert_ne!(a, b);
    }

    #[test]
    fn title_presence_changes_digest() {
        let a = digest(&[("x", Some("x"), "1")]);
        let b = digest(&[("x", None, "1")]);
        assert_ne!(a, b);
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(digest(&[("x", None, "1")]).short_hex().len(), 8);
        assert_eq!(digest(&[]).to_hex().len(), 64);
    }
}
