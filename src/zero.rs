//! Process-wide table of empty-subtree roots.
//!
//! `zero[0]` is the all-zero chunk and `zero[d] = H(zero[d-1], zero[d-1])`.
//! The table is append-only: entries are computed lazily under the write
//! lock and never change once published.

use alloy_primitives::B256;
use parking_lot::RwLock;

use crate::Hasher;

/// Deepest tree any descriptor can require (limits are `usize`, so at most 2^64 leaves).
pub const MAX_TREE_DEPTH: usize = 64;

/// Lazily extended zero-hash table for a single hash function.
#[derive(Debug)]
pub struct ZeroHashes {
    table: RwLock<Vec<B256>>,
}

impl Default for ZeroHashes {
    fn default() -> Self {
        Self::new()
    }
}

impl ZeroHashes {
    /// Create an empty table. `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            table: RwLock::new(Vec::new()),
        }
    }

    /// Get the root of an all-zero subtree of `depth` levels.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds [`MAX_TREE_DEPTH`]. Trees built from `usize`
    /// limits never go deeper, so the table stays bounded.
    pub fn get<H: Hasher>(&self, hasher: &H, depth: usize) -> B256 {
        assert!(
            depth <= MAX_TREE_DEPTH,
            "zero hash depth {depth} exceeds {MAX_TREE_DEPTH}"
        );
        if let Some(hash) = self.table.read().get(depth) {
            return *hash;
        }

        let mut table = self.table.write();
        // Another writer may have extended the table while we waited.
        let start = table.len();
        if start == 0 {
            table.push(B256::ZERO);
        }
        while table.len() <= depth {
            let prev = table[table.len() - 1];
            table.push(hasher.hash_64(&prev, &prev));
        }
        if table.len() > start {
            tracing::trace!(from = start, to = table.len() - 1, "extended zero-hash table");
        }
        table[depth]
    }

    /// Number of depths computed so far.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Whether nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}

/// Zero-hash for the SHA-256 tree hash.
///
/// # Panics
///
/// Panics if `depth` exceeds [`MAX_TREE_DEPTH`].
pub fn zero_hash(depth: usize) -> B256 {
    crate::Sha256Hasher.zero_hash(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blake3Hasher, Sha256Hasher};

    #[test]
    fn test_zero_depth_is_zero_chunk() {
        assert_eq!(zero_hash(0), B256::ZERO);
    }

    #[test]
    fn test_recurrence_holds() {
        let hasher = Sha256Hasher;
        for depth in 1..=MAX_TREE_DEPTH {
            let prev = zero_hash(depth - 1);
            assert_eq!(zero_hash(depth), hasher.hash_64(&prev, &prev));
        }
    }

    #[test]
    fn test_local_table_matches_global() {
        let local = ZeroHashes::new();
        assert!(local.is_empty());
        assert_eq!(local.get(&Sha256Hasher, 10), zero_hash(10));
        assert_eq!(local.len(), 11);
        // Lower depths are served from the published prefix.
        assert_eq!(local.get(&Sha256Hasher, 3), zero_hash(3));
        assert_eq!(local.len(), 11);
    }

    #[test]
    fn test_deepest_tree_is_supported() {
        let table = ZeroHashes::new();
        assert_eq!(table.get(&Sha256Hasher, MAX_TREE_DEPTH), zero_hash(MAX_TREE_DEPTH));
        assert_eq!(table.len(), MAX_TREE_DEPTH + 1);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_depth_beyond_max_is_rejected() {
        let table = ZeroHashes::new();
        table.get(&Sha256Hasher, MAX_TREE_DEPTH + 1);
    }

    #[test]
    fn test_known_depth_two() {
        assert_eq!(
            hex::encode(zero_hash(2)),
            "db56114e00fdd4c1f85c892bf35ac9a89289aaecb1ebd0a96cde606a748b5d71"
        );
    }

    #[test]
    fn test_concurrent_extension_agrees() {
        let table = ZeroHashes::new();
        let results: Vec<B256> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let table = &table;
                    s.spawn(move || table.get(&Blake3Hasher, 16 + i))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, hash) in results.iter().enumerate() {
            assert_eq!(*hash, Blake3Hasher.zero_hash(16 + i));
        }
    }
}
