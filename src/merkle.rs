//! Merkleization over a padded binary tree.
//!
//! [`merkleize`] hashes a chunk sequence as the leaves of a perfect binary
//! tree with `2^depth_for_limit(limit)` leaves. Leaves past the end of the
//! sequence are zero chunks; whole subtrees of them are read from the
//! zero-hash table instead of being hashed, so the cost is proportional to
//! the number of chunks rather than to the tree capacity.

use alloy_primitives::B256;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{error::Result, Hasher, Sha256Hasher, SszError};

/// Layers with at least this many pairs are hashed on the rayon pool.
#[cfg(feature = "parallel")]
const PARALLEL_PAIR_THRESHOLD: usize = 256;

/// Depth of the tree needed to hold `limit` leaves: `ceil(log2(limit))`, 0 for `limit <= 1`.
pub const fn depth_for_limit(limit: usize) -> usize {
    if limit <= 1 {
        0
    } else {
        (usize::BITS - (limit - 1).leading_zeros()) as usize
    }
}

/// SHA-256 root of `chunks` padded to `limit` leaves.
pub fn merkleize(chunks: &[B256], limit: usize) -> Result<B256> {
    merkleize_with(&Sha256Hasher, chunks, limit)
}

/// Root of `chunks` padded to `limit` leaves, with a caller-chosen hasher.
///
/// # Errors
///
/// Returns [`SszError::LimitExceeded`] when there are more chunks than `limit`.
pub fn merkleize_with<H: Hasher>(hasher: &H, chunks: &[B256], limit: usize) -> Result<B256> {
    if chunks.len() > limit {
        return Err(SszError::LimitExceeded {
            len: chunks.len(),
            limit,
        });
    }

    let depth = depth_for_limit(limit);
    if chunks.is_empty() {
        return Ok(hasher.zero_hash(depth));
    }

    let mut layer = chunks.to_vec();
    for level in 0..depth {
        if layer.len() % 2 == 1 {
            layer.push(hasher.zero_hash(level));
        }
        hash_layer(hasher, &mut layer);
    }

    Ok(layer[0])
}

/// Replace `layer` (even length) with its parent layer, pairing left to right.
#[cfg(not(feature = "parallel"))]
fn hash_layer<H: Hasher>(hasher: &H, layer: &mut Vec<B256>) {
    let pairs = layer.len() / 2;
    for i in 0..pairs {
        let left = layer[i * 2];
        let right = layer[i * 2 + 1];
        layer[i] = hasher.hash_64(&left, &right);
    }
    layer.truncate(pairs);
}

/// Replace `layer` (even length) with its parent layer, pairing left to right (parallel version).
#[cfg(feature = "parallel")]
fn hash_layer<H: Hasher>(hasher: &H, layer: &mut Vec<B256>) {
    let pairs = layer.len() / 2;
    if pairs < PARALLEL_PAIR_THRESHOLD {
        for i in 0..pairs {
            let left = layer[i * 2];
            let right = layer[i * 2 + 1];
            layer[i] = hasher.hash_64(&left, &right);
        }
        layer.truncate(pairs);
        return;
    }

    // `collect` on an indexed parallel iterator preserves pair order.
    *layer = layer
        .par_chunks_exact(2)
        .map(|pair| hasher.hash_64(&pair[0], &pair[1]))
        .collect();
}

/// Bind a collection length into a root: `H(root, uint256_le(length))`.
pub fn mix_in_length(root: &B256, length: usize) -> B256 {
    mix_in_length_with(&Sha256Hasher, root, length)
}

/// [`mix_in_length`] with a caller-chosen hasher.
pub fn mix_in_length_with<H: Hasher>(hasher: &H, root: &B256, length: usize) -> B256 {
    let mut encoded = [0u8; 32];
    encoded[..8].copy_from_slice(&(length as u64).to_le_bytes());
    hasher.hash_64(root, &B256::from(encoded))
}

/// Bind a union selector into a root. Same layout as the length mix-in.
pub fn mix_in_selector(root: &B256, selector: u8) -> B256 {
    mix_in_length(root, selector as usize)
}

/// [`mix_in_selector`] with a caller-chosen hasher.
pub fn mix_in_selector_with<H: Hasher>(hasher: &H, root: &B256, selector: u8) -> B256 {
    mix_in_length_with(hasher, root, selector as usize)
}

/// Incremental Merkleizer that accepts chunks one at a time.
///
/// Memory usage is O(depth): only the pending left sibling of each level is
/// kept. The result of [`finish`](Self::finish) equals
/// [`merkleize_with`] over the same chunks and limit.
#[derive(Clone, Debug)]
pub struct StreamingMerkleizer<H: Hasher = Sha256Hasher> {
    hasher: H,
    limit: usize,
    depth: usize,
    count: usize,
    /// `pending[level]` is a completed left subtree of height `level` awaiting its sibling.
    /// `pending[depth]` holds the root once the tree is full.
    pending: Vec<Option<B256>>,
}

impl StreamingMerkleizer<Sha256Hasher> {
    /// Create a SHA-256 streaming merkleizer for a tree of `limit` leaves.
    pub fn new(limit: usize) -> Self {
        Self::with_hasher(Sha256Hasher, limit)
    }
}

impl<H: Hasher> StreamingMerkleizer<H> {
    /// Create a streaming merkleizer with a custom hasher.
    pub fn with_hasher(hasher: H, limit: usize) -> Self {
        let depth = depth_for_limit(limit);
        Self {
            hasher,
            limit,
            depth,
            count: 0,
            pending: vec![None; depth + 1],
        }
    }

    /// Number of chunks pushed so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no chunk has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append the next leaf.
    ///
    /// # Errors
    ///
    /// Returns [`SszError::LimitExceeded`] once `limit` chunks have been pushed.
    pub fn push(&mut self, chunk: B256) -> Result<()> {
        if self.count >= self.limit {
            return Err(SszError::LimitExceeded {
                len: self.count + 1,
                limit: self.limit,
            });
        }

        let mut node = chunk;
        let mut level = 0;
        while level < self.depth {
            match self.pending[level].take() {
                Some(left) => {
                    node = self.hasher.hash_64(&left, &node);
                    level += 1;
                }
                None => break,
            }
        }
        self.pending[level] = Some(node);
        self.count += 1;
        Ok(())
    }

    /// Finish the tree, padding the remaining leaves with zero chunks.
    pub fn finish(self) -> B256 {
        if let Some(root) = self.pending[self.depth] {
            return root;
        }

        let mut acc: Option<B256> = None;
        for level in 0..self.depth {
            acc = match (self.pending[level], acc) {
                (Some(left), Some(right)) => Some(self.hasher.hash_64(&left, &right)),
                (Some(left), None) => Some(self.hasher.hash_64(&left, &self.hasher.zero_hash(level))),
                (None, Some(left)) => Some(self.hasher.hash_64(&left, &self.hasher.zero_hash(level))),
                (None, None) => None,
            };
        }

        acc.unwrap_or_else(|| self.hasher.zero_hash(self.depth))
    }
}
