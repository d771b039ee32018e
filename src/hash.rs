//! Hash function abstraction for tree hashing.
//!
//! Hash-tree roots are defined over SHA-256. [`Blake3Hasher`] exists for
//! experimentation and benchmarking only; its roots are not interoperable.

use alloy_primitives::B256;
use sha2::{Digest, Sha256};

use crate::zero::ZeroHashes;

/// Trait for the two-to-one compression function used by the Merkleizer.
///
/// Unlike a sparse-tree hasher, there is no special case for all-zero input:
/// `hash_64(0, 0)` is a real digest, which is exactly what the zero-hash
/// table caches.
///
/// # Thread Safety
///
/// Hashers are `Send + Sync` so sibling subtrees can be hashed on rayon
/// workers when the `parallel` feature is enabled.
pub trait Hasher: Clone + Default + Send + Sync + 'static {
    /// Hash two chunks: `H(left || right)`.
    fn hash_64(&self, left: &B256, right: &B256) -> B256;

    /// Raw hash of arbitrary input.
    fn hash_raw(&self, input: &[u8]) -> B256;

    /// Process-wide zero-hash table for this hash function.
    fn zero_hashes(&self) -> &'static ZeroHashes;

    /// Root of an all-zero subtree of the given depth.
    fn zero_hash(&self, depth: usize) -> B256 {
        self.zero_hashes().get(self, depth)
    }
}

static SHA256_ZERO_HASHES: ZeroHashes = ZeroHashes::new();
static BLAKE3_ZERO_HASHES: ZeroHashes = ZeroHashes::new();

/// SHA-256 hasher. This is the hash the wire-compatible roots are defined over.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash_64(&self, left: &B256, right: &B256) -> B256 {
        let mut hasher = Sha256::new();
        hasher.update(left.as_slice());
        hasher.update(right.as_slice());
        B256::from_slice(&hasher.finalize())
    }

    fn hash_raw(&self, input: &[u8]) -> B256 {
        B256::from_slice(&Sha256::digest(input))
    }

    fn zero_hashes(&self) -> &'static ZeroHashes {
        &SHA256_ZERO_HASHES
    }
}

/// BLAKE3-based hasher.
///
/// **Note**: roots produced with this hasher do not match any other
/// implementation. Use it to compare hashing cost, not for interop.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn hash_64(&self, left: &B256, right: &B256) -> B256 {
        let mut input = [0u8; 64];
        input[..32].copy_from_slice(left.as_slice());
        input[32..].copy_from_slice(right.as_slice());

        B256::from_slice(blake3::hash(&input).as_bytes())
    }

    fn hash_raw(&self, input: &[u8]) -> B256 {
        B256::from_slice(blake3::hash(input).as_bytes())
    }

    fn zero_hashes(&self) -> &'static ZeroHashes {
        &BLAKE3_ZERO_HASHES
    }
}
